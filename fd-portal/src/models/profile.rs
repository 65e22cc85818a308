use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub customer_number: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub kyc_status: Option<String>,
}

impl CustomerProfile {
    pub fn initials(&self) -> String {
        let initials: String = self
            .full_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase();

        if initials.is_empty() {
            "U".to_string()
        } else {
            initials
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 7, max = 20, message = "Phone number must be 7-20 characters"))]
    pub phone_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> CustomerProfile {
        CustomerProfile {
            customer_number: "C-1001".into(),
            full_name: name.into(),
            email: "jane@example.com".into(),
            phone_number: None,
            address: None,
            date_of_birth: None,
            kyc_status: None,
        }
    }

    #[test]
    fn initials_from_full_name() {
        assert_eq!(profile("jane doe").initials(), "JD");
        assert_eq!(profile("Prince").initials(), "P");
        assert_eq!(profile("  ").initials(), "U");
    }

    #[test]
    fn short_phone_number_is_rejected() {
        let update = UpdateProfileRequest {
            phone_number: Some("123".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
