use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Draft,
    Active,
    Inactive,
    #[serde(other)]
    Unknown,
}

/// Fixed-deposit product as configured by staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdProduct {
    pub product_code: String,
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    pub min_amount: f64,
    #[serde(default)]
    pub max_amount: Option<f64>,
    pub min_term_months: u32,
    pub max_term_months: u32,
    pub base_interest_rate: f64,
    #[serde(default)]
    pub compounding_frequency: Option<String>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 2, max = 32, message = "Product code must be 2-32 characters"))]
    pub product_code: String,

    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[validate(range(min = 0.01, message = "Minimum amount must be positive"))]
    pub min_amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,

    #[validate(range(min = 1, message = "Minimum term must be at least one month"))]
    pub min_term_months: u32,

    pub max_term_months: u32,

    #[validate(range(min = 0.0, max = 100.0, message = "Interest rate must be between 0 and 100"))]
    pub base_interest_rate: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compounding_frequency: Option<String>,
}

impl CreateProductRequest {
    /// Field rules plus the cross-field term and amount ranges.
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => validator::ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.max_term_months < self.min_term_months {
            errors.add(
                "maxTermMonths",
                range_error("term_range", "Maximum term must not be below the minimum term"),
            );
        }
        if self.max_amount.is_some_and(|max| max < self.min_amount) {
            errors.add(
                "maxAmount",
                range_error("amount_range", "Maximum amount must not be below the minimum amount"),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn range_error(code: &'static str, message: &'static str) -> validator::ValidationError {
    let mut error = validator::ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Partial update; absent fields are left unchanged by the product service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Product name must not be empty"))]
    pub product_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0, message = "Interest rate must be between 0 and 100"))]
    pub base_interest_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}
