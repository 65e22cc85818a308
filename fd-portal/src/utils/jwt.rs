use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde::{Deserialize, Deserializer};

use crate::models::session::UserType;

/// URL-safe alphabet that accepts tokens with or without `=` padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims the portal reads from an access token.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "sub", default)]
    pub subject: Option<String>,
    #[serde(
        rename = "userId",
        alias = "user_id",
        default,
        deserialize_with = "string_or_number"
    )]
    pub user_id: Option<String>,
    #[serde(rename = "userType", alias = "user_type", default)]
    pub user_type: Option<UserType>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub roles: Vec<String>,
}

/// Decode JWT claims without validation.
///
/// Only the middle segment of a `header.claims.signature` token is read. The
/// signature is not checked: the portal uses the claims for routing and
/// display, and every backend verifies the token it receives.
///
/// Returns `None` for anything that is not a three-part token with a
/// base64url JSON object in the middle.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    let bytes = URL_SAFE_LENIENT.decode(payload).ok()?;
    let value = match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        Ok(_) => {
            tracing::debug!("Access token claims are not a JSON object");
            return None;
        }
        Err(e) => {
            tracing::debug!(error = %e, "Access token claims are not JSON");
            return None;
        }
    };

    match serde_json::from_value::<TokenClaims>(value) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "Access token claims have unexpected types");
            None
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    }))
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Roles {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Roles>::deserialize(deserializer)? {
        Some(Roles::One(role)) => vec![role],
        Some(Roles::Many(roles)) => roles,
        None => Vec::new(),
    })
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}
