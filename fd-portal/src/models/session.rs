use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::jwt::TokenClaims;

/// Role of the signed-in user as reported by the auth service.
///
/// Parsing is case-insensitive and accepts a `ROLE_` prefix. Unknown values
/// are kept verbatim so they survive a persist/restore cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    Admin,
    Customer,
    Other(String),
}

impl UserType {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserType::Admin)
    }

    pub fn as_str(&self) -> &str {
        match self {
            UserType::Admin => "ADMIN",
            UserType::Customer => "CUSTOMER",
            UserType::Other(value) => value,
        }
    }
}

impl From<String> for UserType {
    fn from(value: String) -> Self {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.strip_prefix("ROLE_").unwrap_or(&normalized) {
            "ADMIN" => UserType::Admin,
            "CUSTOMER" => UserType::Customer,
            _ => UserType::Other(value),
        }
    }
}

impl From<&str> for UserType {
    fn from(value: &str) -> Self {
        UserType::from(value.to_string())
    }
}

impl From<UserType> for String {
    fn from(value: UserType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the signed-in user, stored under the `userInfo` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserInfo {
    /// Fills every field the server left out from the token claims.
    pub fn fill_from_claims(&mut self, claims: &TokenClaims) {
        if self.user_id.is_none() {
            self.user_id = claims.user_id.clone();
        }
        if self.email.is_none() {
            self.email = claims.subject.clone();
        }
        if self.user_type.is_none() {
            self.user_type = claims.user_type.clone();
        }
        if self.roles.is_empty() {
            self.roles = claims.roles.clone();
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type.as_ref().is_some_and(UserType::is_admin)
    }
}

/// Client-held authentication state for the current user.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: UserInfo,
    #[serde(default)]
    pub customer_number: Option<String>,
}

impl Session {
    pub fn user_type(&self) -> Option<&UserType> {
        self.user.user_type.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("user", &self.user)
            .field("customer_number", &self.customer_number)
            .finish()
    }
}

/// Position in the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
    Refreshing,
}
