use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Matured,
    Closed,
    PrematureClosed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdAccount {
    pub account_number: String,
    pub product_code: String,
    #[serde(default)]
    pub customer_number: Option<String>,
    pub principal_amount: f64,
    pub interest_rate: f64,
    pub tenure_months: u32,
    #[serde(default)]
    pub maturity_amount: Option<f64>,
    #[serde(default)]
    pub opened_on: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub maturity_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OpenAccountRequest {
    #[validate(length(min = 1, message = "Product code is required"))]
    pub product_code: String,

    #[validate(range(min = 0.01, message = "Principal amount must be positive"))]
    pub principal_amount: f64,

    #[validate(range(min = 1, message = "Tenure must be at least one month"))]
    pub tenure_months: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_number: Option<String>,

    /// Links the account to the calculation the customer accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_id: Option<String>,
}
