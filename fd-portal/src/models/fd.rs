use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input to the FD-calculation service. Works without a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    #[validate(length(min = 1, message = "Product code is required"))]
    pub product_code: String,

    #[validate(range(min = 0.01, message = "Principal amount must be positive"))]
    pub principal_amount: f64,

    #[validate(range(min = 1, max = 600, message = "Tenure must be between 1 and 600 months"))]
    pub tenure_months: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compounding_frequency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_category: Option<String>,
}

/// Result as computed by the backend; the portal never recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    pub principal_amount: f64,
    pub interest_rate: f64,
    pub tenure_months: u32,
    pub maturity_amount: f64,
    #[serde(default)]
    pub interest_earned: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<chrono::NaiveDate>,
}
