use reqwest::Method;
use validator::Validate;

use crate::config::ServiceEndpoint;
use crate::error::ClientError;
use crate::models::fd::{CalculationRequest, CalculationResult};
use crate::services::session_client::SessionClient;

pub const CALCULATE_PATH: &str = "/api/fd/calculate";
pub const CALCULATIONS_PATH: &str = "/api/fd/calculations";

pub struct CalculatorClient {
    session: SessionClient,
    endpoint: ServiceEndpoint,
}

impl CalculatorClient {
    pub fn new(session: SessionClient, endpoint: ServiceEndpoint) -> Self {
        Self { session, endpoint }
    }

    /// Sent without a bearer token when nobody is signed in.
    pub async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ClientError> {
        request.validate()?;
        let body = serde_json::to_value(request)?;

        let mut result: CalculationResult = self
            .session
            .send(Method::POST, &self.endpoint, CALCULATE_PATH, Some(&body))
            .await?;
        if result.product_code.is_none() {
            result.product_code = Some(request.product_code.clone());
        }

        tracing::debug!(
            product_code = %request.product_code,
            tenure_months = request.tenure_months,
            maturity_amount = result.maturity_amount,
            "FD calculation completed"
        );
        Ok(result)
    }

    /// Calculations saved for the signed-in customer.
    pub async fn history(&self) -> Result<Vec<CalculationResult>, ClientError> {
        self.session
            .send_list(Method::GET, &self.endpoint, CALCULATIONS_PATH, None)
            .await
    }
}
