use reqwest::Method;
use validator::Validate;

use crate::config::ServiceEndpoint;
use crate::error::ClientError;
use crate::models::account::{FdAccount, OpenAccountRequest};
use crate::services::session_client::SessionClient;

pub const ACCOUNTS_PATH: &str = "/api/v1/accounts";

pub struct AccountClient {
    session: SessionClient,
    endpoint: ServiceEndpoint,
}

impl AccountClient {
    pub fn new(session: SessionClient, endpoint: ServiceEndpoint) -> Self {
        Self { session, endpoint }
    }

    pub async fn list_accounts(&self) -> Result<Vec<FdAccount>, ClientError> {
        self.session
            .send_list(Method::GET, &self.endpoint, ACCOUNTS_PATH, None)
            .await
    }

    pub async fn get_account(&self, account_number: &str) -> Result<FdAccount, ClientError> {
        let path = format!("{}/{}", ACCOUNTS_PATH, account_number.trim());
        self.session.send(Method::GET, &self.endpoint, &path, None).await
    }

    /// Fills `customer_number` from the session when the request has none.
    pub async fn open_account(
        &self,
        request: &OpenAccountRequest,
    ) -> Result<FdAccount, ClientError> {
        request.validate()?;

        let mut request = request.clone();
        if request.customer_number.is_none() {
            request.customer_number = self.session.store().customer_number()?;
        }
        let body = serde_json::to_value(&request)?;

        let account: FdAccount = self
            .session
            .send(Method::POST, &self.endpoint, ACCOUNTS_PATH, Some(&body))
            .await?;
        tracing::info!(
            account_number = %account.account_number,
            product_code = %account.product_code,
            "FD account opened"
        );
        Ok(account)
    }
}
