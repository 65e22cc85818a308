use reqwest::{Client, StatusCode};
use serde_json::json;
use service_core::observability::TracedClientExt;

use crate::config::ServiceEndpoint;
use crate::error::ClientError;
use crate::models::auth::{AuthPayload, LoginRequest, RegisterRequest};
use crate::services::envelope;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// Raw calls to the auth service. Holds no session state; see
/// [`SessionClient`](crate::services::session_client::SessionClient).
pub struct AuthClient {
    client: Client,
    settings: ServiceEndpoint,
}

impl AuthClient {
    pub fn new(client: Client, settings: ServiceEndpoint) -> Self {
        Self { client, settings }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    /// 401 becomes `InvalidCredentials`, 423 `AccountLocked`.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, ClientError> {
        let url = self.settings.endpoint(LOGIN_PATH);
        let response = self
            .client
            .traced_post(&url)
            .timeout(self.settings.timeout())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send login request to {}: {}", url, e);
                ClientError::from(e)
            })?;

        match envelope::read_body(response).await {
            Ok(body) => envelope::decode(body),
            Err(ClientError::Http { status, message })
                if status == StatusCode::UNAUTHORIZED.as_u16() =>
            {
                Err(ClientError::InvalidCredentials(message))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, ClientError> {
        let url = self.settings.endpoint(REGISTER_PATH);
        let response = self
            .client
            .traced_post(&url)
            .timeout(self.settings.timeout())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send register request to {}: {}", url, e);
                ClientError::from(e)
            })?;

        envelope::decode(envelope::read_body(response).await?)
    }

    /// Exchanges a refresh token for a new pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthPayload, ClientError> {
        let url = self.settings.endpoint(REFRESH_PATH);
        let response = self
            .client
            .traced_post(&url)
            .timeout(self.settings.timeout())
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        envelope::decode(envelope::read_body(response).await?)
    }

    /// Revokes the tokens server-side.
    pub async fn logout(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<(), ClientError> {
        let url = self.settings.endpoint(LOGOUT_PATH);
        let mut request = self
            .client
            .traced_post(&url)
            .timeout(self.settings.timeout())
            .json(&json!({ "refreshToken": refresh_token }));
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        envelope::read_body(response).await.map(|_| ())
    }
}
