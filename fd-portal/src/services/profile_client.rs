use reqwest::Method;
use validator::Validate;

use crate::config::ServiceEndpoint;
use crate::error::ClientError;
use crate::models::profile::{CustomerProfile, UpdateProfileRequest};
use crate::services::session_client::SessionClient;

pub const MY_PROFILE_PATH: &str = "/api/profiles/me";

pub struct ProfileClient {
    session: SessionClient,
    endpoint: ServiceEndpoint,
}

impl ProfileClient {
    pub fn new(session: SessionClient, endpoint: ServiceEndpoint) -> Self {
        Self { session, endpoint }
    }

    /// Profile of the signed-in customer. Its customer number is recorded in
    /// the session for later account calls.
    pub async fn my_profile(&self) -> Result<CustomerProfile, ClientError> {
        let profile: CustomerProfile = self
            .session
            .send(Method::GET, &self.endpoint, MY_PROFILE_PATH, None)
            .await?;

        self.remember_customer_number(&profile);
        Ok(profile)
    }

    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<CustomerProfile, ClientError> {
        request.validate()?;
        let body = serde_json::to_value(request)?;

        let profile: CustomerProfile = self
            .session
            .send(Method::PUT, &self.endpoint, MY_PROFILE_PATH, Some(&body))
            .await?;

        self.remember_customer_number(&profile);
        tracing::info!(customer_number = %profile.customer_number, "Profile updated");
        Ok(profile)
    }

    fn remember_customer_number(&self, profile: &CustomerProfile) {
        if let Err(e) = self.session.set_customer_number(&profile.customer_number) {
            tracing::warn!(error = %e, "Failed to store customer number");
        }
    }
}
