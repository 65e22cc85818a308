use axum::{extract::State, Json};
use serde::Serialize;
use service_core::error::AppError;

use crate::error::ClientError;
use crate::middleware::auth::CurrentSession;
use crate::models::account::FdAccount;
use crate::models::profile::{CustomerProfile, UpdateProfileRequest};
use crate::models::session::UserInfo;
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: UserInfo,
    pub initials: String,
    pub profile: Option<CustomerProfile>,
    pub accounts: Vec<FdAccount>,
}

/// A customer without a profile yet still gets a dashboard.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Dashboard>, AppError> {
    let profile = match state.profiles.my_profile().await {
        Ok(profile) => Some(profile),
        Err(ClientError::Http { status: 404, .. }) => {
            tracing::debug!(user_id = ?session.user.user_id, "No customer profile yet");
            None
        }
        Err(e) => return Err(e.into()),
    };
    let accounts = state.accounts.list_accounts().await?;

    let initials = match &profile {
        Some(profile) => profile.initials(),
        None => email_initials(session.user.email.as_deref()),
    };

    Ok(Json(Dashboard {
        user: session.user,
        initials,
        profile,
        accounts,
    }))
}

pub async fn profile_handler(
    State(state): State<AppState>,
) -> Result<Json<CustomerProfile>, AppError> {
    Ok(Json(state.profiles.my_profile().await?))
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<CustomerProfile>, AppError> {
    Ok(Json(state.profiles.update_profile(&request).await?))
}

fn email_initials(email: Option<&str>) -> String {
    let name = email
        .and_then(|email| email.split('@').next())
        .unwrap_or_default();
    let initials: String = name.chars().take(2).collect::<String>().to_uppercase();
    if initials.is_empty() {
        "U".to_string()
    } else {
        initials
    }
}
