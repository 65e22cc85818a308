use axum::{extract::State, Json};
use serde::Serialize;

use crate::navigation::{home_for, Route};
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<&'static str>,
    pub calculator: &'static str,
    pub login: &'static str,
    pub register: &'static str,
}

pub async fn index(State(state): State<AppState>) -> Json<LandingResponse> {
    let session = state.session.current_session().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to read session for landing page");
        None
    });

    Json(LandingResponse {
        authenticated: session.is_some(),
        home: session.map(|s| home_for(s.user_type()).path()),
        calculator: Route::Calculator.path(),
        login: Route::Login.path(),
        register: Route::Register.path(),
    })
}

pub async fn health_check() -> &'static str {
    "OK"
}
