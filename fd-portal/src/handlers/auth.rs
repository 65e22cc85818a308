use axum::{
    extract::State,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::error::{AppError, HX_REDIRECT_HEADER};

use crate::middleware::auth::CurrentSession;
use crate::models::auth::RegisterRequest;
use crate::models::session::{Session, UserInfo, UserType};
use crate::navigation::{home_for, Route};
use crate::session::PendingCalculation;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub redirect: &'static str,
    pub user: UserInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restored_calculation: Option<PendingCalculation>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_number: Option<String>,
    pub home: &'static str,
}

#[derive(Serialize)]
pub struct PageResponse {
    pub page: &'static str,
    pub submit: &'static str,
}

pub async fn login_page() -> Json<PageResponse> {
    Json(PageResponse {
        page: Route::Login.path(),
        submit: "/api/auth/login",
    })
}

pub async fn register_page() -> Json<PageResponse> {
    Json(PageResponse {
        page: Route::Register.path(),
        submit: "/api/auth/register",
    })
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Response, AppError> {
    let session = state.session.login(&form.email, &form.password).await?;
    Ok(signed_in(&state, session))
}

pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let session = state.session.register(&request).await?;
    Ok(signed_in(&state, session))
}

pub async fn logout_handler(State(state): State<AppState>) -> Response {
    state.session.logout().await;
    redirect_response(Route::Landing, serde_json::json!({ "redirect": Route::Landing.path() }))
}

pub async fn session_handler(CurrentSession(session): CurrentSession) -> Json<SessionResponse> {
    let home = home_for(session.user_type()).path();
    Json(SessionResponse {
        user: session.user,
        customer_number: session.customer_number,
        home,
    })
}

/// Post-login response. A calculation left by the anonymous visitor is
/// handed back once, to a customer; admins leave it in place.
fn signed_in(state: &AppState, session: Session) -> Response {
    let target = home_for(session.user_type());

    let restored_calculation = if session.user_type() == Some(&UserType::Admin) {
        None
    } else {
        match state.pending.take() {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to restore pending calculation");
                None
            }
        }
    };
    if let Some(pending) = &restored_calculation {
        tracing::info!(product_code = %pending.product_code, "Restored pending calculation after sign-in");
    }

    redirect_response(
        target,
        AuthResponse {
            redirect: target.path(),
            user: session.user,
            restored_calculation,
        },
    )
}

fn redirect_response<T: Serialize>(target: Route, body: T) -> Response {
    (
        [(
            HeaderName::from_static(HX_REDIRECT_HEADER),
            HeaderValue::from_static(target.path()),
        )],
        Json(body),
    )
        .into_response()
}
