use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use service_core::error::AppError;

use crate::models::session::Session;
use crate::navigation::{authorize, Route};
use crate::AppState;

/// Admin-only pages and APIs.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    guard(&state, Route::AdminConsole, request, next).await
}

/// Customer pages and APIs.
pub async fn require_customer(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    guard(&state, Route::Dashboard, request, next).await
}

/// Login and registration, which signed-in users skip.
pub async fn require_anonymous(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    guard(&state, Route::Login, request, next).await
}

/// Pages get a redirect; `/api` calls get a JSON error instead.
async fn guard(state: &AppState, route: Route, request: Request<Body>, next: Next) -> Response {
    let session = match state.session.current_session() {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read session in route guard");
            return AppError::from(e).into_response();
        }
    };

    let Err(target) = authorize(route, session.as_ref().map(|s| &s.user)) else {
        return next.run(request).await;
    };

    let path = request.uri().path().to_string();
    tracing::debug!(path = %path, redirect = target.path(), "Route guard rejected request");

    if !path.starts_with("/api/") {
        return Redirect::to(target.path()).into_response();
    }

    match target {
        Route::Login => AppError::SessionExpired(Route::Login.path().to_string()).into_response(),
        _ => AppError::Forbidden(anyhow::anyhow!("Not allowed for this account type"))
            .into_response(),
    }
}

/// The signed-in user's session; rejects with 401 when there is none.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.session.current_session()? {
            Some(session) => Ok(CurrentSession(session)),
            None => Err(AppError::Unauthorized(anyhow::anyhow!("Not signed in"))),
        }
    }
}
