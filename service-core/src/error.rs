use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Header understood by htmx-style front-ends as a client-side redirect.
pub const HX_REDIRECT_HEADER: &str = "hx-redirect";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(anyhow::Error),

    #[error("Forbidden: {0}")]
    Forbidden(anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Account locked: {0}")]
    Locked(String, Option<u64>),

    /// The session could not be renewed; the value is the login entry point.
    #[error("Session expired")]
    SessionExpired(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),

    #[error("Service Unavailable")]
    ServiceUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            redirect: Option<String>,
        }

        let mut retry_after = None;
        let mut redirect = None;

        let (status, error_message, details) = match self {
            AppError::ValidationError(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error".to_string(),
                Some(err.to_string()),
            ),
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None),
            AppError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err.to_string(), None),
            AppError::Forbidden(err) => (StatusCode::FORBIDDEN, err.to_string(), None),
            AppError::Conflict(err) => (StatusCode::CONFLICT, err.to_string(), None),
            AppError::Locked(msg, retry) => {
                retry_after = retry;
                (StatusCode::LOCKED, msg, None)
            }
            AppError::SessionExpired(login) => {
                redirect = Some(login);
                (
                    StatusCode::UNAUTHORIZED,
                    "Session expired, please sign in again".to_string(),
                    None,
                )
            }
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(format!("{:#}", err)),
            ),
            AppError::BadGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Bad Gateway: {}", msg),
                None,
            ),
            AppError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable".to_string(),
                None,
            ),
        };

        let mut res = (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
                redirect: redirect.clone(),
            }),
        )
            .into_response();

        if let Some(retry) = retry_after {
            res.headers_mut()
                .insert(axum::http::header::RETRY_AFTER, retry.into());
        }

        if let Some(location) = redirect
            && let Ok(value) = HeaderValue::from_str(&location)
        {
            res.headers_mut().insert(HX_REDIRECT_HEADER, value);
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_sets_retry_after() {
        let res = AppError::Locked("Account locked".into(), Some(90)).into_response();
        assert_eq!(res.status(), StatusCode::LOCKED);
        assert_eq!(res.headers()[axum::http::header::RETRY_AFTER], "90");
    }

    #[test]
    fn session_expired_redirects_to_login() {
        let res = AppError::SessionExpired("/login".into()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[HX_REDIRECT_HEADER], "/login");
    }

    #[test]
    fn service_unavailable_has_no_extra_headers() {
        let res = AppError::ServiceUnavailable.into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(res.headers().get(HX_REDIRECT_HEADER).is_none());
        assert!(res.headers().get(axum::http::header::RETRY_AFTER).is_none());
    }
}
