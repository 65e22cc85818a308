use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::middleware::request_id_middleware;
use service_core::observability::REQUEST_ID_HEADER;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    accounts::{get_account, list_accounts, open_account},
    admin::{admin_console, create_product, get_product, list_products, update_product},
    app::{health_check, index},
    auth::{
        login_handler, login_page, logout_handler, register_handler, register_page,
        session_handler,
    },
    calculator::{calculate_handler, calculator_page, history_handler},
    user::{dashboard_handler, profile_handler, update_profile_handler},
};
use crate::middleware::auth::{require_admin, require_anonymous, require_customer};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let anonymous = Router::new()
        .route("/login", get(login_page))
        .route("/register", get(register_page))
        .route_layer(from_fn_with_state(state.clone(), require_anonymous));

    let admin = Router::new()
        .route("/admin", get(admin_console))
        .route("/api/admin/products", get(list_products).post(create_product))
        .route(
            "/api/admin/products/:code",
            get(get_product).put(update_product),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let customer = Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/profile", get(profile_handler).put(update_profile_handler))
        .route("/api/accounts", get(list_accounts).post(open_account))
        .route("/api/accounts/:number", get(get_account))
        .route("/api/calculator/history", get(history_handler))
        .route_layer(from_fn_with_state(state.clone(), require_customer));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/calculator", get(calculator_page))
        .route("/api/calculator", post(calculate_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/session", get(session_handler))
        .merge(anonymous)
        .merge(admin)
        .merge(customer)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
