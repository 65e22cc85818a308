use axum::{extract::State, Json};
use serde::Serialize;
use service_core::error::AppError;

use crate::models::fd::{CalculationRequest, CalculationResult};
use crate::models::product::{FdProduct, ProductStatus};
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorPage {
    pub products: Vec<FdProduct>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub result: CalculationResult,
    /// Set when the result was kept for the visitor to open after signing in.
    pub pending: bool,
}

/// Active products to pick from.
pub async fn calculator_page(State(state): State<AppState>) -> Result<Json<CalculatorPage>, AppError> {
    let products = state
        .products
        .list_products()
        .await?
        .into_iter()
        .filter(|product| matches!(product.status, Some(ProductStatus::Active) | None))
        .collect();

    Ok(Json(CalculatorPage { products }))
}

/// Calculations saved for the signed-in customer.
pub async fn history_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CalculationResult>>, AppError> {
    Ok(Json(state.calculator.history().await?))
}

pub async fn calculate_handler(
    State(state): State<AppState>,
    Json(request): Json<CalculationRequest>,
) -> Result<Json<CalculationResponse>, AppError> {
    let result = state.calculator.calculate(&request).await?;

    let mut pending = false;
    if !state.session.is_authenticated() {
        match state.pending.save(&result, &request.product_code) {
            Ok(_) => pending = true,
            Err(e) => tracing::warn!(error = %e, "Failed to keep calculation for after sign-in"),
        }
    }

    Ok(Json(CalculationResponse { result, pending }))
}
