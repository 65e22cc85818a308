use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use service_core::error::AppError;

use crate::models::product::{CreateProductRequest, FdProduct, ProductStatus, UpdateProductRequest};
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminConsole {
    pub total_products: usize,
    pub active_products: usize,
    pub products: Vec<FdProduct>,
}

pub async fn admin_console(State(state): State<AppState>) -> Result<Json<AdminConsole>, AppError> {
    let products = state.products.list_products().await?;
    let active_products = products
        .iter()
        .filter(|product| product.status == Some(ProductStatus::Active))
        .count();

    Ok(Json(AdminConsole {
        total_products: products.len(),
        active_products,
        products,
    }))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<FdProduct>>, AppError> {
    Ok(Json(state.products.list_products().await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_code): Path<String>,
) -> Result<Json<FdProduct>, AppError> {
    Ok(Json(state.products.get_product(&product_code).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<FdProduct>), AppError> {
    let product = state.products.create_product(&request).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_code): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<FdProduct>, AppError> {
    Ok(Json(
        state.products.update_product(&product_code, &request).await?,
    ))
}
