use reqwest::Method;

use crate::config::ServiceEndpoint;
use crate::error::ClientError;
use crate::models::product::{CreateProductRequest, FdProduct, UpdateProductRequest};
use crate::services::session_client::SessionClient;
use validator::Validate;

pub const PRODUCTS_PATH: &str = "/api/products";

/// Product catalogue, read by customers and maintained from the admin console.
pub struct ProductClient {
    session: SessionClient,
    endpoint: ServiceEndpoint,
}

impl ProductClient {
    pub fn new(session: SessionClient, endpoint: ServiceEndpoint) -> Self {
        Self { session, endpoint }
    }

    pub async fn list_products(&self) -> Result<Vec<FdProduct>, ClientError> {
        self.session
            .send_list(Method::GET, &self.endpoint, PRODUCTS_PATH, None)
            .await
    }

    pub async fn get_product(&self, product_code: &str) -> Result<FdProduct, ClientError> {
        self.session
            .send(Method::GET, &self.endpoint, &product_path(product_code), None)
            .await
    }

    pub async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> Result<FdProduct, ClientError> {
        request.validate_all()?;
        let body = serde_json::to_value(request)?;

        let product: FdProduct = self
            .session
            .send(Method::POST, &self.endpoint, PRODUCTS_PATH, Some(&body))
            .await?;
        tracing::info!(product_code = %product.product_code, "Product created");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        product_code: &str,
        request: &UpdateProductRequest,
    ) -> Result<FdProduct, ClientError> {
        request.validate()?;
        let body = serde_json::to_value(request)?;

        let product: FdProduct = self
            .session
            .send(Method::PUT, &self.endpoint, &product_path(product_code), Some(&body))
            .await?;
        tracing::info!(product_code, "Product updated");
        Ok(product)
    }
}

fn product_path(product_code: &str) -> String {
    format!("{}/{}", PRODUCTS_PATH, product_code.trim())
}
