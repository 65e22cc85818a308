use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;

use crate::models::account::{FdAccount, OpenAccountRequest};
use crate::AppState;

/// Either an explicit request or a request to open the account from the
/// calculation kept before sign-in.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum OpenAccountBody {
    FromPending {
        #[serde(rename = "usePendingCalculation")]
        use_pending_calculation: bool,
    },
    Explicit(OpenAccountRequest),
}

pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<FdAccount>>, AppError> {
    Ok(Json(state.accounts.list_accounts().await?))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<FdAccount>, AppError> {
    Ok(Json(state.accounts.get_account(&account_number).await?))
}

pub async fn open_account(
    State(state): State<AppState>,
    Json(body): Json<OpenAccountBody>,
) -> Result<(StatusCode, Json<FdAccount>), AppError> {
    let request = match body {
        OpenAccountBody::Explicit(request) => request,
        OpenAccountBody::FromPending {
            use_pending_calculation: false,
        } => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Account details or usePendingCalculation are required"
            )));
        }
        OpenAccountBody::FromPending {
            use_pending_calculation: true,
        } => {
            let pending = state
                .pending
                .take()
                .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?
                .ok_or_else(|| {
                    AppError::BadRequest(anyhow::anyhow!("No pending calculation to open"))
                })?;

            OpenAccountRequest {
                product_code: pending.product_code,
                principal_amount: pending.result.principal_amount,
                tenure_months: pending.result.tenure_months,
                customer_number: None,
                calculation_id: pending.result.calculation_id,
            }
        }
    };

    let account = state.accounts.open_account(&request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}
