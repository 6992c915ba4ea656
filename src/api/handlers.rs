use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use super::AppState;
use super::dto::{
    AuthenticateRequest, AuthenticateResponse, TransferRequest, TransferResponse, UserEntry,
    user_listing,
};
use super::error::ApiError;
use crate::{AccountId, TransferOrder};

/// POST /api/authenticate
pub async fn authenticate(
    State(state): State<AppState>,
    body: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> Result<Json<AuthenticateResponse>, ApiError> {
    let Json(req) = body?;
    let name = req.name.unwrap_or_default();
    let pin = req.pin_number.unwrap_or_default();

    let summary = state.engine.authenticate(&name, &pin)?;
    Ok(Json(summary.into()))
}

/// POST /api/bank-transfer
pub async fn bank_transfer(
    State(state): State<AppState>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError> {
    let Json(req) = body?;
    let order = TransferOrder::from(req);

    let receipt = state.engine.transfer(&order)?;
    Ok(Json(receipt.into()))
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Json<BTreeMap<AccountId, UserEntry>> {
    Json(user_listing(&state.engine.accounts(), state.expose_pins))
}
