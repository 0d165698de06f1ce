use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::error::AppError;
use super::session::AuthSession;
use super::AppState;
use crate::domain::{Payout, RentalRecord, StatusUpdate};
use crate::finance::VendorEarnings;

/// PATCH /api/vendor/rentals/{id}
#[instrument(skip(state, session, payload))]
pub async fn update_rental_status(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<RentalRecord>, AppError> {
    let vendor = session.vendor(&state).await?;
    let Json(update) = payload?;
    let record = state
        .rental_client
        .update_status(id, vendor.id, update)
        .await?;
    Ok(Json(record))
}

/// GET /api/vendor/earnings
#[instrument(skip_all)]
pub async fn earnings(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<VendorEarnings>, AppError> {
    let vendor = session.vendor(&state).await?;
    Ok(Json(state.payout_client.earnings(vendor.id).await?))
}

/// GET /api/vendor/payouts
#[instrument(skip_all)]
pub async fn list_payouts(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Vec<Payout>>, AppError> {
    let vendor = session.vendor(&state).await?;
    Ok(Json(state.payout_client.list_for_vendor(vendor.id).await?))
}

#[derive(Debug, Deserialize)]
pub struct PayoutRequest {
    pub amount: Decimal,
}

/// POST /api/vendor/payouts
#[instrument(skip_all)]
pub async fn request_payout(
    State(state): State<AppState>,
    session: AuthSession,
    payload: Result<Json<PayoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Payout>), AppError> {
    let vendor = session.vendor(&state).await?;
    let Json(request) = payload?;
    let payout = state
        .payout_client
        .request_payout(vendor.id, request.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(payout)))
}
