use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::instrument;

use super::error::AppError;
use super::session::AuthSession;
use super::AppState;
use crate::domain::{Payment, PaymentStatus, Payout, PayoutStatus, Vendor};
use crate::finance::{self, EscrowOverview};
use crate::rental_actor::RentalFilter;

/// `{ "action": "approve" | "reject" }`
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub action: String,
}

/// GET /api/admin/finance
#[instrument(skip_all)]
pub async fn finance_overview(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<EscrowOverview>, AppError> {
    session.require_admin()?;
    let records = state.rental_client.list_rentals(RentalFilter::All).await?;
    Ok(Json(finance::escrow_overview(&records)))
}

#[derive(Debug, Deserialize)]
pub struct PayoutListQuery {
    #[serde(default)]
    pub status: Option<PayoutStatus>,
}

/// GET /api/admin/payouts?status=PENDING
#[instrument(skip_all)]
pub async fn list_payouts(
    State(state): State<AppState>,
    session: AuthSession,
    query: Result<Query<PayoutListQuery>, QueryRejection>,
) -> Result<Json<Vec<Payout>>, AppError> {
    session.require_admin()?;
    let Query(query) = query?;
    Ok(Json(state.payout_client.list_payouts(query.status).await?))
}

/// PATCH /api/admin/payouts/{id}
#[instrument(skip(state, session, payload))]
pub async fn process_payout(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<Json<Payout>, AppError> {
    session.require_admin()?;
    let Json(request) = payload?;
    Ok(Json(state.payout_client.process(id, &request.action).await?))
}

/// PATCH /api/admin/vendors/{id}
#[instrument(skip(state, session, payload))]
pub async fn review_vendor(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<Json<Vendor>, AppError> {
    session.require_admin()?;
    let Json(request) = payload?;
    Ok(Json(state.vendor_client.review(id, &request.action).await?))
}

#[derive(Debug, Deserialize)]
pub struct PaymentUpdate {
    pub status: PaymentStatus,
}

/// PATCH /api/admin/rentals/{id}/payment
#[instrument(skip(state, session, payload))]
pub async fn record_payment(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
    payload: Result<Json<PaymentUpdate>, JsonRejection>,
) -> Result<Json<Payment>, AppError> {
    session.require_admin()?;
    let Json(update) = payload?;
    Ok(Json(
        state.rental_client.record_payment(id, update.status).await?,
    ))
}
