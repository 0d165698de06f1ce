use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::AppError;
use super::session::AuthSession;
use super::AppState;
use crate::domain::{BookingRequest, ProductStatus, RentalRecord, Role};
use crate::pricing::{self, PriceInput, Quote};
use crate::rental_actor::{AvailabilityQuery, RentalFilter};

/// POST /api/rentals
#[instrument(skip_all)]
pub async fn create_rental(
    State(state): State<AppState>,
    session: AuthSession,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RentalRecord>), AppError> {
    let Json(request) = payload?;
    let record = state
        .rental_client
        .create_rental(Some(session.0), request)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/rentals: the caller's own rentals, scoped by role.
#[instrument(skip_all)]
pub async fn list_rentals(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Vec<RentalRecord>>, AppError> {
    let filter = match session.0.role {
        Role::Admin => RentalFilter::All,
        Role::Vendor => RentalFilter::Vendor(session.vendor(&state).await?.id),
        Role::Customer => RentalFilter::Customer(session.customer_id(&state).await?),
    };
    Ok(Json(state.rental_client.list_rentals(filter).await?))
}

/// GET /api/rentals/{id}. Visible to its customer, its vendor and admins.
#[instrument(skip(state, session))]
pub async fn get_rental(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
) -> Result<Json<RentalRecord>, AppError> {
    let not_found = || AppError::NotFound(format!("Rental not found: {}", id));
    let record = state
        .rental_client
        .get_rental(id.clone())
        .await?
        .ok_or_else(not_found)?;

    let visible = match session.0.role {
        Role::Admin => true,
        Role::Vendor => session.vendor(&state).await?.id == record.rental.vendor_id,
        Role::Customer => session.customer_id(&state).await? == record.rental.customer_id,
    };
    if !visible {
        return Err(not_found());
    }
    Ok(Json(record))
}

/// POST /api/rentals/{id}/cancel
#[instrument(skip(state, session))]
pub async fn cancel_rental(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
) -> Result<Json<RentalRecord>, AppError> {
    let customer_id = session.customer_id(&state).await?;
    Ok(Json(state.rental_client.cancel_rental(id, customer_id).await?))
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// GET /api/availability?productId=..&variantId=..&start=..&end=..
#[instrument(skip_all)]
pub async fn check_availability(
    State(state): State<AppState>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let Query(query) = query?;
    let available = state.rental_client.check_availability(query).await?;
    Ok(Json(AvailabilityResponse { available }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub product_id: String,
    pub days: u32,
    /// Defaults to the product's listed deposit.
    #[serde(default)]
    pub deposit: Option<Decimal>,
}

/// POST /api/pricing/quote
#[instrument(skip_all)]
pub async fn quote(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<Quote>, AppError> {
    let Json(request) = payload?;
    let product = state
        .product_client
        .get_product(request.product_id.clone())
        .await?
        .filter(|p| p.status == ProductStatus::Active)
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {}", request.product_id)))?;
    let vendor = state
        .vendor_client
        .get_vendor(product.vendor_id.clone())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vendor not found: {}", product.vendor_id)))?;

    let quote = pricing::quote(&PriceInput {
        daily_price: product.daily_price,
        weekly_price: product.weekly_price,
        days: request.days,
        commission_rate: vendor.commission_rate,
        deposit: request.deposit.unwrap_or(product.deposit_amount),
    })?;
    Ok(Json(quote))
}
