use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use super::error::AppError;
use super::session::AuthSession;
use super::AppState;
use crate::domain::{Address, AddressCreate, Notification};

/// GET /api/addresses
#[instrument(skip_all)]
pub async fn list_addresses(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Vec<Address>>, AppError> {
    Ok(Json(
        state.address_client.list_for_user(session.0.user_id).await?,
    ))
}

/// POST /api/addresses
#[instrument(skip_all)]
pub async fn create_address(
    State(state): State<AppState>,
    session: AuthSession,
    payload: Result<Json<AddressCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Address>), AppError> {
    let Json(address) = payload?;
    let created = state
        .address_client
        .create_address(session.0.user_id, address)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/addresses/{id}/default
#[instrument(skip(state, session))]
pub async fn set_default_address(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
) -> Result<Json<Address>, AppError> {
    Ok(Json(
        state.address_client.set_default(session.0.user_id, id).await?,
    ))
}

/// GET /api/notifications
#[instrument(skip_all)]
pub async fn list_notifications(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(
        state
            .notification_client
            .list_for_user(session.0.user_id)
            .await?,
    ))
}

/// PATCH /api/notifications/{id}/read
#[instrument(skip(state, session))]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
) -> Result<Json<Notification>, AppError> {
    Ok(Json(
        state
            .notification_client
            .mark_read(session.0.user_id, id)
            .await?,
    ))
}
