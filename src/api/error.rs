//! HTTP error boundary.
//!
//! Every handler error ends up here and leaves as a JSON body
//! `{ "error": <message>, "details": { "code": <CODE> } }`. Persistence
//! failures are logged in full and answered with a generic message.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::error::{
    AddressError, BookingError, NotificationError, PayoutError, PricingError, ProductError,
    UserError, VendorError,
};

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: ErrorDetails,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// Missing or insufficient session.
    #[error("{0}")]
    Unauthorized(String),

    /// Absent, or not visible to the caller.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// Availability overlap, out-of-stock variant, already-processed state.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Persistence(String),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Authentication required".into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Persistence(detail) => {
                error!(error = %detail, "Request failed on persistence");
                "Something went wrong, please try again".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorBody {
            error: message,
            details: ErrorDetails { code: self.code() },
        });
        (self.status(), body).into_response()
    }
}

// ========== Conversions from domain errors ==========

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        let message = e.to_string();
        match e {
            BookingError::Unauthenticated | BookingError::NoCustomerProfile => {
                AppError::Unauthorized(message)
            }
            BookingError::ProductUnavailable(_)
            | BookingError::AddressNotFound(_)
            | BookingError::NotFound(_) => AppError::NotFound(message),
            BookingError::VariantOutOfStock(_)
            | BookingError::DateConflict { .. }
            | BookingError::InvalidTransition { .. } => AppError::Conflict(message),
            BookingError::InvalidRequest(_) => AppError::Validation(message),
            BookingError::TransactionFailure(_) | BookingError::ActorCommunicationError(_) => {
                AppError::Persistence(message)
            }
        }
    }
}

impl From<PayoutError> for AppError {
    fn from(e: PayoutError) -> Self {
        let message = e.to_string();
        match e {
            PayoutError::NotFound(_) => AppError::NotFound(message),
            PayoutError::AlreadyProcessed(_) => AppError::Conflict(message),
            PayoutError::InvalidAction(_)
            | PayoutError::InvalidAmount(_)
            | PayoutError::InsufficientBalance { .. } => AppError::Validation(message),
            PayoutError::ActorCommunicationError(_) => AppError::Persistence(message),
        }
    }
}

impl From<VendorError> for AppError {
    fn from(e: VendorError) -> Self {
        let message = e.to_string();
        match e {
            VendorError::NotFound(_) => AppError::NotFound(message),
            VendorError::AlreadyReviewed(_) => AppError::Conflict(message),
            VendorError::InvalidCommission(_)
            | VendorError::InvalidAction(_)
            | VendorError::ValidationError(_) => AppError::Validation(message),
            VendorError::ActorCommunicationError(_) => AppError::Persistence(message),
        }
    }
}

impl From<AddressError> for AppError {
    fn from(e: AddressError) -> Self {
        let message = e.to_string();
        match e {
            AddressError::NotFound(_) => AppError::NotFound(message),
            AddressError::ValidationError(_) => AppError::Validation(message),
            AddressError::ActorCommunicationError(_) => AppError::Persistence(message),
        }
    }
}

impl From<NotificationError> for AppError {
    fn from(e: NotificationError) -> Self {
        let message = e.to_string();
        match e {
            NotificationError::NotFound(_) => AppError::NotFound(message),
            NotificationError::ActorCommunicationError(_) => AppError::Persistence(message),
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        let message = e.to_string();
        match e {
            UserError::NotFound(_) => AppError::NotFound(message),
            UserError::ValidationError(_) => AppError::Validation(message),
            UserError::ActorCommunicationError(_) => AppError::Persistence(message),
        }
    }
}

impl From<ProductError> for AppError {
    fn from(e: ProductError) -> Self {
        let message = e.to_string();
        match e {
            ProductError::NotFound(_) => AppError::NotFound(message),
            ProductError::ValidationError(_) => AppError::Validation(message),
            ProductError::ActorCommunicationError(_) => AppError::Persistence(message),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<PricingError> for AppError {
    fn from(e: PricingError) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PayoutStatus, RentalStatus};
    use chrono::NaiveDate;

    #[test]
    fn test_booking_errors_are_distinguishable() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let conflict: AppError = BookingError::DateConflict {
            product_id: "product_1".into(),
            start: day,
            end: day,
        }
        .into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let invalid: AppError = BookingError::InvalidRequest("days".into()).into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let failed: AppError = BookingError::TransactionFailure("disk".into()).into();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let anonymous: AppError = BookingError::Unauthenticated.into();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let transition: AppError = BookingError::InvalidTransition {
            from: RentalStatus::Shipped,
            to: RentalStatus::Pending,
        }
        .into();
        assert_eq!(transition.code(), "CONFLICT");
    }

    #[test]
    fn test_processed_payout_is_a_conflict() {
        let e: AppError = PayoutError::AlreadyProcessed(PayoutStatus::Completed).into();
        assert_eq!(e.status(), StatusCode::CONFLICT);
        let e: AppError = PayoutError::InvalidAction("maybe".into()).into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
    }
}
