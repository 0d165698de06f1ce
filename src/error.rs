use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::{PayoutStatus, RentalStatus, VendorStatus};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum VendorError {
    #[error("Vendor not found: {0}")]
    NotFound(String),
    #[error("Commission rate must be between 0 and 100, got {0}")]
    InvalidCommission(Decimal),
    #[error("Vendor has already been reviewed ({0:?})")]
    AlreadyReviewed(VendorStatus),
    #[error("Unknown vendor review action: {0}")]
    InvalidAction(String),
    #[error("Vendor validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AddressError {
    #[error("Address not found: {0}")]
    NotFound(String),
    #[error("Address validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PayoutError {
    #[error("Payout not found: {0}")]
    NotFound(String),
    #[error("Payout has already been processed ({0:?})")]
    AlreadyProcessed(PayoutStatus),
    #[error("Invalid payout action: {0}")]
    InvalidAction(String),
    #[error("Invalid payout amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("Rental must last at least one day, got {0}")]
    InvalidDays(u32),
    #[error("Commission rate must be between 0 and 100, got {0}")]
    InvalidCommission(Decimal),
    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),
}

/// Rental store failures. Any of these aborts the surrounding transaction.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Duplicate order number: {0}")]
    DuplicateOrderNumber(String),
    #[error("{table} references missing rental {rental_id}")]
    MissingParent {
        table: &'static str,
        rental_id: String,
    },
    #[error("Rental {0} already has a payment")]
    DuplicatePayment(String),
    #[error("Incomplete rental aggregate: {0}")]
    Incomplete(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Write to {0} failed")]
    WriteFailed(&'static str),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookingError {
    #[error("Please sign in to book a rental")]
    Unauthenticated,
    #[error("A customer profile is required to book a rental")]
    NoCustomerProfile,
    #[error("Product is not available for rent: {0}")]
    ProductUnavailable(String),
    #[error("Selected variant is out of stock: {0}")]
    VariantOutOfStock(String),
    #[error("Product {product_id} is already booked between {start} and {end}")]
    DateConflict {
        product_id: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("Shipping address not found: {0}")]
    AddressNotFound(String),
    #[error("Invalid booking request: {0}")]
    InvalidRequest(String),
    #[error("Booking could not be saved: {0}")]
    TransactionFailure(String),
    #[error("Rental not found: {0}")]
    NotFound(String),
    #[error("Cannot move rental from {from:?} to {to:?}")]
    InvalidTransition { from: RentalStatus, to: RentalStatus },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<StoreError> for BookingError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => BookingError::NotFound(id),
            other => BookingError::TransactionFailure(other.to_string()),
        }
    }
}

impl From<PricingError> for BookingError {
    fn from(e: PricingError) -> Self {
        BookingError::InvalidRequest(e.to_string())
    }
}

/// Unwrap entity errors and fold channel failures into the domain error.
macro_rules! impl_from_framework_error {
    ($($error:ident),* $(,)?) => {
        $(
            impl From<FrameworkError<$error>> for $error {
                fn from(e: FrameworkError<$error>) -> Self {
                    match e {
                        FrameworkError::Entity(inner) => inner,
                        FrameworkError::NotFound(id) => $error::NotFound(id),
                        other => $error::ActorCommunicationError(other.to_string()),
                    }
                }
            }
        )*
    };
}

impl_from_framework_error!(
    UserError,
    VendorError,
    ProductError,
    AddressError,
    NotificationError,
    PayoutError,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_errors_fold_into_domain_errors() {
        let not_found: PayoutError = FrameworkError::NotFound("payout_9".into()).into();
        assert_eq!(not_found, PayoutError::NotFound("payout_9".into()));

        let closed: UserError = FrameworkError::<UserError>::ActorClosed.into();
        assert!(matches!(closed, UserError::ActorCommunicationError(_)));

        let inner: PayoutError =
            FrameworkError::Entity(PayoutError::AlreadyProcessed(PayoutStatus::Completed)).into();
        assert_eq!(inner, PayoutError::AlreadyProcessed(PayoutStatus::Completed));
    }

    #[test]
    fn test_store_errors_become_transaction_failures() {
        let e: BookingError = StoreError::WriteFailed("payments").into();
        assert!(matches!(e, BookingError::TransactionFailure(_)));
    }
}
