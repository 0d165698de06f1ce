use tokio::sync::oneshot;

use crate::domain::{BookingRequest, Payment, PaymentStatus, RentalRecord, Session, StatusUpdate};
use crate::error::BookingError;
use crate::rental_actor::{AvailabilityQuery, RentalFilter};
#[cfg(test)]
use crate::rental_actor::Table;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Messages understood by the rental service. Each variant carries its
/// parameters and a oneshot channel for the reply.
#[derive(Debug)]
pub enum RentalRequest {
    CreateRental {
        session: Option<Session>,
        request: BookingRequest,
        respond_to: ServiceResponse<RentalRecord, BookingError>,
    },
    GetRental {
        id: String,
        respond_to: ServiceResponse<Option<RentalRecord>, BookingError>,
    },
    ListRentals {
        filter: RentalFilter,
        respond_to: ServiceResponse<Vec<RentalRecord>, BookingError>,
    },
    CheckAvailability {
        query: AvailabilityQuery,
        respond_to: ServiceResponse<bool, BookingError>,
    },
    UpdateStatus {
        rental_id: String,
        vendor_id: String,
        update: StatusUpdate,
        respond_to: ServiceResponse<RentalRecord, BookingError>,
    },
    CancelRental {
        rental_id: String,
        customer_id: String,
        respond_to: ServiceResponse<RentalRecord, BookingError>,
    },
    RecordPayment {
        rental_id: String,
        status: PaymentStatus,
        respond_to: ServiceResponse<Payment, BookingError>,
    },
    Shutdown,
    #[cfg(test)]
    FailWritesTo {
        table: Table,
        respond_to: ServiceResponse<(), BookingError>,
    },
}
