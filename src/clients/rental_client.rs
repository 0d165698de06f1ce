use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{BookingRequest, Payment, PaymentStatus, RentalRecord, Session, StatusUpdate};
use crate::error::BookingError;
use crate::messages::RentalRequest;
use crate::rental_actor::{AvailabilityQuery, RentalFilter};

/// Client for the rental service. All bookings go through this one actor.
#[derive(Clone)]
pub struct RentalClient {
    sender: mpsc::Sender<RentalRequest>,
}

impl RentalClient {
    pub fn new(sender: mpsc::Sender<RentalRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        debug!("Sending shutdown");
        let _ = self.sender.send(RentalRequest::Shutdown).await;
    }
}

client_method!(RentalClient => fn create_rental(session: Option<Session>, request: BookingRequest) -> RentalRecord as RentalRequest::CreateRental, Error = BookingError);
client_method!(RentalClient => fn get_rental(id: String) -> Option<RentalRecord> as RentalRequest::GetRental, Error = BookingError);
client_method!(RentalClient => fn list_rentals(filter: RentalFilter) -> Vec<RentalRecord> as RentalRequest::ListRentals, Error = BookingError);
client_method!(RentalClient => fn check_availability(query: AvailabilityQuery) -> bool as RentalRequest::CheckAvailability, Error = BookingError);
client_method!(RentalClient => fn update_status(rental_id: String, vendor_id: String, update: StatusUpdate) -> RentalRecord as RentalRequest::UpdateStatus, Error = BookingError);
client_method!(RentalClient => fn cancel_rental(rental_id: String, customer_id: String) -> RentalRecord as RentalRequest::CancelRental, Error = BookingError);
client_method!(RentalClient => fn record_payment(rental_id: String, status: PaymentStatus) -> Payment as RentalRequest::RecordPayment, Error = BookingError);

#[cfg(test)]
client_method!(RentalClient => fn fail_writes_to(table: crate::rental_actor::Table) -> () as RentalRequest::FailWritesTo, Error = BookingError);
