use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::availability::{find_conflict, AvailabilityQuery};
use super::store::RentalStore;
use crate::actor_framework::sequential_ids;
use crate::clients::{AddressClient, ProductClient, RentalClient, UserClient, VendorClient};
use crate::domain::{
    AddressSnapshot, BookingRequest, DateRange, Payment, PaymentMethod, PaymentStatus, Product,
    ProductStatus, ProductVariant, Rental, RentalItem, RentalRecord, RentalStatus, Session,
    StatusUpdate, Vendor,
};
use crate::error::{AddressError, BookingError};
use crate::messages::{RentalRequest, ServiceResponse};
use crate::pricing::{self, PriceInput, Quote};

/// Collaborators the rental service consults while validating a booking.
#[derive(Clone)]
pub struct BookingDeps {
    pub user_client: UserClient,
    pub product_client: ProductClient,
    pub vendor_client: VendorClient,
    pub address_client: AddressClient,
}

/// Root actor for the booking workflow.
///
/// It owns the rental store and handles one message at a time, so the
/// availability check and the insert of a booking can never interleave with
/// another booking: two overlapping requests are decided strictly in order.
pub struct RentalService {
    receiver: mpsc::Receiver<RentalRequest>,
    deps: BookingDeps,
    store: RentalStore,
    currency: String,
    next_rental_id: Box<dyn Fn() -> String + Send + Sync>,
    next_item_id: Box<dyn Fn() -> String + Send + Sync>,
    next_payment_id: Box<dyn Fn() -> String + Send + Sync>,
}

impl RentalService {
    pub fn new(
        buffer_size: usize,
        deps: BookingDeps,
        currency: impl Into<String>,
    ) -> (Self, RentalClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            deps,
            store: RentalStore::new(),
            currency: currency.into(),
            next_rental_id: Box::new(sequential_ids("rental")),
            next_item_id: Box::new(sequential_ids("rental_item")),
            next_payment_id: Box::new(sequential_ids("payment")),
        };
        (service, RentalClient::new(sender))
    }

    #[instrument(name = "rental_service", skip(self))]
    pub async fn run(mut self) {
        info!("RentalService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                RentalRequest::CreateRental {
                    session,
                    request,
                    respond_to,
                } => {
                    self.handle_create_rental(session, request, respond_to)
                        .await;
                }
                RentalRequest::GetRental { id, respond_to } => {
                    self.handle_get_rental(id, respond_to);
                }
                RentalRequest::ListRentals { filter, respond_to } => {
                    let records = self.store.records(&filter);
                    debug!(count = records.len(), "Listed rentals");
                    let _ = respond_to.send(Ok(records));
                }
                RentalRequest::CheckAvailability { query, respond_to } => {
                    self.handle_check_availability(query, respond_to);
                }
                RentalRequest::UpdateStatus {
                    rental_id,
                    vendor_id,
                    update,
                    respond_to,
                } => {
                    self.handle_update_status(rental_id, vendor_id, update, respond_to);
                }
                RentalRequest::CancelRental {
                    rental_id,
                    customer_id,
                    respond_to,
                } => {
                    self.handle_cancel_rental(rental_id, customer_id, respond_to);
                }
                RentalRequest::RecordPayment {
                    rental_id,
                    status,
                    respond_to,
                } => {
                    self.handle_record_payment(rental_id, status, respond_to);
                }
                RentalRequest::Shutdown => {
                    info!("RentalService shutting down");
                    break;
                }
                #[cfg(test)]
                RentalRequest::FailWritesTo { table, respond_to } => {
                    self.store.fail_writes_to(table);
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!("RentalService stopped");
    }

    #[instrument(
        fields(
            product_id = %request.product_id,
            variant_id = ?request.variant_id,
            start = %request.start_date,
            end = %request.end_date,
            days = request.days
        ),
        skip(self, session, request, respond_to)
    )]
    async fn handle_create_rental(
        &mut self,
        session: Option<Session>,
        request: BookingRequest,
        respond_to: ServiceResponse<RentalRecord, BookingError>,
    ) {
        info!("Processing create_rental request");

        let result = self.create_rental(session, request).await;
        match &result {
            Ok(record) => info!(
                rental_id = %record.rental.id,
                order_number = %record.rental.order_number,
                total = %record.rental.total_amount,
                "Rental created successfully"
            ),
            Err(BookingError::TransactionFailure(reason)) => {
                error!(reason = %reason, "Rental transaction rolled back")
            }
            Err(e) => warn!(error = %e, "Rental rejected"),
        }

        let _ = respond_to.send(result);
    }

    /// Checks run in a fixed order and the first failure wins; nothing is
    /// written until all of them pass.
    async fn create_rental(
        &mut self,
        session: Option<Session>,
        request: BookingRequest,
    ) -> Result<RentalRecord, BookingError> {
        // Step 1: authenticated customer
        let session = session.ok_or(BookingError::Unauthenticated)?;
        let user = self
            .deps
            .user_client
            .get_user(session.user_id.clone())
            .await
            .map_err(|e| BookingError::ActorCommunicationError(e.to_string()))?
            .ok_or(BookingError::Unauthenticated)?;
        let customer_id = user.customer_id.ok_or(BookingError::NoCustomerProfile)?;

        let period = DateRange::new(request.start_date, request.end_date).ok_or_else(|| {
            BookingError::InvalidRequest("end date must not be before start date".into())
        })?;
        // The billed day count must cover exactly the dates being blocked.
        if request.days != period.days() {
            return Err(BookingError::InvalidRequest(format!(
                "{} to {} is {} days, request says {}",
                period.start,
                period.end,
                period.days(),
                request.days
            )));
        }

        // Step 2: active product from a known vendor
        let (product, vendor) = self.load_product(&request).await?;

        // Step 3: static catalog availability of the variant
        let variant = match &request.variant_id {
            Some(variant_id) => Some(
                product
                    .variant(variant_id)
                    .filter(|v| v.is_rentable())
                    .cloned()
                    .ok_or_else(|| BookingError::VariantOutOfStock(variant_id.clone()))?,
            ),
            None => None,
        };

        // Step 4: no overlapping live booking
        let query = AvailabilityQuery::new(&product.id, request.variant_id.clone(), period);
        if let Some(existing) = find_conflict(self.store.bookings(), &query) {
            debug!(conflicting_rental = %existing.id, "Overlapping booking found");
            return Err(BookingError::DateConflict {
                product_id: product.id.clone(),
                start: period.start,
                end: period.end,
            });
        }

        // Step 5: address owned by the caller
        let address = self
            .deps
            .address_client
            .resolve(&session.user_id, &request.address_id)
            .await
            .map_err(|e| match e {
                AddressError::NotFound(id) => BookingError::AddressNotFound(id),
                other => BookingError::ActorCommunicationError(other.to_string()),
            })?;

        if request.daily_price != product.daily_price {
            warn!(
                requested = %request.daily_price,
                catalog = %product.daily_price,
                "Client daily price differs from catalog, charging catalog price"
            );
        }

        let quote = pricing::quote(&PriceInput {
            daily_price: product.daily_price,
            weekly_price: product.weekly_price,
            days: period.days(),
            commission_rate: vendor.commission_rate,
            deposit: request.deposit_amount,
        })?;

        let draft = DraftRental {
            customer_id,
            product: &product,
            variant: variant.as_ref(),
            period,
            days: period.days(),
            quote: &quote,
            shipping_address: AddressSnapshot::from(&address),
            method: PaymentMethod::from_tag(&request.payment_method),
        };
        self.commit(draft, Utc::now())
    }

    async fn load_product(
        &self,
        request: &BookingRequest,
    ) -> Result<(Product, Vendor), BookingError> {
        let product = self
            .deps
            .product_client
            .get_product(request.product_id.clone())
            .await
            .map_err(|e| BookingError::ActorCommunicationError(e.to_string()))?
            .filter(|p| p.status == ProductStatus::Active)
            .ok_or_else(|| BookingError::ProductUnavailable(request.product_id.clone()))?;

        if product.vendor_id != request.vendor_id {
            return Err(BookingError::InvalidRequest(format!(
                "product {} is not sold by vendor {}",
                product.id, request.vendor_id
            )));
        }

        let vendor = self
            .deps
            .vendor_client
            .get_vendor(product.vendor_id.clone())
            .await
            .map_err(|e| BookingError::ActorCommunicationError(e.to_string()))?
            .ok_or_else(|| BookingError::ProductUnavailable(product.id.clone()))?;

        Ok((product, vendor))
    }

    /// Writes rental, item and payment in one transaction.
    fn commit(&mut self, draft: DraftRental<'_>, now: DateTime<Utc>) -> Result<RentalRecord, BookingError> {
        let rental_id = (self.next_rental_id)();
        let quote = draft.quote;
        let order_number =
            unique_order_number(now, |n| self.store.has_order_number(n), order_number);

        let rental = Rental {
            id: rental_id.clone(),
            order_number,
            customer_id: draft.customer_id,
            vendor_id: draft.product.vendor_id.clone(),
            status: RentalStatus::Pending,
            rental_start: draft.period.start,
            rental_end: draft.period.end,
            subtotal: quote.subtotal,
            deposit_amount: quote.deposit,
            delivery_fee: quote.delivery_fee,
            platform_fee: quote.platform_fee,
            tax_amount: quote.tax_amount,
            total_amount: quote.total,
            shipping_address: draft.shipping_address,
            tracking_number: None,
            created_at: now,
            updated_at: now,
        };

        let item = RentalItem {
            id: (self.next_item_id)(),
            rental_id: rental_id.clone(),
            product_id: draft.product.id.clone(),
            variant_id: draft.variant.map(|v| v.id.clone()),
            product_name: draft.product.name.clone(),
            product_image: draft.product.first_image().map(str::to_string),
            size: draft.variant.and_then(|v| v.size.clone()),
            color: draft.variant.and_then(|v| v.color.clone()),
            daily_price: draft.product.daily_price,
            weekly_price: draft.product.weekly_price,
            rental_days: draft.days,
            subtotal: quote.subtotal,
            status: RentalStatus::Pending.item_status(),
        };

        let payment = Payment {
            id: (self.next_payment_id)(),
            rental_id: rental_id.clone(),
            amount: quote.total,
            currency: self.currency.clone(),
            method: draft.method,
            status: PaymentStatus::Pending,
            subtotal: quote.subtotal,
            deposit_amount: quote.deposit,
            delivery_fee: quote.delivery_fee,
            platform_fee: quote.platform_fee,
            tax_amount: quote.tax_amount,
            paid_at: None,
            created_at: now,
        };

        let mut tx = self.store.begin();
        tx.insert_rental(rental)?;
        tx.insert_item(item)?;
        tx.insert_payment(payment)?;
        tx.commit()?;

        self.store.record(&rental_id).ok_or_else(|| {
            BookingError::TransactionFailure(format!("{} missing after commit", rental_id))
        })
    }

    #[instrument(fields(rental_id = %id), skip(self, respond_to))]
    fn handle_get_rental(
        &self,
        id: String,
        respond_to: ServiceResponse<Option<RentalRecord>, BookingError>,
    ) {
        debug!("Processing get_rental request");
        let record = self.store.record(&id);
        match &record {
            Some(record) => debug!(status = ?record.rental.status, "Rental found"),
            None => debug!("Rental not found"),
        }
        let _ = respond_to.send(Ok(record));
    }

    #[instrument(fields(product_id = %query.product_id), skip(self, respond_to))]
    fn handle_check_availability(
        &self,
        query: AvailabilityQuery,
        respond_to: ServiceResponse<bool, BookingError>,
    ) {
        let result = match query.period() {
            Some(_) => {
                let available = find_conflict(self.store.bookings(), &query).is_none();
                debug!(available, "Availability checked");
                Ok(available)
            }
            None => Err(BookingError::InvalidRequest(
                "end date must not be before start date".into(),
            )),
        };
        let _ = respond_to.send(result);
    }

    #[instrument(fields(rental_id = %rental_id, vendor_id = %vendor_id, status = ?update.status), skip(self, update, respond_to))]
    fn handle_update_status(
        &mut self,
        rental_id: String,
        vendor_id: String,
        update: StatusUpdate,
        respond_to: ServiceResponse<RentalRecord, BookingError>,
    ) {
        let result = self
            .owned_rental(&rental_id, |r| r.vendor_id == vendor_id)
            .and_then(|current| {
                self.transition(&rental_id, current, update.status, update.tracking_number)
            });
        if let Ok(record) = &result {
            info!(status = ?record.rental.status, "Rental status updated");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(rental_id = %rental_id, customer_id = %customer_id), skip(self, respond_to))]
    fn handle_cancel_rental(
        &mut self,
        rental_id: String,
        customer_id: String,
        respond_to: ServiceResponse<RentalRecord, BookingError>,
    ) {
        let result = self
            .owned_rental(&rental_id, |r| r.customer_id == customer_id)
            .and_then(|current| self.transition(&rental_id, current, RentalStatus::Cancelled, None));
        if result.is_ok() {
            info!("Rental cancelled by customer");
        }
        let _ = respond_to.send(result);
    }

    /// Status of a rental the caller may act on. Rentals owned by someone
    /// else are reported as missing.
    fn owned_rental(
        &self,
        rental_id: &str,
        owns: impl Fn(&Rental) -> bool,
    ) -> Result<RentalStatus, BookingError> {
        self.store
            .record(rental_id)
            .filter(|record| owns(&record.rental))
            .map(|record| record.rental.status)
            .ok_or_else(|| BookingError::NotFound(rental_id.to_string()))
    }

    fn transition(
        &mut self,
        rental_id: &str,
        from: RentalStatus,
        to: RentalStatus,
        tracking_number: Option<String>,
    ) -> Result<RentalRecord, BookingError> {
        if !from.can_transition_to(to) {
            return Err(BookingError::InvalidTransition { from, to });
        }
        Ok(self
            .store
            .set_status(rental_id, to, tracking_number, Utc::now())?)
    }

    #[instrument(fields(rental_id = %rental_id, status = ?status), skip(self, respond_to))]
    fn handle_record_payment(
        &mut self,
        rental_id: String,
        status: PaymentStatus,
        respond_to: ServiceResponse<Payment, BookingError>,
    ) {
        let result = self
            .store
            .set_payment_status(&rental_id, status, Utc::now())
            .map_err(BookingError::from);
        if result.is_ok() {
            info!("Payment status recorded");
        }
        let _ = respond_to.send(result);
    }
}

/// Everything needed to write one booking, validated and priced.
struct DraftRental<'a> {
    customer_id: String,
    product: &'a Product,
    variant: Option<&'a ProductVariant>,
    period: DateRange,
    days: u32,
    quote: &'a Quote,
    shipping_address: AddressSnapshot,
    method: PaymentMethod,
}

/// Human-readable, unique order number: `RS-YYYYMMDD-XXXXXXXX`.
fn order_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("RS-{}-{}", now.format("%Y%m%d"), suffix)
}

/// Draws order numbers until one is not already taken.
fn unique_order_number(
    now: DateTime<Utc>,
    is_taken: impl Fn(&str) -> bool,
    mut generate: impl FnMut(DateTime<Utc>) -> String,
) -> String {
    loop {
        let candidate = generate(now);
        if !is_taken(&candidate) {
            return candidate;
        }
        warn!(order_number = %candidate, "Order number collision, drawing another");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colliding_order_number_is_redrawn() {
        let mut drawn = vec!["RS-20250110-BBBBBBBB", "RS-20250110-AAAAAAAA", "RS-20250110-AAAAAAAA"];
        let number = unique_order_number(
            Utc::now(),
            |n| n == "RS-20250110-AAAAAAAA",
            |_| drawn.pop().unwrap().to_string(),
        );
        assert_eq!(number, "RS-20250110-BBBBBBBB");
        assert!(drawn.is_empty());
    }

    #[test]
    fn test_order_number_shape() {
        let now = Utc::now();
        let number = order_number(now);
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "RS");
        assert_eq!(parts[1], now.format("%Y%m%d").to_string());
        assert_eq!(parts[2].len(), 8);
        assert_ne!(order_number(now), number);
    }
}
