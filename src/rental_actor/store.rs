use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::{
    Payment, PaymentStatus, Rental, RentalItem, RentalRecord, RentalStatus,
};
use crate::error::StoreError;

/// Tables held by the rental store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Rentals,
    RentalItems,
    Payments,
}

impl Table {
    fn name(self) -> &'static str {
        match self {
            Table::Rentals => "rentals",
            Table::RentalItems => "rental_items",
            Table::Payments => "payments",
        }
    }
}

/// Which rentals a listing returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentalFilter {
    All,
    Customer(String),
    Vendor(String),
}

impl RentalFilter {
    fn matches(&self, rental: &Rental) -> bool {
        match self {
            RentalFilter::All => true,
            RentalFilter::Customer(id) => &rental.customer_id == id,
            RentalFilter::Vendor(id) => &rental.vendor_id == id,
        }
    }
}

/// In-memory Rental / RentalItem / Payment tables.
///
/// Writes go through a [`Transaction`]: inserts are staged and only become
/// visible on [`Transaction::commit`]. Dropping a transaction discards it.
#[derive(Debug, Default)]
pub struct RentalStore {
    rentals: BTreeMap<String, Rental>,
    items: HashMap<String, RentalItem>,
    payments: HashMap<String, Payment>,
    items_by_rental: HashMap<String, Vec<String>>,
    payment_by_rental: HashMap<String, String>,
    order_numbers: HashSet<String>,
    #[cfg(test)]
    failing_table: Option<Table>,
}

impl RentalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Transaction<'_> {
        Transaction {
            store: self,
            rentals: Vec::new(),
            items: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// Make every subsequent write to `table` fail.
    #[cfg(test)]
    pub fn fail_writes_to(&mut self, table: Table) {
        self.failing_table = Some(table);
    }

    #[cfg(test)]
    fn check_writable(&self, table: Table) -> Result<(), StoreError> {
        if self.failing_table == Some(table) {
            return Err(StoreError::WriteFailed(table.name()));
        }
        Ok(())
    }

    #[cfg(not(test))]
    fn check_writable(&self, _table: Table) -> Result<(), StoreError> {
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rentals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rentals.is_empty()
    }

    pub fn has_order_number(&self, order_number: &str) -> bool {
        self.order_numbers.contains(order_number)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    /// Every (rental, item) pair, for availability checks.
    pub fn bookings(&self) -> impl Iterator<Item = (&Rental, &RentalItem)> + '_ {
        self.items.values().filter_map(|item| {
            self.rentals
                .get(&item.rental_id)
                .map(|rental| (rental, item))
        })
    }

    pub fn record(&self, rental_id: &str) -> Option<RentalRecord> {
        let rental = self.rentals.get(rental_id)?;
        let items: Vec<RentalItem> = self
            .items_by_rental
            .get(rental_id)
            .map(|ids| ids.iter().filter_map(|id| self.items.get(id)).cloned().collect())
            .unwrap_or_default();
        let payment = self
            .payment_by_rental
            .get(rental_id)
            .and_then(|id| self.payments.get(id))?;
        Some(RentalRecord {
            rental: rental.clone(),
            items,
            payment: payment.clone(),
        })
    }

    pub fn records(&self, filter: &RentalFilter) -> Vec<RentalRecord> {
        self.rentals
            .values()
            .filter(|rental| filter.matches(rental))
            .filter_map(|rental| self.record(&rental.id))
            .collect()
    }

    /// Moves a rental and its items to `status`. Transition rules are the
    /// caller's concern.
    pub fn set_status(
        &mut self,
        rental_id: &str,
        status: RentalStatus,
        tracking_number: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<RentalRecord, StoreError> {
        self.check_writable(Table::Rentals)?;
        let rental = self
            .rentals
            .get_mut(rental_id)
            .ok_or_else(|| StoreError::NotFound(rental_id.to_string()))?;
        rental.status = status;
        if tracking_number.is_some() {
            rental.tracking_number = tracking_number;
        }
        rental.updated_at = at;

        let item_status = status.item_status();
        if let Some(ids) = self.items_by_rental.get(rental_id) {
            for id in ids {
                if let Some(item) = self.items.get_mut(id) {
                    item.status = item_status;
                }
            }
        }

        self.record(rental_id)
            .ok_or_else(|| StoreError::NotFound(rental_id.to_string()))
    }

    pub fn set_payment_status(
        &mut self,
        rental_id: &str,
        status: PaymentStatus,
        at: DateTime<Utc>,
    ) -> Result<Payment, StoreError> {
        self.check_writable(Table::Payments)?;
        let payment = self
            .payment_by_rental
            .get(rental_id)
            .and_then(|id| self.payments.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(rental_id.to_string()))?;
        payment.status = status;
        if status == PaymentStatus::Completed && payment.paid_at.is_none() {
            payment.paid_at = Some(at);
        }
        Ok(payment.clone())
    }
}

/// Staged writes against a [`RentalStore`]; all-or-nothing.
pub struct Transaction<'a> {
    store: &'a mut RentalStore,
    rentals: Vec<Rental>,
    items: Vec<RentalItem>,
    payments: Vec<Payment>,
}

impl Transaction<'_> {
    fn staged_rental(&self, rental_id: &str) -> bool {
        self.rentals.iter().any(|r| r.id == rental_id)
    }

    pub fn insert_rental(&mut self, rental: Rental) -> Result<(), StoreError> {
        self.store.check_writable(Table::Rentals)?;
        let duplicate = self.store.order_numbers.contains(&rental.order_number)
            || self
                .rentals
                .iter()
                .any(|r| r.order_number == rental.order_number);
        if duplicate {
            return Err(StoreError::DuplicateOrderNumber(rental.order_number));
        }
        self.rentals.push(rental);
        Ok(())
    }

    pub fn insert_item(&mut self, item: RentalItem) -> Result<(), StoreError> {
        self.store.check_writable(Table::RentalItems)?;
        if !self.staged_rental(&item.rental_id) {
            return Err(StoreError::MissingParent {
                table: Table::RentalItems.name(),
                rental_id: item.rental_id,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn insert_payment(&mut self, payment: Payment) -> Result<(), StoreError> {
        self.store.check_writable(Table::Payments)?;
        if !self.staged_rental(&payment.rental_id) {
            return Err(StoreError::MissingParent {
                table: Table::Payments.name(),
                rental_id: payment.rental_id,
            });
        }
        if self.payments.iter().any(|p| p.rental_id == payment.rental_id) {
            return Err(StoreError::DuplicatePayment(payment.rental_id));
        }
        self.payments.push(payment);
        Ok(())
    }

    /// Applies every staged insert, or none when an aggregate is incomplete.
    pub fn commit(self) -> Result<(), StoreError> {
        for rental in &self.rentals {
            if !self.items.iter().any(|i| i.rental_id == rental.id) {
                warn!(rental_id = %rental.id, "Rejecting commit: rental without items");
                return Err(StoreError::Incomplete(format!("{} has no items", rental.id)));
            }
            if !self.payments.iter().any(|p| p.rental_id == rental.id) {
                warn!(rental_id = %rental.id, "Rejecting commit: rental without payment");
                return Err(StoreError::Incomplete(format!("{} has no payment", rental.id)));
            }
        }

        let Transaction {
            store,
            rentals,
            items,
            payments,
        } = self;

        debug!(
            rentals = rentals.len(),
            items = items.len(),
            payments = payments.len(),
            "Committing rental transaction"
        );

        for rental in rentals {
            store.order_numbers.insert(rental.order_number.clone());
            store.rentals.insert(rental.id.clone(), rental);
        }
        for item in items {
            store
                .items_by_rental
                .entry(item.rental_id.clone())
                .or_default()
                .push(item.id.clone());
            store.items.insert(item.id.clone(), item);
        }
        for payment in payments {
            store
                .payment_by_rental
                .insert(payment.rental_id.clone(), payment.id.clone());
            store.payments.insert(payment.id.clone(), payment);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::{AddressSnapshot, PaymentMethod};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    pub fn aggregate(n: u32, status: RentalStatus, payment: PaymentStatus) -> RentalRecord {
        let now = Utc::now();
        let rental_id = format!("rental_{}", n);
        let total = Decimal::from(100 * n);
        let fee = Decimal::from(10 * n);
        RentalRecord {
            rental: Rental {
                id: rental_id.clone(),
                order_number: format!("RS-TEST-{}", n),
                customer_id: "customer_1".into(),
                vendor_id: "vendor_1".into(),
                status,
                rental_start: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                rental_end: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                subtotal: total - fee,
                deposit_amount: Decimal::ZERO,
                delivery_fee: Decimal::ZERO,
                platform_fee: fee,
                tax_amount: Decimal::ZERO,
                total_amount: total,
                shipping_address: AddressSnapshot {
                    full_name: "Ada".into(),
                    line1: "1 Loop".into(),
                    line2: None,
                    city: "Utrecht".into(),
                    postal_code: "3511".into(),
                    country: "NL".into(),
                    phone: None,
                },
                tracking_number: None,
                created_at: now,
                updated_at: now,
            },
            items: vec![RentalItem {
                id: format!("rental_item_{}", n),
                rental_id: rental_id.clone(),
                product_id: "product_1".into(),
                variant_id: None,
                product_name: "Gown".into(),
                product_image: None,
                size: None,
                color: None,
                daily_price: Decimal::ZERO,
                weekly_price: None,
                rental_days: 6,
                subtotal: total - fee,
                status: status.item_status(),
            }],
            payment: Payment {
                id: format!("payment_{}", n),
                rental_id,
                amount: total,
                currency: "USD".into(),
                method: PaymentMethod::Card,
                status: payment,
                subtotal: total - fee,
                deposit_amount: Decimal::ZERO,
                delivery_fee: Decimal::ZERO,
                platform_fee: fee,
                tax_amount: Decimal::ZERO,
                paid_at: None,
                created_at: now,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::aggregate;
    use super::*;
    use crate::domain::RentalItemStatus;

    fn write(store: &mut RentalStore, record: RentalRecord) -> Result<(), StoreError> {
        let mut tx = store.begin();
        tx.insert_rental(record.rental)?;
        for item in record.items {
            tx.insert_item(item)?;
        }
        tx.insert_payment(record.payment)?;
        tx.commit()
    }

    #[test]
    fn test_commit_makes_aggregate_visible() {
        let mut store = RentalStore::new();
        write(
            &mut store,
            aggregate(1, RentalStatus::Pending, PaymentStatus::Pending),
        )
        .unwrap();

        let record = store.record("rental_1").unwrap();
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.payment.rental_id, "rental_1");
        assert_eq!(store.bookings().count(), 1);
    }

    #[test]
    fn test_failed_payment_insert_leaves_no_rows() {
        let mut store = RentalStore::new();
        store.fail_writes_to(Table::Payments);

        let result = write(
            &mut store,
            aggregate(1, RentalStatus::Pending, PaymentStatus::Pending),
        );

        assert_eq!(result, Err(StoreError::WriteFailed("payments")));
        assert!(store.is_empty());
        assert_eq!(store.item_count(), 0);
        assert_eq!(store.payment_count(), 0);
        assert!(store.record("rental_1").is_none());
    }

    #[test]
    fn test_commit_rejects_rental_without_payment() {
        let mut store = RentalStore::new();
        let record = aggregate(1, RentalStatus::Pending, PaymentStatus::Pending);
        let mut tx = store.begin();
        tx.insert_rental(record.rental).unwrap();
        tx.insert_item(record.items[0].clone()).unwrap();
        assert!(matches!(tx.commit(), Err(StoreError::Incomplete(_))));
        assert!(store.is_empty());
        assert_eq!(store.item_count(), 0);
    }

    #[test]
    fn test_child_rows_need_staged_parent() {
        let mut store = RentalStore::new();
        let record = aggregate(1, RentalStatus::Pending, PaymentStatus::Pending);
        let mut tx = store.begin();
        let result = tx.insert_item(record.items[0].clone());
        assert!(matches!(result, Err(StoreError::MissingParent { .. })));
    }

    #[test]
    fn test_duplicate_order_number_rejected() {
        let mut store = RentalStore::new();
        write(
            &mut store,
            aggregate(1, RentalStatus::Pending, PaymentStatus::Pending),
        )
        .unwrap();

        let mut clash = aggregate(2, RentalStatus::Pending, PaymentStatus::Pending);
        clash.rental.order_number = "RS-TEST-1".into();
        let result = write(&mut store, clash);
        assert_eq!(
            result,
            Err(StoreError::DuplicateOrderNumber("RS-TEST-1".into()))
        );
        assert_eq!(store.len(), 1);
        assert!(store.has_order_number("RS-TEST-1"));
        assert!(!store.has_order_number("RS-TEST-2"));
    }

    #[test]
    fn test_set_status_mirrors_items() {
        let mut store = RentalStore::new();
        write(
            &mut store,
            aggregate(1, RentalStatus::Pending, PaymentStatus::Pending),
        )
        .unwrap();
        assert_eq!(
            store.record("rental_1").unwrap().items[0].status,
            RentalItemStatus::Pending
        );

        let record = store
            .set_status(
                "rental_1",
                RentalStatus::Shipped,
                Some("TRACK-1".into()),
                Utc::now(),
            )
            .unwrap();
        assert_eq!(record.rental.status, RentalStatus::Shipped);
        assert_eq!(record.rental.tracking_number.as_deref(), Some("TRACK-1"));
        assert_eq!(record.items[0].status, RentalStatus::Shipped.item_status());
    }

    #[test]
    fn test_payment_completion_stamps_paid_at() {
        let mut store = RentalStore::new();
        write(
            &mut store,
            aggregate(1, RentalStatus::Delivered, PaymentStatus::Pending),
        )
        .unwrap();
        let at = Utc::now();
        let payment = store
            .set_payment_status("rental_1", PaymentStatus::Completed, at)
            .unwrap();
        assert_eq!(payment.paid_at, Some(at));
    }

    #[test]
    fn test_filters() {
        let mut store = RentalStore::new();
        let mut other = aggregate(2, RentalStatus::Pending, PaymentStatus::Pending);
        other.rental.vendor_id = "vendor_2".into();
        write(
            &mut store,
            aggregate(1, RentalStatus::Pending, PaymentStatus::Pending),
        )
        .unwrap();
        write(&mut store, other).unwrap();

        assert_eq!(store.records(&RentalFilter::All).len(), 2);
        assert_eq!(
            store.records(&RentalFilter::Vendor("vendor_2".into())).len(),
            1
        );
        assert_eq!(
            store
                .records(&RentalFilter::Customer("customer_9".into()))
                .len(),
            0
        );
    }
}
