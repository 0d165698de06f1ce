use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{DateRange, Rental, RentalItem, RentalItemStatus, RentalStatus};

/// Is this product (or one variant of it) free for a date range?
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AvailabilityQuery {
    pub fn new(
        product_id: impl Into<String>,
        variant_id: Option<String>,
        period: DateRange,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id,
            start: period.start,
            end: period.end,
        }
    }

    pub fn period(&self) -> Option<DateRange> {
        DateRange::new(self.start, self.end)
    }
}

/// An existing line blocks the query when it is live on both levels, claims
/// the same inventory and its dates overlap.
///
/// Without a variant the check is product-wide. With one, only that variant
/// and product-wide (variant-less) bookings of the product can block it.
pub fn blocks(rental: &Rental, item: &RentalItem, query: &AvailabilityQuery) -> bool {
    if item.product_id != query.product_id {
        return false;
    }
    if item.status == RentalItemStatus::Cancelled || rental.status == RentalStatus::Cancelled {
        return false;
    }
    let same_inventory = match (&query.variant_id, &item.variant_id) {
        (None, _) => true,
        (Some(_), None) => true,
        (Some(wanted), Some(booked)) => wanted == booked,
    };
    if !same_inventory {
        return false;
    }
    match query.period() {
        Some(period) => rental.period().overlaps(&period),
        None => false,
    }
}

/// First booking that claims the queried inventory, if any.
pub fn find_conflict<'a, I>(bookings: I, query: &AvailabilityQuery) -> Option<&'a Rental>
where
    I: IntoIterator<Item = (&'a Rental, &'a RentalItem)>,
{
    bookings
        .into_iter()
        .find(|(rental, item)| blocks(rental, item, query))
        .map(|(rental, _)| rental)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AddressSnapshot;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn booking(variant: Option<&str>, start: u32, end: u32) -> (Rental, RentalItem) {
        let now = Utc::now();
        let rental = Rental {
            id: "rental_1".into(),
            order_number: "RS-1".into(),
            customer_id: "customer_1".into(),
            vendor_id: "vendor_1".into(),
            status: RentalStatus::Confirmed,
            rental_start: day(start),
            rental_end: day(end),
            subtotal: Decimal::ZERO,
            deposit_amount: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            platform_fee: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            shipping_address: AddressSnapshot {
                full_name: "A".into(),
                line1: "1 Road".into(),
                line2: None,
                city: "Town".into(),
                postal_code: "1000".into(),
                country: "NL".into(),
                phone: None,
            },
            tracking_number: None,
            created_at: now,
            updated_at: now,
        };
        let item = RentalItem {
            id: "rental_item_1".into(),
            rental_id: "rental_1".into(),
            product_id: "product_1".into(),
            variant_id: variant.map(str::to_string),
            product_name: "Gown".into(),
            product_image: None,
            size: None,
            color: None,
            daily_price: Decimal::ZERO,
            weekly_price: None,
            rental_days: end - start + 1,
            subtotal: Decimal::ZERO,
            status: RentalItemStatus::Confirmed,
        };
        (rental, item)
    }

    fn query(variant: Option<&str>, start: u32, end: u32) -> AvailabilityQuery {
        AvailabilityQuery {
            product_id: "product_1".into(),
            variant_id: variant.map(str::to_string),
            start: day(start),
            end: day(end),
        }
    }

    #[test]
    fn test_overlapping_dates_block() {
        let (rental, item) = booking(Some("v1"), 10, 15);
        assert!(blocks(&rental, &item, &query(Some("v1"), 12, 18)));
        assert!(blocks(&rental, &item, &query(Some("v1"), 15, 20)));
        assert!(!blocks(&rental, &item, &query(Some("v1"), 16, 20)));
    }

    #[test]
    fn test_cancelled_bookings_never_block() {
        let (mut rental, mut item) = booking(Some("v1"), 10, 15);
        item.status = RentalItemStatus::Cancelled;
        assert!(!blocks(&rental, &item, &query(Some("v1"), 10, 15)));

        item.status = RentalItemStatus::Confirmed;
        rental.status = RentalStatus::Cancelled;
        assert!(!blocks(&rental, &item, &query(Some("v1"), 10, 15)));
    }

    #[test]
    fn test_variant_scoping() {
        let (rental, item) = booking(Some("v1"), 10, 15);
        assert!(!blocks(&rental, &item, &query(Some("v2"), 10, 15)));
        // Product-wide query is blocked by any variant
        assert!(blocks(&rental, &item, &query(None, 10, 15)));

        let (rental, item) = booking(None, 10, 15);
        assert!(blocks(&rental, &item, &query(Some("v2"), 10, 15)));
    }

    #[test]
    fn test_other_products_ignored() {
        let (rental, mut item) = booking(None, 10, 15);
        item.product_id = "product_2".into();
        assert!(!blocks(&rental, &item, &query(None, 10, 15)));
    }

    #[test]
    fn test_find_conflict_returns_blocking_rental() {
        let (rental, item) = booking(Some("v1"), 10, 15);
        let bookings = vec![(&rental, &item)];
        assert_eq!(
            find_conflict(bookings.clone(), &query(Some("v1"), 1, 10)).map(|r| r.id.as_str()),
            Some("rental_1")
        );
        assert!(find_conflict(bookings, &query(Some("v1"), 1, 9)).is_none());
    }
}
