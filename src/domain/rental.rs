use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AddressSnapshot;

/// Rental header lifecycle. Declaration order is the forward progression;
/// `Cancelled` sits outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Active,
    Returned,
    Cancelled,
}

impl RentalStatus {
    /// Forward-only progression; cancellation only before the parcel ships.
    pub fn can_transition_to(self, next: RentalStatus) -> bool {
        match (self, next) {
            (Self::Cancelled, _) | (Self::Returned, _) => false,
            (current, Self::Cancelled) => current < Self::Shipped,
            (current, next) => next > current,
        }
    }

    /// The order has progressed past mere placement and counts towards
    /// vendor earnings.
    pub fn is_earning(self) -> bool {
        matches!(self, Self::Delivered | Self::Active | Self::Returned)
    }

    /// Item-level status mirrored from the header.
    pub fn item_status(self) -> RentalItemStatus {
        match self {
            Self::Pending => RentalItemStatus::Pending,
            Self::Confirmed | Self::Processing | Self::Shipped => RentalItemStatus::Confirmed,
            Self::Delivered | Self::Active => RentalItemStatus::Active,
            Self::Returned => RentalItemStatus::Returned,
            Self::Cancelled => RentalItemStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalItemStatus {
    Pending,
    Confirmed,
    Active,
    Returned,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CashOnDelivery,
    Card,
}

impl PaymentMethod {
    /// `"cod"` selects cash on delivery; any other tag is a card payment.
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("cod") {
            Self::CashOnDelivery
        } else {
            Self::Card
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// Inclusive calendar date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Calendar days covered, counting both ends.
    pub fn days(&self) -> u32 {
        let span = (self.end - self.start).num_days() + 1;
        u32::try_from(span).unwrap_or(u32::MAX)
    }

    /// Both ends inclusive: a same-day handover counts as an overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

/// Header for one booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: String,
    pub order_number: String,
    pub customer_id: String,
    pub vendor_id: String,
    pub status: RentalStatus,
    pub rental_start: NaiveDate,
    pub rental_end: NaiveDate,
    pub subtotal: Decimal,
    pub deposit_amount: Decimal,
    pub delivery_fee: Decimal,
    pub platform_fee: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub shipping_address: AddressSnapshot,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rental {
    pub fn period(&self) -> DateRange {
        DateRange {
            start: self.rental_start,
            end: self.rental_end,
        }
    }

    /// What the vendor keeps once the platform fee is taken.
    pub fn vendor_net(&self) -> Decimal {
        self.total_amount - self.platform_fee
    }
}

/// One rented product line. Display fields and prices are captured at
/// booking time and never follow later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalItem {
    pub id: String,
    pub rental_id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub product_name: String,
    pub product_image: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub daily_price: Decimal,
    pub weekly_price: Option<Decimal>,
    pub rental_days: u32,
    pub subtotal: Decimal,
    pub status: RentalItemStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub rental_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub subtotal: Decimal,
    pub deposit_amount: Decimal,
    pub delivery_fee: Decimal,
    pub platform_fee: Decimal,
    pub tax_amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A rental together with its items and payment, as committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalRecord {
    #[serde(flatten)]
    pub rental: Rental,
    pub items: Vec<RentalItem>,
    pub payment: Payment,
}

/// Checkout request as sent by the storefront.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub vendor_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
    pub daily_price: Decimal,
    pub deposit_amount: Decimal,
    pub address_id: String,
    pub payment_method: String,
}

/// Vendor-driven change of a rental's status and/or tracking number.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: RentalStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_overlap_is_symmetric_and_reflexive() {
        let ranges: Vec<DateRange> = (1..=6)
            .flat_map(|s| (s..=7).map(move |e| DateRange::new(day(s), day(e)).unwrap()))
            .collect();

        for a in &ranges {
            assert!(a.overlaps(a));
            for b in &ranges {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_overlap_boundaries_are_inclusive() {
        let booked = DateRange::new(day(10), day(15)).unwrap();
        assert!(booked.overlaps(&DateRange::new(day(12), day(18)).unwrap()));
        assert!(booked.overlaps(&DateRange::new(day(15), day(20)).unwrap()));
        assert!(!booked.overlaps(&DateRange::new(day(16), day(20)).unwrap()));
        assert!(!booked.overlaps(&DateRange::new(day(1), day(9)).unwrap()));
    }

    #[test]
    fn test_date_range_rejects_reversed_dates() {
        assert!(DateRange::new(day(5), day(4)).is_none());
        assert!(DateRange::new(day(5), day(5)).is_some());
    }

    #[test]
    fn test_day_count_includes_both_ends() {
        assert_eq!(DateRange::new(day(5), day(5)).unwrap().days(), 1);
        assert_eq!(DateRange::new(day(10), day(15)).unwrap().days(), 6);
        assert_eq!(DateRange::new(day(1), day(30)).unwrap().days(), 30);
    }

    #[test]
    fn test_status_progression() {
        use RentalStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Shipped));
        assert!(!Shipped.can_transition_to(Confirmed));
        assert!(!Delivered.can_transition_to(Delivered));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Returned.can_transition_to(Active));
        assert!(!Cancelled.can_transition_to(Confirmed));
    }

    #[test]
    fn test_payment_method_tags() {
        assert_eq!(PaymentMethod::from_tag("cod"), PaymentMethod::CashOnDelivery);
        assert_eq!(PaymentMethod::from_tag("COD"), PaymentMethod::CashOnDelivery);
        assert_eq!(PaymentMethod::from_tag("card"), PaymentMethod::Card);
        assert_eq!(PaymentMethod::from_tag("upi"), PaymentMethod::Card);
    }
}
