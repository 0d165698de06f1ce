//! Escrow and vendor earnings, recomputed on every read from the committed
//! rentals and payouts.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{PaymentStatus, Payout, PayoutStatus, RentalRecord, RentalStatus};
use crate::error::PayoutError;

/// Mutually exclusive escrow bucket of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscrowBucket {
    /// Paid, not yet returned.
    InEscrow,
    /// Returned and paid.
    Released,
    /// Returned, payment still awaiting settlement.
    PendingRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    EscrowHold,
    EscrowRelease,
}

/// Returns `None` for rentals that are neither paid nor returned.
pub fn classify(record: &RentalRecord) -> Option<EscrowBucket> {
    let returned = record.rental.status == RentalStatus::Returned;
    let paid = record.payment.status == PaymentStatus::Completed;
    match (returned, paid) {
        (false, true) => Some(EscrowBucket::InEscrow),
        (true, true) => Some(EscrowBucket::Released),
        (true, false) => Some(EscrowBucket::PendingRelease),
        (false, false) => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowTransaction {
    pub id: String,
    pub rental_id: String,
    pub order_number: String,
    pub customer_id: String,
    pub vendor_id: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub rental_status: RentalStatus,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub bucket: EscrowBucket,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketTotal {
    pub count: usize,
    pub amount: Decimal,
}

impl BucketTotal {
    fn add(&mut self, amount: Decimal) {
        self.count += 1;
        self.amount += amount;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowTotals {
    pub in_escrow: BucketTotal,
    pub released: BucketTotal,
    pub pending_release: BucketTotal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowOverview {
    pub transactions: Vec<EscrowTransaction>,
    pub totals: EscrowTotals,
}

/// Admin finance view over a snapshot of rentals.
pub fn escrow_overview<'a>(records: impl IntoIterator<Item = &'a RentalRecord>) -> EscrowOverview {
    let mut overview = EscrowOverview::default();

    for record in records {
        let Some(bucket) = classify(record) else {
            continue;
        };
        let amount = record.payment.amount;
        match bucket {
            EscrowBucket::InEscrow => overview.totals.in_escrow.add(amount),
            EscrowBucket::Released => overview.totals.released.add(amount),
            EscrowBucket::PendingRelease => overview.totals.pending_release.add(amount),
        }
        overview.transactions.push(EscrowTransaction {
            id: record.payment.id.clone(),
            rental_id: record.rental.id.clone(),
            order_number: record.rental.order_number.clone(),
            customer_id: record.rental.customer_id.clone(),
            vendor_id: record.rental.vendor_id.clone(),
            amount,
            status: record.payment.status,
            rental_status: record.rental.status,
            kind: match bucket {
                EscrowBucket::InEscrow => TransactionType::EscrowHold,
                EscrowBucket::Released | EscrowBucket::PendingRelease => {
                    TransactionType::EscrowRelease
                }
            },
            bucket,
        });
    }

    overview
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorEarnings {
    /// Net of platform fees over delivered, active and returned rentals.
    pub lifetime_earnings: Decimal,
    pub paid_out: Decimal,
    /// Lifetime earnings minus completed payouts.
    pub pending_balance: Decimal,
    /// Requested payouts not yet decided.
    pub outstanding_requests: Decimal,
    /// What a new payout request may still claim.
    pub available_for_payout: Decimal,
    pub earning_rentals: usize,
}

/// `records` and `payouts` are expected to be scoped to one vendor already.
pub fn vendor_earnings<'a>(
    records: impl IntoIterator<Item = &'a RentalRecord>,
    payouts: impl IntoIterator<Item = &'a Payout>,
) -> VendorEarnings {
    let mut earnings = VendorEarnings::default();

    for record in records {
        if record.rental.status.is_earning() {
            earnings.lifetime_earnings += record.rental.vendor_net();
            earnings.earning_rentals += 1;
        }
    }

    for payout in payouts {
        match payout.status {
            PayoutStatus::Completed => earnings.paid_out += payout.amount,
            PayoutStatus::Pending | PayoutStatus::Processing => {
                earnings.outstanding_requests += payout.amount
            }
            PayoutStatus::Rejected => {}
        }
    }

    earnings.pending_balance = earnings.lifetime_earnings - earnings.paid_out;
    earnings.available_for_payout =
        (earnings.pending_balance - earnings.outstanding_requests).max(Decimal::ZERO);
    earnings
}

/// A payout request must be positive and fit in the unclaimed balance.
pub fn check_payout_eligibility(
    earnings: &VendorEarnings,
    amount: Decimal,
) -> Result<(), PayoutError> {
    if amount <= Decimal::ZERO {
        return Err(PayoutError::InvalidAmount(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    if amount > earnings.available_for_payout {
        return Err(PayoutError::InsufficientBalance {
            requested: amount,
            available: earnings.available_for_payout,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rental_actor::store::fixtures::aggregate;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn payout(amount: Decimal, status: PayoutStatus) -> Payout {
        Payout {
            id: "payout_x".into(),
            vendor_id: "vendor_1".into(),
            amount,
            status,
            requested_at: Utc::now(),
            processed_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_escrow_buckets_partition_paid_or_returned_rentals() {
        let statuses = [
            RentalStatus::Pending,
            RentalStatus::Confirmed,
            RentalStatus::Shipped,
            RentalStatus::Delivered,
            RentalStatus::Active,
            RentalStatus::Returned,
            RentalStatus::Cancelled,
        ];
        let payments = [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ];
        let records: Vec<RentalRecord> = statuses
            .iter()
            .flat_map(|s| payments.iter().map(move |p| (*s, *p)))
            .enumerate()
            .map(|(n, (s, p))| aggregate(n as u32 + 1, s, p))
            .collect();

        let overview = escrow_overview(&records);
        let totals = &overview.totals;

        let eligible = records
            .iter()
            .filter(|r| {
                r.payment.status == PaymentStatus::Completed
                    || r.rental.status == RentalStatus::Returned
            })
            .count();
        assert_eq!(
            totals.in_escrow.count + totals.released.count + totals.pending_release.count,
            eligible
        );
        assert_eq!(overview.transactions.len(), eligible);

        let mut ids: Vec<&str> = overview
            .transactions
            .iter()
            .map(|t| t.rental_id.as_str())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), eligible, "a rental landed in two buckets");

        // one returned+completed rental
        assert_eq!(totals.released.count, 1);
        // returned with pending, failed or refunded payment
        assert_eq!(totals.pending_release.count, 3);
    }

    #[test]
    fn test_transaction_type_follows_bucket() {
        let held = aggregate(1, RentalStatus::Shipped, PaymentStatus::Completed);
        let released = aggregate(2, RentalStatus::Returned, PaymentStatus::Completed);
        let overview = escrow_overview([&held, &released]);

        assert_eq!(overview.transactions[0].kind, TransactionType::EscrowHold);
        assert_eq!(overview.transactions[1].kind, TransactionType::EscrowRelease);
        assert_eq!(overview.totals.in_escrow.amount, dec!(100));
        assert_eq!(overview.totals.released.amount, dec!(200));
    }

    #[test]
    fn test_vendor_earnings_only_count_progressed_rentals() {
        // total 100n, fee 10n
        let records = vec![
            aggregate(1, RentalStatus::Pending, PaymentStatus::Pending),
            aggregate(2, RentalStatus::Delivered, PaymentStatus::Completed),
            aggregate(3, RentalStatus::Returned, PaymentStatus::Completed),
            aggregate(4, RentalStatus::Cancelled, PaymentStatus::Refunded),
        ];
        let payouts = vec![
            payout(dec!(100), PayoutStatus::Completed),
            payout(dec!(50), PayoutStatus::Pending),
            payout(dec!(500), PayoutStatus::Rejected),
        ];

        let earnings = vendor_earnings(&records, &payouts);
        assert_eq!(earnings.earning_rentals, 2);
        assert_eq!(earnings.lifetime_earnings, dec!(180) + dec!(270));
        assert_eq!(earnings.paid_out, dec!(100));
        assert_eq!(earnings.pending_balance, dec!(350));
        assert_eq!(earnings.outstanding_requests, dec!(50));
        assert_eq!(earnings.available_for_payout, dec!(300));
    }

    #[test]
    fn test_payout_eligibility() {
        let earnings = VendorEarnings {
            available_for_payout: dec!(300),
            ..Default::default()
        };
        assert!(check_payout_eligibility(&earnings, dec!(300)).is_ok());
        assert!(matches!(
            check_payout_eligibility(&earnings, dec!(0)),
            Err(PayoutError::InvalidAmount(_))
        ));
        assert_eq!(
            check_payout_eligibility(&earnings, dec!(300.01)),
            Err(PayoutError::InsufficientBalance {
                requested: dec!(300.01),
                available: dec!(300),
            })
        );
    }
}
