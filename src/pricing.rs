//! Canonical rental pricing.
//!
//! Every caller (checkout, cart preview, quote endpoint) goes through [`quote`],
//! so the amount a customer previews is the amount the order writer charges.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::round_money;
use crate::error::PricingError;

const DAYS_PER_WEEK: u32 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceInput {
    pub daily_price: Decimal,
    /// Applied to every full week once the stay reaches seven days.
    pub weekly_price: Option<Decimal>,
    pub days: u32,
    /// Platform commission in percent, 0-100.
    pub commission_rate: Decimal,
    pub deposit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub days: u32,
    pub subtotal: Decimal,
    pub platform_fee: Decimal,
    pub deposit: Decimal,
    pub delivery_fee: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Rental charge before fees: full weeks at the weekly rate (when one is
/// set and the stay is at least a week), remaining days at the daily rate.
pub fn rental_charge(daily_price: Decimal, weekly_price: Option<Decimal>, days: u32) -> Decimal {
    match weekly_price {
        Some(weekly) if days >= DAYS_PER_WEEK => {
            let weeks = days / DAYS_PER_WEEK;
            let remainder = days % DAYS_PER_WEEK;
            weekly * Decimal::from(weeks) + daily_price * Decimal::from(remainder)
        }
        _ => daily_price * Decimal::from(days),
    }
}

pub fn quote(input: &PriceInput) -> Result<Quote, PricingError> {
    if input.days < 1 {
        return Err(PricingError::InvalidDays(input.days));
    }
    if input.commission_rate < Decimal::ZERO || input.commission_rate > Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidCommission(input.commission_rate));
    }
    if input.daily_price < Decimal::ZERO {
        return Err(PricingError::NegativeAmount("daily price"));
    }
    if input.weekly_price.is_some_and(|w| w < Decimal::ZERO) {
        return Err(PricingError::NegativeAmount("weekly price"));
    }
    if input.deposit < Decimal::ZERO {
        return Err(PricingError::NegativeAmount("deposit"));
    }

    let subtotal = round_money(rental_charge(
        input.daily_price,
        input.weekly_price,
        input.days,
    ));
    let platform_fee = round_money(subtotal * input.commission_rate / Decimal::ONE_HUNDRED);
    // Delivery and tax have no collaborator yet.
    let delivery_fee = Decimal::ZERO;
    let tax_amount = Decimal::ZERO;
    let total = subtotal + input.deposit + platform_fee + delivery_fee + tax_amount;

    Ok(Quote {
        days: input.days,
        subtotal,
        platform_fee,
        deposit: input.deposit,
        delivery_fee,
        tax_amount,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(days: u32, weekly: Option<Decimal>) -> PriceInput {
        PriceInput {
            daily_price: dec!(100),
            weekly_price: weekly,
            days,
            commission_rate: dec!(10),
            deposit: dec!(0),
        }
    }

    #[test]
    fn test_quote_is_deterministic() {
        for deposit in [dec!(0), dec!(25), dec!(199.99)] {
            let mut req = input(5, None);
            req.deposit = deposit;
            let first = quote(&req).unwrap();
            assert_eq!(first.subtotal, dec!(500));
            assert_eq!(first.platform_fee, dec!(50));
            assert_eq!(first.total, dec!(500) + deposit + dec!(50));
            assert_eq!(quote(&req).unwrap(), first);
        }
    }

    #[test]
    fn test_total_matches_component_sum() {
        let q = quote(&PriceInput {
            daily_price: dec!(33.33),
            weekly_price: None,
            days: 3,
            commission_rate: dec!(12.5),
            deposit: dec!(40),
        })
        .unwrap();
        assert_eq!(q.subtotal, dec!(99.99));
        // 99.99 * 12.5% = 12.49875 -> 12.50
        assert_eq!(q.platform_fee, dec!(12.50));
        assert_eq!(
            q.total,
            q.subtotal + q.deposit + q.platform_fee + q.delivery_fee + q.tax_amount
        );
    }

    #[test]
    fn test_weekly_blend_boundaries() {
        let weekly = Some(dec!(600));
        assert_eq!(quote(&input(6, weekly)).unwrap().subtotal, dec!(600));
        assert_eq!(quote(&input(7, weekly)).unwrap().subtotal, dec!(600));
        // 1 week + 6 days
        assert_eq!(quote(&input(13, weekly)).unwrap().subtotal, dec!(1200));
        assert_eq!(quote(&input(14, weekly)).unwrap().subtotal, dec!(1200));
        assert_eq!(quote(&input(15, weekly)).unwrap().subtotal, dec!(1300));
    }

    #[test]
    fn test_no_weekly_price_uses_daily_rate() {
        assert_eq!(quote(&input(14, None)).unwrap().subtotal, dec!(1400));
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(quote(&input(0, None)), Err(PricingError::InvalidDays(0)));

        let mut bad_rate = input(2, None);
        bad_rate.commission_rate = dec!(101);
        assert_eq!(
            quote(&bad_rate),
            Err(PricingError::InvalidCommission(dec!(101)))
        );

        let mut bad_deposit = input(2, None);
        bad_deposit.deposit = dec!(-1);
        assert_eq!(
            quote(&bad_deposit),
            Err(PricingError::NegativeAmount("deposit"))
        );
    }
}
