use rust_decimal::{Decimal, RoundingStrategy};

/// Smallest display unit for every supported currency.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Half-up rounding to the currency's display precision.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
        assert_eq!(round_money(dec!(12.345)), dec!(12.35));
        assert_eq!(round_money(dec!(7)), dec!(7));
    }
}
