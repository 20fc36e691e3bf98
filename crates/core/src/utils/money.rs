use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{MONEY_DECIMAL_PRECISION, QUANTITY_DECIMAL_PRECISION};

/// Rounds a monetary amount to 2 decimal places, midpoint away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an asset quantity to 8 decimal places.
pub fn round_quantity(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        QUANTITY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
    }

    #[test]
    fn test_round_money_noop_on_two_places() {
        assert_eq!(round_money(dec!(42.50)), dec!(42.50));
    }

    #[test]
    fn test_round_quantity_eight_places() {
        assert_eq!(round_quantity(dec!(0.123456789)), dec!(0.12345679));
    }
}
