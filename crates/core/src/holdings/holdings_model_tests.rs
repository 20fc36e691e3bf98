#[cfg(test)]
mod tests {
    use crate::errors::LedgerError;
    use crate::holdings::{AssetHolding, HoldingBuy, HoldingSell};
    use crate::Error;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn holding(quantity: Decimal, average: Decimal) -> AssetHolding {
        AssetHolding {
            id: "h-1".to_string(),
            wallet_id: "w-1".to_string(),
            asset_symbol: "BTC".to_string(),
            quantity,
            average_buy_price: average,
            total_invested: quantity * average,
            last_transaction_at: Utc::now(),
        }
    }

    #[test]
    fn test_first_buy_sets_average_to_unit_price() {
        let h = AssetHolding::from_first_buy("w-1", "BTC", dec!(2), dec!(30000), Utc::now());
        assert_eq!(h.quantity, dec!(2));
        assert_eq!(h.average_buy_price, dec!(30000));
        assert_eq!(h.total_invested, dec!(60000));
    }

    #[test]
    fn test_buy_moves_weighted_average() {
        // 1 @ 100, then 1 @ 200 -> average 150.
        let mut h = holding(dec!(1), dec!(100));
        h.apply_buy(dec!(1), dec!(200), Utc::now());
        assert_eq!(h.quantity, dec!(2));
        assert_eq!(h.average_buy_price, dec!(150));
        assert_eq!(h.total_invested, dec!(300));
    }

    #[test]
    fn test_buy_weighted_average_uneven_quantities() {
        // 3 @ 10, then 1 @ 30 -> (30 + 30) / 4 = 15.
        let mut h = holding(dec!(3), dec!(10));
        h.apply_buy(dec!(1), dec!(30), Utc::now());
        assert_eq!(h.average_buy_price, dec!(15));
    }

    #[test]
    fn test_sell_keeps_average_reduces_invested_proportionally() {
        let mut h = holding(dec!(4), dec!(100));
        h.apply_sell(dec!(1), Utc::now()).unwrap();
        assert_eq!(h.quantity, dec!(3));
        assert_eq!(h.average_buy_price, dec!(100));
        assert_eq!(h.total_invested, dec!(300));
    }

    #[test]
    fn test_full_liquidation_zeroes_exactly() {
        // 0.3 of 0.3 must leave exact zeroes, not division residue.
        let mut h = holding(dec!(0.3), dec!(33333.33));
        h.apply_sell(dec!(0.3), Utc::now()).unwrap();
        assert_eq!(h.quantity, Decimal::ZERO);
        assert_eq!(h.total_invested, Decimal::ZERO);
    }

    #[test]
    fn test_oversell_is_rejected_and_leaves_holding_untouched() {
        let mut h = holding(dec!(1), dec!(100));
        let err = h.apply_sell(dec!(1.5), Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientHoldings { .. })
        ));
        assert_eq!(h.quantity, dec!(1));
        assert_eq!(h.total_invested, dec!(100));
    }

    #[test]
    fn test_buy_after_liquidation_restarts_average() {
        let mut h = holding(dec!(2), dec!(50));
        h.apply_sell(dec!(2), Utc::now()).unwrap();
        h.apply_buy(dec!(1), dec!(80), Utc::now());
        assert_eq!(h.average_buy_price, dec!(80));
        assert_eq!(h.total_invested, dec!(80));
    }

    #[test]
    fn test_buy_validation() {
        let buy = HoldingBuy {
            wallet_id: "w-1".to_string(),
            asset_symbol: "BTC".to_string(),
            quantity: dec!(0),
            unit_price: dec!(100),
        };
        assert!(buy.validate().is_err());

        let buy = HoldingBuy {
            quantity: dec!(1),
            unit_price: dec!(-1),
            ..buy
        };
        assert!(buy.validate().is_err());

        let buy = HoldingBuy {
            asset_symbol: "  ".to_string(),
            unit_price: dec!(100),
            ..buy
        };
        assert!(buy.validate().is_err());
    }

    #[test]
    fn test_sell_validation() {
        let sell = HoldingSell {
            wallet_id: "w-1".to_string(),
            asset_symbol: "ETH".to_string(),
            quantity: dec!(-0.5),
        };
        assert!(sell.validate().is_err());
    }

    #[test]
    fn test_holding_serializes_decimals_as_strings() {
        let h = holding(dec!(1.25), dec!(40000.00));
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["quantity"], "1.25");
        assert_eq!(json["averageBuyPrice"], "40000.00");
    }
}
