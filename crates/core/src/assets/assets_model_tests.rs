#[cfg(test)]
mod tests {
    use crate::assets::{AssetKind, DigitalAsset};
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_asset_kind_round_trip() {
        for kind in [
            AssetKind::Fiat,
            AssetKind::Cryptocurrency,
            AssetKind::Stablecoin,
            AssetKind::Cbdc,
        ] {
            assert_eq!(AssetKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(AssetKind::from_str("NFT").is_err());
    }

    #[test]
    fn test_asset_serialization() {
        let asset = DigitalAsset {
            symbol: "USDT".to_string(),
            name: "Tether".to_string(),
            kind: AssetKind::Stablecoin,
            decimals: 6,
            exchange_rate: dec!(1.0001),
            is_active: true,
        };
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["kind"], "STABLECOIN");
        assert_eq!(json["exchangeRate"], "1.0001");
        assert_eq!(json["isActive"], true);
    }
}
