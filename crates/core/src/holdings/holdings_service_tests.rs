#[cfg(test)]
mod tests {
    use crate::assets::{AssetKind, AssetRepositoryTrait, DigitalAsset};
    use crate::errors::{DatabaseError, LedgerError, Result};
    use crate::holdings::{
        AssetHolding, HoldingBuy, HoldingRepositoryTrait, HoldingSell, HoldingService,
        HoldingServiceTrait,
    };
    use crate::wallets::{NewWallet, Wallet, WalletRepositoryTrait, WalletType};
    use crate::Error;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct MockWalletRepository {
        wallets: Mutex<HashMap<String, Wallet>>,
    }

    #[async_trait]
    impl WalletRepositoryTrait for MockWalletRepository {
        async fn create(&self, _new_wallet: NewWallet) -> Result<Wallet> {
            unimplemented!("not exercised by holding tests")
        }

        fn get_by_id(&self, wallet_id: &str) -> Result<Wallet> {
            self.wallets
                .lock()
                .unwrap()
                .get(wallet_id)
                .cloned()
                .ok_or_else(|| {
                    Error::Ledger(LedgerError::WalletNotFound(wallet_id.to_string()))
                })
        }

        fn get_for_user(&self, _user_id: &str, _wallet_type: WalletType) -> Result<Wallet> {
            unimplemented!("not exercised by holding tests")
        }

        fn list_for_user(&self, _user_id: &str) -> Result<Vec<Wallet>> {
            Ok(Vec::new())
        }

        async fn adjust_balance(
            &self,
            _wallet_id: &str,
            _delta: Decimal,
            _expected_version: i64,
        ) -> Result<Wallet> {
            unimplemented!("not exercised by holding tests")
        }

        async fn deactivate(&self, _wallet_id: &str) -> Result<Wallet> {
            unimplemented!("not exercised by holding tests")
        }
    }

    struct MockHoldingRepository {
        holdings: Mutex<HashMap<(String, String), AssetHolding>>,
    }

    #[async_trait]
    impl HoldingRepositoryTrait for MockHoldingRepository {
        async fn record_buy(&self, buy: HoldingBuy) -> Result<AssetHolding> {
            let mut holdings = self.holdings.lock().unwrap();
            let key = (buy.wallet_id.clone(), buy.asset_symbol.clone());
            let now = Utc::now();
            let holding = holdings
                .entry(key)
                .and_modify(|h| h.apply_buy(buy.quantity, buy.unit_price, now))
                .or_insert_with(|| {
                    AssetHolding::from_first_buy(
                        &buy.wallet_id,
                        &buy.asset_symbol,
                        buy.quantity,
                        buy.unit_price,
                        now,
                    )
                });
            Ok(holding.clone())
        }

        async fn record_sell(&self, sell: HoldingSell) -> Result<AssetHolding> {
            let mut holdings = self.holdings.lock().unwrap();
            let key = (sell.wallet_id.clone(), sell.asset_symbol.clone());
            let holding = holdings.get_mut(&key).ok_or_else(|| {
                Error::Ledger(LedgerError::InsufficientHoldings {
                    wallet_id: sell.wallet_id.clone(),
                    symbol: sell.asset_symbol.clone(),
                    held: "0".to_string(),
                    requested: sell.quantity.to_string(),
                })
            })?;
            holding.apply_sell(sell.quantity, Utc::now())?;
            Ok(holding.clone())
        }

        fn get_holding(&self, wallet_id: &str, asset_symbol: &str) -> Result<AssetHolding> {
            self.holdings
                .lock()
                .unwrap()
                .get(&(wallet_id.to_string(), asset_symbol.to_string()))
                .cloned()
                .ok_or_else(|| {
                    Error::Database(DatabaseError::NotFound(asset_symbol.to_string()))
                })
        }

        fn list_for_wallet(&self, wallet_id: &str) -> Result<Vec<AssetHolding>> {
            let mut out: Vec<AssetHolding> = self
                .holdings
                .lock()
                .unwrap()
                .values()
                .filter(|h| h.wallet_id == wallet_id)
                .cloned()
                .collect();
            out.sort_by(|a, b| a.asset_symbol.cmp(&b.asset_symbol));
            Ok(out)
        }
    }

    struct MockAssetRepository {
        assets: Vec<DigitalAsset>,
    }

    impl AssetRepositoryTrait for MockAssetRepository {
        fn get_by_symbol(&self, symbol: &str) -> Result<DigitalAsset> {
            self.assets
                .iter()
                .find(|a| a.symbol == symbol)
                .cloned()
                .ok_or_else(|| Error::Ledger(LedgerError::ProductNotFound(symbol.to_string())))
        }

        fn list(&self, active_only: bool) -> Result<Vec<DigitalAsset>> {
            Ok(self
                .assets
                .iter()
                .filter(|a| !active_only || a.is_active)
                .cloned()
                .collect())
        }
    }

    fn asset(symbol: &str, is_active: bool) -> DigitalAsset {
        DigitalAsset {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            kind: AssetKind::Cryptocurrency,
            decimals: 8,
            exchange_rate: dec!(1),
            is_active,
        }
    }

    fn wallet(id: &str, wallet_type: WalletType, is_active: bool) -> Wallet {
        let now = Utc::now();
        Wallet {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            wallet_type,
            balance: Decimal::ZERO,
            pending_balance: Decimal::ZERO,
            currency: "USD".to_string(),
            daily_limit: None,
            monthly_limit: None,
            is_active,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn service_with(wallets: Vec<Wallet>) -> HoldingService {
        let wallet_repo = Arc::new(MockWalletRepository {
            wallets: Mutex::new(wallets.into_iter().map(|w| (w.id.clone(), w)).collect()),
        });
        let holding_repo = Arc::new(MockHoldingRepository {
            holdings: Mutex::new(HashMap::new()),
        });
        let asset_repo = Arc::new(MockAssetRepository {
            assets: vec![asset("BTC", true), asset("ETH", true), asset("LUNA", false)],
        });
        HoldingService::new(holding_repo, wallet_repo, asset_repo)
    }

    fn buy(wallet_id: &str, symbol: &str, quantity: Decimal, unit_price: Decimal) -> HoldingBuy {
        HoldingBuy {
            wallet_id: wallet_id.to_string(),
            asset_symbol: symbol.to_string(),
            quantity,
            unit_price,
        }
    }

    #[tokio::test]
    async fn test_buy_then_buy_upserts_one_position() {
        let service = service_with(vec![wallet("w-c", WalletType::Crypto, true)]);

        service
            .record_buy(buy("w-c", "BTC", dec!(1), dec!(100)))
            .await
            .unwrap();
        let h = service
            .record_buy(buy("w-c", "BTC", dec!(1), dec!(200)))
            .await
            .unwrap();

        assert_eq!(h.quantity, dec!(2));
        assert_eq!(h.average_buy_price, dec!(150));
        assert_eq!(service.list_holdings("w-c").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_buy_rejects_non_crypto_wallet() {
        let service = service_with(vec![wallet("w-p", WalletType::Primary, true)]);
        let err = service
            .record_buy(buy("w-p", "BTC", dec!(1), dec!(100)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InvalidStateTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_buy_rejects_inactive_wallet() {
        let service = service_with(vec![wallet("w-c", WalletType::Crypto, false)]);
        let err = service
            .record_buy(buy("w-c", "BTC", dec!(1), dec!(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::InactiveWallet(_))));
    }

    #[tokio::test]
    async fn test_buy_rejects_inactive_asset() {
        let service = service_with(vec![wallet("w-c", WalletType::Crypto, true)]);
        let err = service
            .record_buy(buy("w-c", "LUNA", dec!(10), dec!(0.01)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InvalidStateTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_buy_rejects_unknown_asset() {
        let service = service_with(vec![wallet("w-c", WalletType::Crypto, true)]);
        let err = service
            .record_buy(buy("w-c", "DOGE", dec!(1), dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_sell_without_position_is_insufficient() {
        let service = service_with(vec![wallet("w-c", WalletType::Crypto, true)]);
        let err = service
            .record_sell(HoldingSell {
                wallet_id: "w-c".to_string(),
                asset_symbol: "ETH".to_string(),
                quantity: dec!(1),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientHoldings { .. })
        ));
    }

    #[tokio::test]
    async fn test_sell_reduces_position() {
        let service = service_with(vec![wallet("w-c", WalletType::Crypto, true)]);
        service
            .record_buy(buy("w-c", "ETH", dec!(4), dec!(2000)))
            .await
            .unwrap();

        let h = service
            .record_sell(HoldingSell {
                wallet_id: "w-c".to_string(),
                asset_symbol: "ETH".to_string(),
                quantity: dec!(1.5),
            })
            .await
            .unwrap();

        assert_eq!(h.quantity, dec!(2.5));
        assert_eq!(h.average_buy_price, dec!(2000));
    }

    #[tokio::test]
    async fn test_list_holdings_sorted_and_readable_when_inactive() {
        let service = service_with(vec![wallet("w-c", WalletType::Crypto, true)]);
        service
            .record_buy(buy("w-c", "ETH", dec!(1), dec!(2000)))
            .await
            .unwrap();
        service
            .record_buy(buy("w-c", "BTC", dec!(1), dec!(60000)))
            .await
            .unwrap();

        let listed = service.list_holdings("w-c").unwrap();
        let symbols: Vec<&str> = listed.iter().map(|h| h.asset_symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTC", "ETH"]);
    }

    #[tokio::test]
    async fn test_list_holdings_unknown_wallet() {
        let service = service_with(vec![]);
        assert!(matches!(
            service.list_holdings("w-none").unwrap_err(),
            Error::Ledger(LedgerError::WalletNotFound(_))
        ));
    }
}
