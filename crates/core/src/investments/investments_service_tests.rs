#[cfg(test)]
mod tests {
    use crate::errors::{LedgerError, Result};
    use crate::investments::{
        InvestmentProduct, InvestmentRepositoryTrait, InvestmentService, InvestmentServiceTrait,
        InvestmentStatus, NewInvestment, UserInvestment,
    };
    use crate::investments::InvestmentProductRepositoryTrait;
    use crate::wallets::{NewWallet, Wallet, WalletRepositoryTrait, WalletType};
    use crate::Error;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct EngineState {
        wallets: HashMap<String, Wallet>,
        investments: HashMap<String, UserInvestment>,
    }

    struct MockWalletRepository {
        state: Arc<Mutex<EngineState>>,
    }

    #[async_trait]
    impl WalletRepositoryTrait for MockWalletRepository {
        async fn create(&self, _new_wallet: NewWallet) -> Result<Wallet> {
            unimplemented!("not exercised by investment tests")
        }

        fn get_by_id(&self, wallet_id: &str) -> Result<Wallet> {
            self.state
                .lock()
                .unwrap()
                .wallets
                .get(wallet_id)
                .cloned()
                .ok_or_else(|| {
                    Error::Ledger(LedgerError::WalletNotFound(wallet_id.to_string()))
                })
        }

        fn get_for_user(&self, user_id: &str, wallet_type: WalletType) -> Result<Wallet> {
            self.state
                .lock()
                .unwrap()
                .wallets
                .values()
                .find(|w| w.user_id == user_id && w.wallet_type == wallet_type)
                .cloned()
                .ok_or_else(|| Error::Ledger(LedgerError::WalletNotFound(user_id.to_string())))
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
            unimplemented!("not exercised by investment tests")
        }

        async fn deactivate(&self, _wallet_id: &str) -> Result<Wallet> {
            unimplemented!("not exercised by investment tests")
        }
    }

    struct MockProductRepository {
        products: Vec<InvestmentProduct>,
    }

    impl InvestmentProductRepositoryTrait for MockProductRepository {
        fn get_by_id(&self, product_id: &str) -> Result<InvestmentProduct> {
            self.products
                .iter()
                .find(|p| p.id == product_id)
                .cloned()
                .ok_or_else(|| {
                    Error::Ledger(LedgerError::ProductNotFound(product_id.to_string()))
                })
        }

        fn list(&self, active_only: bool) -> Result<Vec<InvestmentProduct>> {
            Ok(self
                .products
                .iter()
                .filter(|p| !active_only || p.is_active)
                .cloned()
                .collect())
        }
    }

    /// In-memory repository mirroring the storage atomic units: the wallet
    /// mutation and the position row change commit together under one lock.
    struct MockInvestmentRepository {
        state: Arc<Mutex<EngineState>>,
    }

    impl MockInvestmentRepository {
        fn funding_wallet_of(state: &EngineState, investment: &UserInvestment) -> String {
            state
                .wallets
                .values()
                .find(|w| {
                    w.user_id == investment.user_id && w.wallet_type == WalletType::Primary
                })
                .map(|w| w.id.clone())
                .expect("funding wallet seeded")
        }
    }

    #[async_trait]
    impl InvestmentRepositoryTrait for MockInvestmentRepository {
        async fn open(&self, new_investment: NewInvestment) -> Result<UserInvestment> {
            let mut state = self.state.lock().unwrap();
            let wallet = state
                .wallets
                .get(&new_investment.funding_wallet_id)
                .ok_or_else(|| {
                    Error::Ledger(LedgerError::WalletNotFound(
                        new_investment.funding_wallet_id.clone(),
                    ))
                })?;
            let new_balance = wallet.apply_delta(-new_investment.principal_amount)?;
            let wallet = state
                .wallets
                .get_mut(&new_investment.funding_wallet_id)
                .unwrap();
            wallet.balance = new_balance;
            wallet.version += 1;

            let id = format!("inv-{}", state.investments.len() + 1);
            let investment = UserInvestment {
                id: id.clone(),
                user_id: new_investment.user_id,
                product_id: new_investment.product_id,
                principal_amount: new_investment.principal_amount,
                current_value: new_investment.principal_amount,
                interest_earned: Decimal::ZERO,
                annual_return_rate: new_investment.annual_return_rate,
                tenure_months: new_investment.tenure_months,
                currency: new_investment.currency,
                status: InvestmentStatus::Active,
                start_date: new_investment.start_date,
                maturity_date: new_investment.maturity_date,
                created_at: new_investment.start_date,
                updated_at: new_investment.start_date,
            };
            state.investments.insert(id, investment.clone());
            Ok(investment)
        }

        async fn mature(&self, investment_id: &str, at: DateTime<Utc>) -> Result<UserInvestment> {
            let mut state = self.state.lock().unwrap();
            let investment = state.investments.get_mut(investment_id).ok_or_else(|| {
                Error::Ledger(LedgerError::InvestmentNotFound(investment_id.to_string()))
            })?;
            if investment.status != InvestmentStatus::Active || !investment.is_due(at) {
                return Err(Error::Ledger(LedgerError::InvalidStateTransition(format!(
                    "investment {} is not due for maturation",
                    investment_id
                ))));
            }
            investment.status = InvestmentStatus::Matured;
            investment.interest_earned = investment.interest_cap();
            investment.current_value = investment.principal_amount + investment.interest_earned;
            investment.updated_at = at;
            Ok(investment.clone())
        }

        async fn withdraw(
            &self,
            investment_id: &str,
            at: DateTime<Utc>,
            penalty_multiplier: Decimal,
        ) -> Result<UserInvestment> {
            let mut state = self.state.lock().unwrap();
            let investment = state.investments.get(investment_id).cloned().ok_or_else(|| {
                Error::Ledger(LedgerError::InvestmentNotFound(investment_id.to_string()))
            })?;
            let (interest, payout) = investment.settlement(at, penalty_multiplier)?;

            let wallet_id = Self::funding_wallet_of(&state, &investment);
            let wallet = state.wallets.get_mut(&wallet_id).unwrap();
            wallet.balance += payout;
            wallet.version += 1;

            let investment = state.investments.get_mut(investment_id).unwrap();
            investment.status = InvestmentStatus::Withdrawn;
            investment.interest_earned = interest;
            investment.current_value = payout;
            investment.updated_at = at;
            Ok(investment.clone())
        }

        fn get_by_id(&self, investment_id: &str) -> Result<UserInvestment> {
            self.state
                .lock()
                .unwrap()
                .investments
                .get(investment_id)
                .cloned()
                .ok_or_else(|| {
                    Error::Ledger(LedgerError::InvestmentNotFound(investment_id.to_string()))
                })
        }

        fn list_for_user(&self, user_id: &str) -> Result<Vec<UserInvestment>> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .investments
                .values()
                .filter(|i| i.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    fn product(id: &str, is_active: bool) -> InvestmentProduct {
        InvestmentProduct {
            id: id.to_string(),
            name: "Fixed Deposit 12M".to_string(),
            kind: "FIXED_DEPOSIT".to_string(),
            risk_level: "LOW".to_string(),
            expected_annual_return: dec!(10),
            minimum_amount: dec!(100),
            maximum_amount: dec!(10000),
            tenure_months: 12,
            currency: "USD".to_string(),
            is_active,
        }
    }

    struct Fixture {
        service: InvestmentService,
        state: Arc<Mutex<EngineState>>,
    }

    fn fixture(wallet_balance: Decimal) -> Fixture {
        let state = Arc::new(Mutex::new(EngineState::default()));
        let now = Utc::now();
        state.lock().unwrap().wallets.insert(
            "w-p".to_string(),
            Wallet {
                id: "w-p".to_string(),
                user_id: "user-1".to_string(),
                wallet_type: WalletType::Primary,
                balance: wallet_balance,
                pending_balance: Decimal::ZERO,
                currency: "USD".to_string(),
                daily_limit: None,
                monthly_limit: None,
                is_active: true,
                version: 0,
                created_at: now,
                updated_at: now,
            },
        );

        let service = InvestmentService::new(
            Arc::new(MockInvestmentRepository {
                state: state.clone(),
            }),
            Arc::new(MockProductRepository {
                products: vec![product("prod-fd-12", true), product("prod-closed", false)],
            }),
            Arc::new(MockWalletRepository {
                state: state.clone(),
            }),
            dec!(1.0),
        );
        Fixture { service, state }
    }

    fn balance(state: &Arc<Mutex<EngineState>>) -> Decimal {
        state.lock().unwrap().wallets["w-p"].balance
    }

    #[tokio::test]
    async fn test_open_debits_primary_wallet_and_snapshots_product() {
        let f = fixture(dec!(5000));
        let inv = f
            .service
            .open_investment("user-1", "prod-fd-12", dec!(1000))
            .await
            .unwrap();

        assert_eq!(balance(&f.state), dec!(4000));
        assert_eq!(inv.status, InvestmentStatus::Active);
        assert_eq!(inv.annual_return_rate, dec!(10));
        assert_eq!(inv.tenure_months, 12);
        assert_eq!(inv.current_value, dec!(1000));
        assert!(inv.maturity_date > inv.start_date);
    }

    #[tokio::test]
    async fn test_open_rejects_out_of_bounds_principal() {
        let f = fixture(dec!(50000));
        for bad in [dec!(50), dec!(10001)] {
            let err = f
                .service
                .open_investment("user-1", "prod-fd-12", bad)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                Error::Ledger(LedgerError::AmountOutOfRange { .. })
            ));
        }
        assert_eq!(balance(&f.state), dec!(50000));
    }

    #[tokio::test]
    async fn test_open_rejects_inactive_product() {
        let f = fixture(dec!(5000));
        let err = f
            .service
            .open_investment("user-1", "prod-closed", dec!(1000))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_open_insufficient_funds_leaves_no_position() {
        let f = fixture(dec!(500));
        let err = f
            .service
            .open_investment("user-1", "prod-fd-12", dec!(1000))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(balance(&f.state), dec!(500));
        assert!(f.state.lock().unwrap().investments.is_empty());
    }

    #[tokio::test]
    async fn test_open_requires_primary_wallet() {
        let f = fixture(dec!(5000));
        let err = f
            .service
            .open_investment("user-unknown", "prod-fd-12", dec!(1000))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::WalletNotFound(_))));
    }

    #[tokio::test]
    async fn test_open_rejects_non_positive_principal() {
        let f = fixture(dec!(5000));
        let err = f
            .service
            .open_investment("user-1", "prod-fd-12", dec!(0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::InvalidAmount(_))));
    }

    #[tokio::test]
    async fn test_immediate_withdrawal_returns_principal() {
        // Zero days elapsed means zero accrued interest, so the payout is
        // exactly the principal.
        let f = fixture(dec!(2000));
        let inv = f
            .service
            .open_investment("user-1", "prod-fd-12", dec!(1500))
            .await
            .unwrap();
        assert_eq!(balance(&f.state), dec!(500));

        let withdrawn = f.service.withdraw_investment(&inv.id).await.unwrap();
        assert_eq!(withdrawn.status, InvestmentStatus::Withdrawn);
        assert_eq!(withdrawn.interest_earned, dec!(0.00));
        assert_eq!(withdrawn.current_value, dec!(1500.00));
        assert_eq!(balance(&f.state), dec!(2000));
    }

    #[tokio::test]
    async fn test_withdraw_twice_fails() {
        let f = fixture(dec!(2000));
        let inv = f
            .service
            .open_investment("user-1", "prod-fd-12", dec!(1000))
            .await
            .unwrap();
        f.service.withdraw_investment(&inv.id).await.unwrap();

        let err = f.service.withdraw_investment(&inv.id).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InvalidStateTransition(_))
        ));
        // The second attempt credited nothing.
        assert_eq!(balance(&f.state), dec!(2000));
    }

    #[tokio::test]
    async fn test_mature_before_due_fails() {
        let f = fixture(dec!(2000));
        let inv = f
            .service
            .open_investment("user-1", "prod-fd-12", dec!(1000))
            .await
            .unwrap();
        let err = f.service.mature_if_due(&inv.id).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InvalidStateTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_list_products_hides_closed_ones() {
        let f = fixture(dec!(0));
        let products = f.service.list_products().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "prod-fd-12");
    }

    #[tokio::test]
    async fn test_get_investment_applies_accrual() {
        let f = fixture(dec!(2000));
        let inv = f
            .service
            .open_investment("user-1", "prod-fd-12", dec!(1000))
            .await
            .unwrap();
        let read = f.service.get_investment(&inv.id).unwrap();
        // Nothing has accrued yet, but the invariant must already hold.
        assert_eq!(
            read.current_value,
            read.principal_amount + read.interest_earned
        );
    }

    #[tokio::test]
    async fn test_unknown_investment() {
        let f = fixture(dec!(0));
        assert!(matches!(
            f.service.get_investment("inv-nope").unwrap_err(),
            Error::Ledger(LedgerError::InvestmentNotFound(_))
        ));
    }
}
