#[cfg(test)]
mod tests {
    use crate::errors::{LedgerError, Result};
    use crate::transactions::{
        NewTransaction, Transaction, TransactionRepositoryTrait, TransactionService,
        TransactionServiceTrait, TransactionStatus,
    };
    use crate::wallets::{NewWallet, Wallet, WalletRepositoryTrait, WalletType};
    use crate::Error;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Shared in-memory ledger state. One mutex guards wallets and the
    /// transaction log together, which makes every mock mutation an atomic
    /// unit just like the storage writer.
    #[derive(Default)]
    struct LedgerState {
        wallets: HashMap<String, Wallet>,
        transactions: Vec<Transaction>,
    }

    struct MockWalletRepository {
        state: Arc<Mutex<LedgerState>>,
    }

    #[async_trait]
    impl WalletRepositoryTrait for MockWalletRepository {
        async fn create(&self, new_wallet: NewWallet) -> Result<Wallet> {
            let mut state = self.state.lock().unwrap();
            if let Some(existing) = state.wallets.values().find(|w| {
                w.user_id == new_wallet.user_id && w.wallet_type == new_wallet.wallet_type
            }) {
                return Ok(existing.clone());
            }
            let id = format!("w-{}", state.wallets.len() + 1);
            let now = Utc::now();
            let wallet = Wallet {
                id: id.clone(),
                user_id: new_wallet.user_id,
                wallet_type: new_wallet.wallet_type,
                balance: Decimal::ZERO,
                pending_balance: Decimal::ZERO,
                currency: new_wallet.currency,
                daily_limit: None,
                monthly_limit: None,
                is_active: true,
                version: 0,
                created_at: now,
                updated_at: now,
            };
            state.wallets.insert(id, wallet.clone());
            Ok(wallet)
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

        fn list_for_user(&self, user_id: &str) -> Result<Vec<Wallet>> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .wallets
                .values()
                .filter(|w| w.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn adjust_balance(
            &self,
            wallet_id: &str,
            delta: Decimal,
            expected_version: i64,
        ) -> Result<Wallet> {
            let mut state = self.state.lock().unwrap();
            let wallet = state.wallets.get_mut(wallet_id).ok_or_else(|| {
                Error::Ledger(LedgerError::WalletNotFound(wallet_id.to_string()))
            })?;
            if wallet.version != expected_version {
                return Err(Error::Ledger(LedgerError::ConcurrencyConflict(
                    wallet_id.to_string(),
                )));
            }
            wallet.balance = wallet.apply_delta(delta)?;
            wallet.version += 1;
            Ok(wallet.clone())
        }

        async fn deactivate(&self, wallet_id: &str) -> Result<Wallet> {
            let mut state = self.state.lock().unwrap();
            let wallet = state.wallets.get_mut(wallet_id).ok_or_else(|| {
                Error::Ledger(LedgerError::WalletNotFound(wallet_id.to_string()))
            })?;
            wallet.is_active = false;
            Ok(wallet.clone())
        }
    }

    struct MockTransactionRepository {
        state: Arc<Mutex<LedgerState>>,
    }

    #[async_trait]
    impl TransactionRepositoryTrait for MockTransactionRepository {
        async fn execute(&self, new_transaction: NewTransaction) -> Result<Transaction> {
            let mut state = self.state.lock().unwrap();

            // Debit side first: if it fails, nothing has been written.
            if let Some(from_id) = &new_transaction.from_wallet_id {
                let from = state.wallets.get(from_id).ok_or_else(|| {
                    Error::Ledger(LedgerError::WalletNotFound(from_id.clone()))
                })?;
                let new_balance = from.apply_delta(-new_transaction.amount)?;
                let from = state.wallets.get_mut(from_id).unwrap();
                from.balance = new_balance;
                from.version += 1;
            }
            if let Some(to_id) = &new_transaction.to_wallet_id {
                let to = state.wallets.get_mut(to_id).ok_or_else(|| {
                    Error::Ledger(LedgerError::WalletNotFound(to_id.clone()))
                })?;
                to.balance += new_transaction.amount;
                to.version += 1;
            }

            let transaction = Transaction {
                id: format!("t-{}", state.transactions.len() + 1),
                from_wallet_id: new_transaction.from_wallet_id,
                to_wallet_id: new_transaction.to_wallet_id,
                amount: new_transaction.amount,
                currency: new_transaction.currency,
                transaction_type: new_transaction.transaction_type,
                status: TransactionStatus::Completed,
                description: new_transaction.description,
                counterparty_id: new_transaction.counterparty_id,
                created_at: Utc::now(),
            };
            state.transactions.push(transaction.clone());
            Ok(transaction)
        }

        fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
            self.state
                .lock()
                .unwrap()
                .transactions
                .iter()
                .find(|t| t.id == transaction_id)
                .cloned()
                .ok_or_else(|| {
                    Error::Database(crate::errors::DatabaseError::NotFound(
                        transaction_id.to_string(),
                    ))
                })
        }

        fn list_for_wallet(&self, wallet_id: &str) -> Result<Vec<Transaction>> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .transactions
                .iter()
                .filter(|t| {
                    t.from_wallet_id.as_deref() == Some(wallet_id)
                        || t.to_wallet_id.as_deref() == Some(wallet_id)
                })
                .cloned()
                .collect())
        }
    }

    struct Fixture {
        service: Arc<TransactionService>,
        state: Arc<Mutex<LedgerState>>,
    }

    fn fixture() -> Fixture {
        let state = Arc::new(Mutex::new(LedgerState::default()));
        let wallet_repo = Arc::new(MockWalletRepository {
            state: state.clone(),
        });
        let tx_repo = Arc::new(MockTransactionRepository {
            state: state.clone(),
        });
        Fixture {
            service: Arc::new(TransactionService::new(tx_repo, wallet_repo)),
            state,
        }
    }

    fn seed_wallet(state: &Arc<Mutex<LedgerState>>, id: &str, balance: Decimal) -> String {
        let now = Utc::now();
        let wallet = Wallet {
            id: id.to_string(),
            user_id: format!("user-of-{}", id),
            wallet_type: WalletType::Primary,
            balance,
            pending_balance: Decimal::ZERO,
            currency: "USD".to_string(),
            daily_limit: None,
            monthly_limit: None,
            is_active: true,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        state
            .lock()
            .unwrap()
            .wallets
            .insert(id.to_string(), wallet);
        id.to_string()
    }

    fn balance_of(state: &Arc<Mutex<LedgerState>>, id: &str) -> Decimal {
        state.lock().unwrap().wallets[id].balance
    }

    fn transaction_count(state: &Arc<Mutex<LedgerState>>) -> usize {
        state.lock().unwrap().transactions.len()
    }

    #[tokio::test]
    async fn test_transfer_conserves_balance() {
        let f = fixture();
        let a = seed_wallet(&f.state, "w-a", dec!(100.00));
        let b = seed_wallet(&f.state, "w-b", dec!(20.00));

        let tx = f.service.transfer(&a, &b, dec!(50.00), None).await.unwrap();

        assert_eq!(tx.amount, dec!(50.00));
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(balance_of(&f.state, &a), dec!(50.00));
        assert_eq!(balance_of(&f.state, &b), dec!(70.00));
        // Sum over both wallets is unchanged.
        assert_eq!(
            balance_of(&f.state, &a) + balance_of(&f.state, &b),
            dec!(120.00)
        );
        assert_eq!(transaction_count(&f.state), 1);
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_no_trace() {
        let f = fixture();
        let a = seed_wallet(&f.state, "w-a", dec!(100.00));
        let b = seed_wallet(&f.state, "w-b", dec!(20.00));

        let err = f
            .service
            .transfer(&a, &b, dec!(150.00), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(balance_of(&f.state, &a), dec!(100.00));
        assert_eq!(balance_of(&f.state, &b), dec!(20.00));
        // No transaction row at all, not even a failed one.
        assert_eq!(transaction_count(&f.state), 0);
    }

    #[tokio::test]
    async fn test_top_up() {
        let f = fixture();
        let a = seed_wallet(&f.state, "w-a", dec!(10.00));

        let tx = f
            .service
            .top_up(&a, dec!(25.00), Some("bank".to_string()))
            .await
            .unwrap();

        assert_eq!(balance_of(&f.state, &a), dec!(35.00));
        assert!(tx.from_wallet_id.is_none());
        assert_eq!(tx.to_wallet_id.as_deref(), Some("w-a"));
    }

    #[tokio::test]
    async fn test_withdraw_respects_balance() {
        let f = fixture();
        let a = seed_wallet(&f.state, "w-a", dec!(30.00));

        f.service.withdraw(&a, dec!(30.00), None).await.unwrap();
        assert_eq!(balance_of(&f.state, &a), dec!(0.00));

        let err = f.service.withdraw(&a, dec!(0.01), None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientFunds { .. })
        ));
    }

    #[tokio::test]
    async fn test_transfer_rejects_invalid_amount() {
        let f = fixture();
        let a = seed_wallet(&f.state, "w-a", dec!(100.00));
        let b = seed_wallet(&f.state, "w-b", dec!(0.00));

        for amount in [dec!(0.00), dec!(-1.00)] {
            let err = f.service.transfer(&a, &b, amount, None).await.unwrap_err();
            assert!(matches!(
                err,
                Error::Ledger(LedgerError::InvalidAmount(_))
            ));
        }
        assert_eq!(transaction_count(&f.state), 0);
    }

    #[tokio::test]
    async fn test_transfer_rejects_self() {
        let f = fixture();
        let a = seed_wallet(&f.state, "w-a", dec!(100.00));
        assert!(f.service.transfer(&a, &a, dec!(1.00), None).await.is_err());
    }

    #[tokio::test]
    async fn test_transfer_rejects_unknown_wallet() {
        let f = fixture();
        let a = seed_wallet(&f.state, "w-a", dec!(100.00));
        let err = f
            .service
            .transfer(&a, "w-missing", dec!(1.00), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::WalletNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_transfer_rejects_inactive_wallet() {
        let f = fixture();
        let a = seed_wallet(&f.state, "w-a", dec!(100.00));
        let b = seed_wallet(&f.state, "w-b", dec!(0.00));
        f.state.lock().unwrap().wallets.get_mut("w-b").unwrap().is_active = false;

        let err = f
            .service
            .transfer(&a, &b, dec!(1.00), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InactiveWallet(_))
        ));
    }

    #[tokio::test]
    async fn test_transfer_rejects_currency_mismatch() {
        let f = fixture();
        let a = seed_wallet(&f.state, "w-a", dec!(100.00));
        let b = seed_wallet(&f.state, "w-b", dec!(0.00));
        f.state.lock().unwrap().wallets.get_mut("w-b").unwrap().currency = "EUR".to_string();

        let err = f
            .service
            .transfer(&a, &b, dec!(1.00), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::CurrencyMismatch(_))
        ));
    }

    /// Draining a 50.00 wallet with 100 concurrent 1.00
    /// transfers yields exactly 50 successes, 50 insufficient-funds
    /// failures, and a final balance of 0.00.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_transfers_drain_exactly() {
        let f = fixture();
        let a = seed_wallet(&f.state, "w-a", dec!(50.00));
        let b = seed_wallet(&f.state, "w-b", dec!(0.00));

        let mut handles = Vec::new();
        for _ in 0..100 {
            let service = f.service.clone();
            let (a, b) = (a.clone(), b.clone());
            handles.push(tokio::spawn(async move {
                service.transfer(&a, &b, dec!(1.00), None).await
            }));
        }

        let mut successes = 0;
        let mut insufficient = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(Error::Ledger(LedgerError::InsufficientFunds { .. })) => insufficient += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 50);
        assert_eq!(insufficient, 50);
        assert_eq!(balance_of(&f.state, &a), dec!(0.00));
        assert_eq!(balance_of(&f.state, &b), dec!(50.00));
        assert_eq!(transaction_count(&f.state), 50);
    }
}
