use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::transactions_model::{NewTransaction, Transaction, TransactionType};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::constants::CONCURRENCY_RETRY_LIMIT;
use crate::errors::{LedgerError, Result};
use crate::wallets::WalletRepositoryTrait;
use crate::Error;

/// Service implementing the transfer state machine on top of the atomic
/// repository unit.
///
/// Validation happens before the atomic unit is entered; version conflicts
/// inside the unit are retried a bounded number of times before being
/// surfaced as `ConcurrencyConflict`.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
}

impl TransactionService {
    /// Creates a new TransactionService instance.
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            wallet_repository,
        }
    }

    /// Runs the atomic unit, retrying on retryable version conflicts.
    async fn execute_with_retry(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let mut attempt = 0;
        loop {
            match self.repository.execute(new_transaction.clone()).await {
                Err(err) if err.is_retryable_conflict() && attempt + 1 < CONCURRENCY_RETRY_LIMIT => {
                    attempt += 1;
                    warn!(
                        "Version conflict executing {} transaction, retry {}/{}",
                        new_transaction.transaction_type, attempt, CONCURRENCY_RETRY_LIMIT
                    );
                }
                other => return other,
            }
        }
    }
}

#[async_trait::async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn transfer(
        &self,
        from_wallet_id: &str,
        to_wallet_id: &str,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction> {
        if from_wallet_id == to_wallet_id {
            return Err(Error::Ledger(LedgerError::InvalidAmount(
                "cannot transfer a wallet to itself".to_string(),
            )));
        }

        // Resolve both sides before entering the atomic unit; a missing or
        // inactive wallet never reaches ledger state.
        let from = self.wallet_repository.get_by_id(from_wallet_id)?;
        let to = self.wallet_repository.get_by_id(to_wallet_id)?;
        from.ensure_active()?;
        to.ensure_active()?;
        if from.currency != to.currency {
            return Err(Error::Ledger(LedgerError::CurrencyMismatch(format!(
                "{} -> {}",
                from.currency, to.currency
            ))));
        }

        let new_transaction = NewTransaction {
            from_wallet_id: Some(from.id.clone()),
            to_wallet_id: Some(to.id.clone()),
            amount,
            currency: from.currency.clone(),
            transaction_type: TransactionType::Send,
            description,
            counterparty_id: Some(to.user_id.clone()),
        };
        new_transaction.validate()?;

        debug!(
            "Transfer {} {} from wallet {} to wallet {}",
            amount, from.currency, from.id, to.id
        );
        self.execute_with_retry(new_transaction).await
    }

    async fn top_up(
        &self,
        wallet_id: &str,
        amount: Decimal,
        source: Option<String>,
    ) -> Result<Transaction> {
        let wallet = self.wallet_repository.get_by_id(wallet_id)?;
        wallet.ensure_active()?;

        let new_transaction = NewTransaction {
            from_wallet_id: None,
            to_wallet_id: Some(wallet.id.clone()),
            amount,
            currency: wallet.currency.clone(),
            transaction_type: TransactionType::Topup,
            description: source.clone(),
            counterparty_id: source,
        };
        new_transaction.validate()?;

        self.execute_with_retry(new_transaction).await
    }

    async fn withdraw(
        &self,
        wallet_id: &str,
        amount: Decimal,
        sink: Option<String>,
    ) -> Result<Transaction> {
        let wallet = self.wallet_repository.get_by_id(wallet_id)?;
        wallet.ensure_active()?;

        let new_transaction = NewTransaction {
            from_wallet_id: Some(wallet.id.clone()),
            to_wallet_id: None,
            amount,
            currency: wallet.currency.clone(),
            transaction_type: TransactionType::Withdraw,
            description: sink.clone(),
            counterparty_id: sink,
        };
        new_transaction.validate()?;

        self.execute_with_retry(new_transaction).await
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.repository.get_by_id(transaction_id)
    }

    fn list_for_wallet(&self, wallet_id: &str) -> Result<Vec<Transaction>> {
        // Confirm the wallet exists so a bad id maps to WalletNotFound
        // instead of an empty list.
        self.wallet_repository.get_by_id(wallet_id)?;
        self.repository.list_for_wallet(wallet_id)
    }
}
