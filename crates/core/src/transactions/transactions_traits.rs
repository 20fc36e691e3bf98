//! Transaction ledger repository and service traits.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::transactions_model::{NewTransaction, Transaction};
use crate::errors::Result;

/// Trait defining the contract for the append-only transaction store.
///
/// `execute` is the atomic unit of the whole ledger: the debit, the credit,
/// and the inserted transaction row commit together or not at all. When the
/// debit would drive a balance negative the unit aborts with
/// `InsufficientFunds` and no row is written, not even a failed one.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Atomically applies the movement described by `new_transaction` to the
    /// affected wallet balances and inserts the completed row.
    ///
    /// Wallets are locked/updated in ascending id order when two are
    /// involved.
    async fn execute(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    /// Retrieves a transaction by its ID.
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;

    /// Lists all transactions touching a wallet, newest first.
    fn list_for_wallet(&self, wallet_id: &str) -> Result<Vec<Transaction>>;
}

/// Trait defining the contract for the transaction-ledger service.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Moves `amount` between two wallets of the same currency.
    async fn transfer(
        &self,
        from_wallet_id: &str,
        to_wallet_id: &str,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction>;

    /// Credits a wallet from an external source. Always succeeds for a
    /// valid amount; there is no debit side.
    async fn top_up(
        &self,
        wallet_id: &str,
        amount: Decimal,
        source: Option<String>,
    ) -> Result<Transaction>;

    /// Debits a wallet into an external sink, subject to the same
    /// insufficient-funds rule as a transfer debit.
    async fn withdraw(
        &self,
        wallet_id: &str,
        amount: Decimal,
        sink: Option<String>,
    ) -> Result<Transaction>;

    /// Retrieves a transaction by ID.
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    /// Lists all transactions touching a wallet, newest first.
    fn list_for_wallet(&self, wallet_id: &str) -> Result<Vec<Transaction>>;
}
