//! Wallet repository and service traits.
//!
//! These traits define the contract for wallet operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::wallets_model::{NewWallet, Wallet, WalletType};
use crate::errors::Result;

/// Trait defining the contract for Wallet repository operations.
///
/// Implementations handle persistence; every mutating method is one atomic
/// unit (the storage layer wraps it in a transaction).
#[async_trait]
pub trait WalletRepositoryTrait: Send + Sync {
    /// Creates a wallet, or returns the existing one for the same
    /// `(user_id, wallet_type)` pair unchanged.
    async fn create(&self, new_wallet: NewWallet) -> Result<Wallet>;

    /// Retrieves a wallet by its ID.
    fn get_by_id(&self, wallet_id: &str) -> Result<Wallet>;

    /// Retrieves a user's wallet of the given type.
    fn get_for_user(&self, user_id: &str, wallet_type: WalletType) -> Result<Wallet>;

    /// Lists all wallets owned by a user.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Wallet>>;

    /// Applies a signed delta to the wallet balance.
    ///
    /// The sole balance mutator. Fails with `InsufficientFunds` if the
    /// result would be negative and with `ConcurrencyConflict` if the row
    /// version no longer matches `expected_version`. Bumps the version on
    /// success.
    async fn adjust_balance(
        &self,
        wallet_id: &str,
        delta: Decimal,
        expected_version: i64,
    ) -> Result<Wallet>;

    /// Marks a wallet inactive. Wallets are never deleted.
    async fn deactivate(&self, wallet_id: &str) -> Result<Wallet>;
}

/// Trait defining the contract for Wallet service operations.
#[async_trait]
pub trait WalletServiceTrait: Send + Sync {
    /// Creates a wallet with business validation; idempotent per
    /// `(user_id, wallet_type)`.
    async fn create_wallet(&self, new_wallet: NewWallet) -> Result<Wallet>;

    /// Retrieves a wallet by ID.
    fn get_wallet_by_id(&self, wallet_id: &str) -> Result<Wallet>;

    /// Retrieves a user's wallet of the given type.
    fn get_wallet(&self, user_id: &str, wallet_type: WalletType) -> Result<Wallet>;

    /// Lists all wallets owned by a user.
    fn list_wallets(&self, user_id: &str) -> Result<Vec<Wallet>>;

    /// Adjusts a wallet balance under optimistic concurrency.
    async fn adjust_balance(
        &self,
        wallet_id: &str,
        delta: Decimal,
        expected_version: i64,
    ) -> Result<Wallet>;

    /// Deactivates a wallet.
    async fn deactivate_wallet(&self, wallet_id: &str) -> Result<Wallet>;
}
