use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::wallets_model::{NewWallet, Wallet, WalletType};
use super::wallets_traits::{WalletRepositoryTrait, WalletServiceTrait};
use crate::errors::Result;

/// Service for managing wallets.
pub struct WalletService {
    repository: Arc<dyn WalletRepositoryTrait>,
}

impl WalletService {
    /// Creates a new WalletService instance.
    pub fn new(repository: Arc<dyn WalletRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl WalletServiceTrait for WalletService {
    /// Creates a wallet on first use; a second call for the same
    /// `(user_id, wallet_type)` returns the existing wallet unchanged.
    async fn create_wallet(&self, new_wallet: NewWallet) -> Result<Wallet> {
        new_wallet.validate()?;
        debug!(
            "Creating wallet for user {}, type {}",
            new_wallet.user_id, new_wallet.wallet_type
        );
        self.repository.create(new_wallet).await
    }

    fn get_wallet_by_id(&self, wallet_id: &str) -> Result<Wallet> {
        self.repository.get_by_id(wallet_id)
    }

    fn get_wallet(&self, user_id: &str, wallet_type: WalletType) -> Result<Wallet> {
        self.repository.get_for_user(user_id, wallet_type)
    }

    fn list_wallets(&self, user_id: &str) -> Result<Vec<Wallet>> {
        self.repository.list_for_user(user_id)
    }

    async fn adjust_balance(
        &self,
        wallet_id: &str,
        delta: Decimal,
        expected_version: i64,
    ) -> Result<Wallet> {
        self.repository
            .adjust_balance(wallet_id, delta, expected_version)
            .await
    }

    async fn deactivate_wallet(&self, wallet_id: &str) -> Result<Wallet> {
        self.repository.deactivate(wallet_id).await
    }
}
