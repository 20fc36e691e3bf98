use log::debug;
use std::sync::Arc;

use super::holdings_model::{AssetHolding, HoldingBuy, HoldingSell};
use super::holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
use crate::assets::AssetRepositoryTrait;
use crate::errors::{LedgerError, Result};
use crate::wallets::{WalletRepositoryTrait, WalletType};
use crate::Error;

/// Service tracking per-asset positions inside crypto wallets.
pub struct HoldingService {
    repository: Arc<dyn HoldingRepositoryTrait>,
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
    asset_repository: Arc<dyn AssetRepositoryTrait>,
}

impl HoldingService {
    /// Creates a new HoldingService instance.
    pub fn new(
        repository: Arc<dyn HoldingRepositoryTrait>,
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
        asset_repository: Arc<dyn AssetRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            wallet_repository,
            asset_repository,
        }
    }

    /// Holdings live inside active crypto wallets only.
    fn ensure_crypto_wallet(&self, wallet_id: &str) -> Result<()> {
        let wallet = self.wallet_repository.get_by_id(wallet_id)?;
        wallet.ensure_active()?;
        if wallet.wallet_type != WalletType::Crypto {
            return Err(Error::Ledger(LedgerError::InvalidStateTransition(format!(
                "wallet {} is {}, holdings require a CRYPTO wallet",
                wallet.id, wallet.wallet_type
            ))));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl HoldingServiceTrait for HoldingService {
    async fn record_buy(&self, buy: HoldingBuy) -> Result<AssetHolding> {
        buy.validate()?;
        self.ensure_crypto_wallet(&buy.wallet_id)?;
        // Reference data is resolved before the atomic unit; the writer job
        // never blocks on anything external.
        let asset = self.asset_repository.get_by_symbol(&buy.asset_symbol)?;
        if !asset.is_active {
            return Err(Error::Ledger(LedgerError::InvalidStateTransition(format!(
                "asset {} is not tradeable",
                asset.symbol
            ))));
        }

        debug!(
            "Buy {} {} @ {} into wallet {}",
            buy.quantity, buy.asset_symbol, buy.unit_price, buy.wallet_id
        );
        self.repository.record_buy(buy).await
    }

    async fn record_sell(&self, sell: HoldingSell) -> Result<AssetHolding> {
        sell.validate()?;
        self.ensure_crypto_wallet(&sell.wallet_id)?;

        debug!(
            "Sell {} {} from wallet {}",
            sell.quantity, sell.asset_symbol, sell.wallet_id
        );
        self.repository.record_sell(sell).await
    }

    fn get_holding(&self, wallet_id: &str, asset_symbol: &str) -> Result<AssetHolding> {
        self.repository.get_holding(wallet_id, asset_symbol)
    }

    fn list_holdings(&self, wallet_id: &str) -> Result<Vec<AssetHolding>> {
        // Reads work on deactivated wallets too; only mutations require an
        // active crypto wallet.
        self.wallet_repository.get_by_id(wallet_id)?;
        self.repository.list_for_wallet(wallet_id)
    }
}
