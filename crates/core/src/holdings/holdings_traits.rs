//! Holding repository and service traits.

use async_trait::async_trait;

use super::holdings_model::{AssetHolding, HoldingBuy, HoldingSell};
use crate::errors::Result;

/// Trait defining the contract for holding persistence.
///
/// The buy/sell methods are atomic upserts: the read-modify-write of the
/// `(wallet_id, asset_symbol)` row happens inside one storage transaction.
#[async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    /// Creates or updates the holding for a buy event.
    async fn record_buy(&self, buy: HoldingBuy) -> Result<AssetHolding>;

    /// Updates the holding for a sell event; fails with
    /// `InsufficientHoldings` when the quantity is not covered.
    async fn record_sell(&self, sell: HoldingSell) -> Result<AssetHolding>;

    /// Retrieves one holding by wallet and symbol.
    fn get_holding(&self, wallet_id: &str, asset_symbol: &str) -> Result<AssetHolding>;

    /// Lists all holdings inside a wallet, alphabetically by symbol.
    fn list_for_wallet(&self, wallet_id: &str) -> Result<Vec<AssetHolding>>;
}

/// Trait defining the contract for the holding-tracker service.
#[async_trait]
pub trait HoldingServiceTrait: Send + Sync {
    /// Records a buy into a crypto wallet.
    async fn record_buy(&self, buy: HoldingBuy) -> Result<AssetHolding>;

    /// Records a sell out of a crypto wallet.
    async fn record_sell(&self, sell: HoldingSell) -> Result<AssetHolding>;

    /// Retrieves one holding by wallet and symbol.
    fn get_holding(&self, wallet_id: &str, asset_symbol: &str) -> Result<AssetHolding>;

    /// Lists all holdings inside a wallet.
    fn list_holdings(&self, wallet_id: &str) -> Result<Vec<AssetHolding>>;
}
