//! Digital asset repository and service traits.

use super::assets_model::DigitalAsset;
use crate::errors::Result;

/// Trait defining read access to the digital-asset reference table.
///
/// The ledger never writes this table; rates are updated by an external
/// pricing feed.
pub trait AssetRepositoryTrait: Send + Sync {
    /// Retrieves an asset by symbol.
    fn get_by_symbol(&self, symbol: &str) -> Result<DigitalAsset>;

    /// Lists assets, optionally restricted to active ones.
    fn list(&self, active_only: bool) -> Result<Vec<DigitalAsset>>;
}

/// Trait defining the contract for asset reference lookups.
pub trait AssetServiceTrait: Send + Sync {
    /// Retrieves an asset by symbol.
    fn get_asset(&self, symbol: &str) -> Result<DigitalAsset>;

    /// Lists all active assets.
    fn list_active_assets(&self) -> Result<Vec<DigitalAsset>>;
}
