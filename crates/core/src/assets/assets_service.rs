use std::sync::Arc;

use super::assets_model::DigitalAsset;
use super::assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
use crate::errors::Result;

/// Read-only service over the digital-asset reference table.
pub struct AssetService {
    repository: Arc<dyn AssetRepositoryTrait>,
}

impl AssetService {
    pub fn new(repository: Arc<dyn AssetRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl AssetServiceTrait for AssetService {
    fn get_asset(&self, symbol: &str) -> Result<DigitalAsset> {
        self.repository.get_by_symbol(symbol)
    }

    fn list_active_assets(&self) -> Result<Vec<DigitalAsset>> {
        self.repository.list(true)
    }
}
