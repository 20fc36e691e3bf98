use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::errors::IntoCore;
use crate::schema::digital_assets::dsl::*;

use super::model::DigitalAssetDB;
use payvault_core::assets::{AssetRepositoryTrait, DigitalAsset};
use payvault_core::errors::{LedgerError, Result};
use payvault_core::Error;

/// Read-only repository over the digital-asset reference table.
pub struct AssetRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl AssetRepository {
    /// Creates a new AssetRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl AssetRepositoryTrait for AssetRepository {
    fn get_by_symbol(&self, asset_symbol: &str) -> Result<DigitalAsset> {
        let mut conn = get_connection(&self.pool)?;

        let row = digital_assets
            .select(DigitalAssetDB::as_select())
            .find(asset_symbol)
            .first::<DigitalAssetDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| {
                Error::Ledger(LedgerError::ProductNotFound(format!(
                    "asset {}",
                    asset_symbol
                )))
            })?;

        row.try_into()
    }

    fn list(&self, active_only: bool) -> Result<Vec<DigitalAsset>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = crate::schema::digital_assets::table
            .select(DigitalAssetDB::as_select())
            .into_boxed();
        if active_only {
            query = query.filter(is_active.eq(true));
        }

        let rows = query
            .order(symbol.asc())
            .load::<DigitalAssetDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(DigitalAsset::try_from).collect()
    }
}
