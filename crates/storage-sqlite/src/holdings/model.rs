//! Database model for asset holdings.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use payvault_core::errors::{Error, Result};
use payvault_core::holdings::AssetHolding;

use crate::utils::{format_timestamp, parse_decimal, parse_timestamp};

/// Database model for asset holdings. One row per (wallet_id, asset_symbol),
/// enforced by a unique index.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::asset_holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetHoldingDB {
    pub id: String,
    pub wallet_id: String,
    pub asset_symbol: String,
    pub quantity: String,
    pub average_buy_price: String,
    pub total_invested: String,
    pub last_transaction_at: String,
}

impl AssetHoldingDB {
    /// Serializes a domain holding back into row form, keeping the row id.
    pub fn from_domain(holding: &AssetHolding) -> Self {
        Self {
            id: holding.id.clone(),
            wallet_id: holding.wallet_id.clone(),
            asset_symbol: holding.asset_symbol.clone(),
            quantity: holding.quantity.to_string(),
            average_buy_price: holding.average_buy_price.to_string(),
            total_invested: holding.total_invested.to_string(),
            last_transaction_at: format_timestamp(holding.last_transaction_at),
        }
    }
}

impl TryFrom<AssetHoldingDB> for AssetHolding {
    type Error = Error;

    fn try_from(db: AssetHoldingDB) -> Result<Self> {
        Ok(Self {
            quantity: parse_decimal(&db.quantity, "asset_holdings.quantity")?,
            average_buy_price: parse_decimal(
                &db.average_buy_price,
                "asset_holdings.average_buy_price",
            )?,
            total_invested: parse_decimal(&db.total_invested, "asset_holdings.total_invested")?,
            last_transaction_at: parse_timestamp(
                &db.last_transaction_at,
                "asset_holdings.last_transaction_at",
            )?,
            id: db.id,
            wallet_id: db.wallet_id,
            asset_symbol: db.asset_symbol,
        })
    }
}
