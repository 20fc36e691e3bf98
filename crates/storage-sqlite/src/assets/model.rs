//! Database model for digital assets.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use payvault_core::assets::{AssetKind, DigitalAsset};
use payvault_core::errors::{DatabaseError, Error, Result};

use crate::utils::parse_decimal;

/// Database model for digital assets. Seeded by migrations; rates are
/// updated out of band by the pricing feed.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::digital_assets)]
#[diesel(primary_key(symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DigitalAssetDB {
    pub symbol: String,
    pub name: String,
    pub kind: String,
    pub decimals: i32,
    pub exchange_rate: String,
    pub is_active: bool,
}

impl TryFrom<DigitalAssetDB> for DigitalAsset {
    type Error = Error;

    fn try_from(db: DigitalAssetDB) -> Result<Self> {
        Ok(Self {
            kind: AssetKind::from_str(&db.kind)
                .map_err(DatabaseError::Internal)
                .map_err(Error::Database)?,
            exchange_rate: parse_decimal(&db.exchange_rate, "digital_assets.exchange_rate")?,
            symbol: db.symbol,
            name: db.name,
            decimals: db.decimals,
            is_active: db.is_active,
        })
    }
}
