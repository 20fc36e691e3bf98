//! Digital asset reference models.
//!
//! These rows are read-only to the ledger; exchange rates are maintained by
//! an external pricing feed outside this system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::serde_formats::decimal_format;

/// Classification of a digital asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Fiat,
    Cryptocurrency,
    Stablecoin,
    Cbdc,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Fiat => "FIAT",
            AssetKind::Cryptocurrency => "CRYPTOCURRENCY",
            AssetKind::Stablecoin => "STABLECOIN",
            AssetKind::Cbdc => "CBDC",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "FIAT" => Ok(AssetKind::Fiat),
            "CRYPTOCURRENCY" => Ok(AssetKind::Cryptocurrency),
            "STABLECOIN" => Ok(AssetKind::Stablecoin),
            "CBDC" => Ok(AssetKind::Cbdc),
            _ => Err(format!("Unknown asset kind: {}", s)),
        }
    }
}

/// Reference data for a tradeable digital asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalAsset {
    pub symbol: String,
    pub name: String,
    pub kind: AssetKind,
    pub decimals: i32,
    #[serde(with = "decimal_format")]
    pub exchange_rate: Decimal,
    pub is_active: bool,
}
