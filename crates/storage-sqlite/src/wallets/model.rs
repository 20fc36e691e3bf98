//! Database model for wallets.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use payvault_core::errors::{DatabaseError, Error, Result};
use payvault_core::wallets::{NewWallet, Wallet, WalletType};
use rust_decimal::Decimal;

use crate::utils::{format_timestamp, parse_decimal, parse_optional_decimal, parse_timestamp};

/// Database model for wallets
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
#[diesel(table_name = crate::schema::wallets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletDB {
    pub id: String,
    pub user_id: String,
    pub wallet_type: String,
    pub balance: String,
    pub pending_balance: String,
    pub currency: String,
    pub daily_limit: Option<String>,
    pub monthly_limit: Option<String>,
    pub is_active: bool,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl WalletDB {
    /// Builds the row for a brand-new wallet: zero balances, version 0.
    pub fn from_new(new_wallet: NewWallet) -> Self {
        let now = format_timestamp(chrono::Utc::now());
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new_wallet.user_id,
            wallet_type: new_wallet.wallet_type.as_str().to_string(),
            balance: Decimal::ZERO.to_string(),
            pending_balance: Decimal::ZERO.to_string(),
            currency: new_wallet.currency,
            daily_limit: None,
            monthly_limit: None,
            is_active: true,
            version: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TryFrom<WalletDB> for Wallet {
    type Error = Error;

    fn try_from(db: WalletDB) -> Result<Self> {
        Ok(Self {
            wallet_type: WalletType::from_str(&db.wallet_type)
                .map_err(DatabaseError::Internal)
                .map_err(Error::Database)?,
            balance: parse_decimal(&db.balance, "wallets.balance")?,
            pending_balance: parse_decimal(&db.pending_balance, "wallets.pending_balance")?,
            daily_limit: parse_optional_decimal(db.daily_limit.as_deref(), "wallets.daily_limit")?,
            monthly_limit: parse_optional_decimal(
                db.monthly_limit.as_deref(),
                "wallets.monthly_limit",
            )?,
            created_at: parse_timestamp(&db.created_at, "wallets.created_at")?,
            updated_at: parse_timestamp(&db.updated_at, "wallets.updated_at")?,
            id: db.id,
            user_id: db.user_id,
            currency: db.currency,
            is_active: db.is_active,
            version: db.version,
        })
    }
}
