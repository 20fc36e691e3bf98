//! Wallet domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{LedgerError, ValidationError};
use crate::utils::serde_formats::{optional_decimal_format, timestamp_format};
use crate::{Error, Result};

use super::wallets_constants::wallet_types;

/// The typed role a wallet plays for its owner.
///
/// A user owns zero-or-one wallet per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletType {
    Primary,
    Savings,
    Crypto,
    Investment,
}

impl WalletType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Primary => wallet_types::PRIMARY,
            WalletType::Savings => wallet_types::SAVINGS,
            WalletType::Crypto => wallet_types::CRYPTO,
            WalletType::Investment => wallet_types::INVESTMENT,
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            wallet_types::PRIMARY => Ok(WalletType::Primary),
            wallet_types::SAVINGS => Ok(WalletType::Savings),
            wallet_types::CRYPTO => Ok(WalletType::Crypto),
            wallet_types::INVESTMENT => Ok(WalletType::Investment),
            _ => Err(format!("Unknown wallet type: {}", s)),
        }
    }
}

/// Domain model representing a typed, currency-denominated balance owned by
/// one user.
///
/// Wallets are never physically deleted, only deactivated. The balance is
/// mutated exclusively through the transaction ledger (or the investment and
/// credit flows, which go through the same atomic machinery).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub wallet_type: WalletType,
    #[serde(with = "crate::utils::serde_formats::decimal_format")]
    pub balance: Decimal,
    #[serde(with = "crate::utils::serde_formats::decimal_format")]
    pub pending_balance: Decimal,
    pub currency: String,
    #[serde(default)]
    #[serde(with = "optional_decimal_format")]
    pub daily_limit: Option<Decimal>,
    #[serde(default)]
    #[serde(with = "optional_decimal_format")]
    pub monthly_limit: Option<Decimal>,
    pub is_active: bool,
    /// Optimistic-concurrency token, bumped on every balance adjustment.
    pub version: i64,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Errors unless the wallet is active.
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_active {
            Ok(())
        } else {
            Err(Error::Ledger(LedgerError::InactiveWallet(self.id.clone())))
        }
    }

    /// Applies a signed delta to the balance, rejecting a negative result.
    ///
    /// This is the single place where the non-negativity invariant is
    /// enforced; both the in-memory mocks and the storage layer go through
    /// it.
    pub fn apply_delta(&self, delta: Decimal) -> Result<Decimal> {
        let new_balance = self.balance + delta;
        if new_balance < Decimal::ZERO {
            return Err(Error::Ledger(LedgerError::InsufficientFunds {
                wallet_id: self.id.clone(),
                balance: self.balance.to_string(),
                requested: delta.abs().to_string(),
            }));
        }
        Ok(new_balance)
    }
}

/// Input model for creating (or idempotently fetching) a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWallet {
    pub user_id: String,
    pub wallet_type: WalletType,
    pub currency: String,
}

impl NewWallet {
    /// Validates the new wallet data.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "userId".to_string(),
            )));
        }
        if !is_iso_4217(&self.currency) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "'{}' is not an ISO-4217 currency code",
                self.currency
            ))));
        }
        Ok(())
    }
}

/// Shape check for ISO-4217 codes: three ASCII uppercase letters.
pub fn is_iso_4217(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}
