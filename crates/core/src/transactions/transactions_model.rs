//! Transaction domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::LedgerError;
use crate::utils::serde_formats::{decimal_format, timestamp_format};
use crate::{Error, Result};

use super::transactions_constants::{transaction_statuses, transaction_types};

/// Kind of balance movement a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Wallet-to-wallet transfer, seen from the debit side.
    Send,
    /// Credit leg of an internal movement (credit draw, investment payout).
    Receive,
    /// External source into a wallet.
    Topup,
    /// Wallet into an external sink.
    Withdraw,
    /// Debit leg of a purchase or investment principal.
    Payment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Send => transaction_types::SEND,
            TransactionType::Receive => transaction_types::RECEIVE,
            TransactionType::Topup => transaction_types::TOPUP,
            TransactionType::Withdraw => transaction_types::WITHDRAW,
            TransactionType::Payment => transaction_types::PAYMENT,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            transaction_types::SEND => Ok(TransactionType::Send),
            transaction_types::RECEIVE => Ok(TransactionType::Receive),
            transaction_types::TOPUP => Ok(TransactionType::Topup),
            transaction_types::WITHDRAW => Ok(TransactionType::Withdraw),
            transaction_types::PAYMENT => Ok(TransactionType::Payment),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// Transaction lifecycle status.
///
/// `Pending → Completed` and `Pending → Failed` are the only transitions;
/// terminal states are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => transaction_statuses::PENDING,
            TransactionStatus::Completed => transaction_statuses::COMPLETED,
            TransactionStatus::Failed => transaction_statuses::FAILED,
        }
    }

    /// True when the status may still change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }

    /// Checks the `Pending → Completed|Failed` state machine.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (
                TransactionStatus::Pending,
                TransactionStatus::Completed | TransactionStatus::Failed
            )
        )
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            transaction_statuses::PENDING => Ok(TransactionStatus::Pending),
            transaction_statuses::COMPLETED => Ok(TransactionStatus::Completed),
            transaction_statuses::FAILED => Ok(TransactionStatus::Failed),
            _ => Err(format!("Unknown transaction status: {}", s)),
        }
    }
}

/// An immutable record of a balance movement.
///
/// Exactly one of `from_wallet_id`/`to_wallet_id` may be null, meaning an
/// external source or sink. Rows are append-only once completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub from_wallet_id: Option<String>,
    pub to_wallet_id: Option<String>,
    #[serde(with = "decimal_format")]
    pub amount: Decimal,
    pub currency: String,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub description: Option<String>,
    pub counterparty_id: Option<String>,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
}

/// Input model for recording a balance movement.
///
/// Built by the services; the storage layer executes it atomically together
/// with the debit/credit it describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub from_wallet_id: Option<String>,
    pub to_wallet_id: Option<String>,
    #[serde(with = "decimal_format")]
    pub amount: Decimal,
    pub currency: String,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub counterparty_id: Option<String>,
}

impl NewTransaction {
    /// Validates structural invariants before any atomic unit is entered.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::Ledger(LedgerError::InvalidAmount(format!(
                "amount must be positive, got {}",
                self.amount
            ))));
        }
        if self.from_wallet_id.is_none() && self.to_wallet_id.is_none() {
            return Err(Error::Ledger(LedgerError::InvalidAmount(
                "a transaction needs at least one wallet side".to_string(),
            )));
        }
        Ok(())
    }

    /// The wallet ids this movement touches, in ascending order.
    ///
    /// Two-wallet operations lock in this order to avoid circular waits.
    pub fn wallet_ids_ordered(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .from_wallet_id
            .iter()
            .chain(self.to_wallet_id.iter())
            .map(String::as_str)
            .collect();
        ids.sort_unstable();
        ids
    }
}
