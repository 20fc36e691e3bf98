//! Database model for ledger transactions.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use payvault_core::errors::{DatabaseError, Error, Result};
use payvault_core::transactions::{
    NewTransaction, Transaction, TransactionStatus, TransactionType,
};

use crate::utils::{format_timestamp, parse_decimal, parse_timestamp};

/// Database model for transactions. Rows are append-only once completed.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub from_wallet_id: Option<String>,
    pub to_wallet_id: Option<String>,
    pub amount: String,
    pub currency: String,
    pub transaction_type: String,
    pub status: String,
    pub description: Option<String>,
    pub counterparty_id: Option<String>,
    pub created_at: String,
}

impl TransactionDB {
    /// Builds a completed row for a movement that is being applied inside
    /// the same atomic unit.
    pub fn completed_from(new_transaction: NewTransaction) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from_wallet_id: new_transaction.from_wallet_id,
            to_wallet_id: new_transaction.to_wallet_id,
            amount: new_transaction.amount.to_string(),
            currency: new_transaction.currency,
            transaction_type: new_transaction.transaction_type.as_str().to_string(),
            status: TransactionStatus::Completed.as_str().to_string(),
            description: new_transaction.description,
            counterparty_id: new_transaction.counterparty_id,
            created_at: format_timestamp(chrono::Utc::now()),
        }
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self> {
        Ok(Self {
            amount: parse_decimal(&db.amount, "transactions.amount")?,
            transaction_type: TransactionType::from_str(&db.transaction_type)
                .map_err(DatabaseError::Internal)
                .map_err(Error::Database)?,
            status: TransactionStatus::from_str(&db.status)
                .map_err(DatabaseError::Internal)
                .map_err(Error::Database)?,
            created_at: parse_timestamp(&db.created_at, "transactions.created_at")?,
            id: db.id,
            from_wallet_id: db.from_wallet_id,
            to_wallet_id: db.to_wallet_id,
            currency: db.currency,
            description: db.description,
            counterparty_id: db.counterparty_id,
        })
    }
}
