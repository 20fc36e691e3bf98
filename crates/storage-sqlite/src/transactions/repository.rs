use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::transactions;
use crate::schema::transactions::dsl::*;
use crate::wallets::{apply_wallet_delta, find_wallet_for_update};

use super::model::TransactionDB;
use payvault_core::errors::{DatabaseError, Result};
use payvault_core::transactions::{NewTransaction, Transaction, TransactionRepositoryTrait};
use payvault_core::Error;

/// Repository for the append-only transaction ledger.
pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository instance
    pub fn new(
        pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

/// Inserts a completed ledger row inside an already-open write job. Other
/// repositories (investments, credit) call this from their own atomic
/// units so every balance movement leaves a ledger entry.
pub(crate) fn insert_transaction_row(
    conn: &mut SqliteConnection,
    new_transaction: NewTransaction,
) -> Result<Transaction> {
    let row = TransactionDB::completed_from(new_transaction);
    diesel::insert_into(transactions::table)
        .values(&row)
        .execute(conn)
        .into_core()?;
    row.try_into()
}

/// Applies the debit and credit of a movement to the affected wallet rows,
/// touching wallets in ascending id order.
pub(crate) fn apply_movement(
    conn: &mut SqliteConnection,
    new_transaction: &NewTransaction,
) -> Result<()> {
    for wallet_id in new_transaction.wallet_ids_ordered() {
        let delta = if new_transaction.from_wallet_id.as_deref() == Some(wallet_id) {
            -new_transaction.amount
        } else {
            new_transaction.amount
        };
        let wallet = find_wallet_for_update(conn, wallet_id)?;
        apply_wallet_delta(conn, &wallet, delta)?;
    }
    Ok(())
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    /// The atomic unit of the ledger: debit, credit, and the inserted row
    /// commit together or not at all. An insufficient debit aborts the
    /// whole unit, leaving no transaction row behind.
    async fn execute(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn| {
                apply_movement(conn, &new_transaction)?;
                insert_transaction_row(conn, new_transaction)
            })
            .await
    }

    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;

        let row = transactions
            .select(TransactionDB::as_select())
            .find(transaction_id)
            .first::<TransactionDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!(
                    "transaction {}",
                    transaction_id
                )))
            })?;

        row.try_into()
    }

    fn list_for_wallet(&self, wallet: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = transactions
            .select(TransactionDB::as_select())
            .filter(
                from_wallet_id
                    .eq(wallet)
                    .or(to_wallet_id.eq(wallet)),
            )
            .order(created_at.desc())
            .load::<TransactionDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(Transaction::try_from).collect()
    }
}
