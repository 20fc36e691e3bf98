use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::wallets;
use crate::schema::wallets::dsl::*;

use super::model::WalletDB;
use payvault_core::errors::{LedgerError, Result};
use payvault_core::wallets::{NewWallet, Wallet, WalletRepositoryTrait, WalletType};
use payvault_core::Error;

/// Repository for managing wallet rows.
///
/// Reads go through the pool; every mutation runs on the single-writer
/// actor as an atomic unit.
pub struct WalletRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl WalletRepository {
    /// Creates a new WalletRepository instance
    pub fn new(
        pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

/// Loads one wallet row inside a write job, mapping a missing row to
/// `WalletNotFound`.
pub(crate) fn find_wallet_for_update(
    conn: &mut SqliteConnection,
    wallet_id: &str,
) -> Result<Wallet> {
    let row = wallets
        .select(WalletDB::as_select())
        .find(wallet_id)
        .first::<WalletDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::Ledger(LedgerError::WalletNotFound(wallet_id.to_string())))?;
    row.try_into()
}

/// Writes a wallet's new balance with an optimistic version guard. Returns
/// `ConcurrencyConflict` when the guarded UPDATE matched no row.
pub(crate) fn apply_wallet_delta(
    conn: &mut SqliteConnection,
    wallet: &Wallet,
    delta: Decimal,
) -> Result<Wallet> {
    wallet.ensure_active()?;
    let new_balance = wallet.apply_delta(delta)?;
    let now = crate::utils::format_timestamp(chrono::Utc::now());

    let affected = diesel::update(
        wallets
            .find(&wallet.id)
            .filter(version.eq(wallet.version)),
    )
    .set((
        balance.eq(new_balance.to_string()),
        version.eq(wallet.version + 1),
        updated_at.eq(&now),
    ))
    .execute(conn)
    .into_core()?;

    if affected == 0 {
        return Err(Error::Ledger(LedgerError::ConcurrencyConflict(
            wallet.id.clone(),
        )));
    }

    find_wallet_for_update(conn, &wallet.id)
}

#[async_trait]
impl WalletRepositoryTrait for WalletRepository {
    /// Idempotent create: one wallet per (user, type). A second request
    /// returns the existing wallet unchanged.
    async fn create(&self, new_wallet: NewWallet) -> Result<Wallet> {
        new_wallet.validate()?;

        self.writer
            .exec(move |conn| {
                let existing = wallets
                    .select(WalletDB::as_select())
                    .filter(user_id.eq(&new_wallet.user_id))
                    .filter(wallet_type.eq(new_wallet.wallet_type.as_str()))
                    .first::<WalletDB>(conn)
                    .optional()
                    .into_core()?;

                if let Some(row) = existing {
                    return row.try_into();
                }

                let wallet_db = WalletDB::from_new(new_wallet);
                diesel::insert_into(wallets::table)
                    .values(&wallet_db)
                    .execute(conn)
                    .into_core()?;

                wallet_db.try_into()
            })
            .await
    }

    fn get_by_id(&self, wallet_id: &str) -> Result<Wallet> {
        let mut conn = get_connection(&self.pool)?;

        let row = wallets
            .select(WalletDB::as_select())
            .find(wallet_id)
            .first::<WalletDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::Ledger(LedgerError::WalletNotFound(wallet_id.to_string())))?;

        row.try_into()
    }

    fn get_for_user(&self, user: &str, kind: WalletType) -> Result<Wallet> {
        let mut conn = get_connection(&self.pool)?;

        let row = wallets
            .select(WalletDB::as_select())
            .filter(user_id.eq(user))
            .filter(wallet_type.eq(kind.as_str()))
            .first::<WalletDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| {
                Error::Ledger(LedgerError::WalletNotFound(format!(
                    "{} wallet of user {}",
                    kind, user
                )))
            })?;

        row.try_into()
    }

    fn list_for_user(&self, user: &str) -> Result<Vec<Wallet>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = wallets
            .select(WalletDB::as_select())
            .filter(user_id.eq(user))
            .order(created_at.asc())
            .load::<WalletDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(Wallet::try_from).collect()
    }

    async fn adjust_balance(
        &self,
        wallet_id: &str,
        delta: Decimal,
        expected_version: i64,
    ) -> Result<Wallet> {
        let wallet_id = wallet_id.to_string();
        self.writer
            .exec(move |conn| {
                let wallet = find_wallet_for_update(conn, &wallet_id)?;
                if wallet.version != expected_version {
                    return Err(Error::Ledger(LedgerError::ConcurrencyConflict(wallet_id)));
                }
                apply_wallet_delta(conn, &wallet, delta)
            })
            .await
    }

    /// Deactivation is a soft delete: history stays queryable forever.
    async fn deactivate(&self, wallet_id: &str) -> Result<Wallet> {
        let wallet_id = wallet_id.to_string();
        self.writer
            .exec(move |conn| {
                let wallet = find_wallet_for_update(conn, &wallet_id)?;
                let now = crate::utils::format_timestamp(chrono::Utc::now());

                diesel::update(wallets.find(&wallet.id))
                    .set((is_active.eq(false), updated_at.eq(&now)))
                    .execute(conn)
                    .into_core()?;

                find_wallet_for_update(conn, &wallet.id)
            })
            .await
    }
}
