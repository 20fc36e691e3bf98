use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::credit_facilities;
use crate::schema::credit_facilities::dsl as cf_dsl;
use crate::schema::wallets::dsl as w_dsl;
use crate::transactions::insert_transaction_row;
use crate::utils::format_timestamp;
use crate::wallets::{apply_wallet_delta, WalletDB};

use super::model::CreditFacilityDB;
use payvault_core::credit::{CreditFacility, CreditRepositoryTrait, NewCreditFacility};
use payvault_core::errors::{LedgerError, Result};
use payvault_core::transactions::{NewTransaction, TransactionType};
use payvault_core::wallets::{Wallet, WalletType};
use payvault_core::Error;

/// Repository for revolving credit facilities.
///
/// Draws and repayments settle against the user's primary wallet inside
/// the same atomic unit that mutates the facility row.
pub struct CreditRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CreditRepository {
    /// Creates a new CreditRepository instance
    pub fn new(
        pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn find_facility(conn: &mut SqliteConnection, facility_id: &str) -> Result<CreditFacility> {
    let row = cf_dsl::credit_facilities
        .select(CreditFacilityDB::as_select())
        .find(facility_id)
        .first::<CreditFacilityDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::Ledger(LedgerError::FacilityNotFound(facility_id.to_string())))?;
    row.try_into()
}

fn find_primary_wallet(conn: &mut SqliteConnection, user: &str) -> Result<Wallet> {
    let row = w_dsl::wallets
        .select(WalletDB::as_select())
        .filter(w_dsl::user_id.eq(user))
        .filter(w_dsl::wallet_type.eq(WalletType::Primary.as_str()))
        .first::<WalletDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| {
            Error::Ledger(LedgerError::WalletNotFound(format!(
                "PRIMARY wallet of user {}",
                user
            )))
        })?;
    row.try_into()
}

fn save_facility(conn: &mut SqliteConnection, facility: &CreditFacility) -> Result<()> {
    diesel::update(cf_dsl::credit_facilities.find(&facility.id))
        .set((
            cf_dsl::used_credit.eq(facility.used_credit.to_string()),
            cf_dsl::available_credit.eq(facility.available_credit.to_string()),
            cf_dsl::updated_at.eq(format_timestamp(chrono::Utc::now())),
        ))
        .execute(conn)
        .into_core()?;
    Ok(())
}

#[async_trait]
impl CreditRepositoryTrait for CreditRepository {
    async fn create(&self, new_facility: NewCreditFacility) -> Result<CreditFacility> {
        self.writer
            .exec(move |conn| {
                let row = CreditFacilityDB::from_new(new_facility);
                diesel::insert_into(credit_facilities::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                row.try_into()
            })
            .await
    }

    /// Atomic unit: move credit from available to used, credit the user's
    /// primary wallet, record the RECEIVE ledger entry.
    async fn draw(&self, facility_id: &str, amount: Decimal) -> Result<CreditFacility> {
        let facility_id = facility_id.to_string();
        self.writer
            .exec(move |conn| {
                let mut facility = find_facility(conn, &facility_id)?;
                facility.ensure_active()?;
                facility.apply_draw(amount)?;

                let wallet = find_primary_wallet(conn, &facility.user_id)?;
                apply_wallet_delta(conn, &wallet, amount)?;

                insert_transaction_row(
                    conn,
                    NewTransaction {
                        from_wallet_id: None,
                        to_wallet_id: Some(wallet.id),
                        amount,
                        currency: wallet.currency,
                        transaction_type: TransactionType::Receive,
                        description: Some(format!("Draw from facility {}", facility.id)),
                        counterparty_id: Some(facility.id.clone()),
                    },
                )?;

                save_facility(conn, &facility)?;
                find_facility(conn, &facility.id)
            })
            .await
    }

    /// Atomic unit: debit the user's primary wallet (subject to the usual
    /// insufficient-funds rule), move credit from used back to available,
    /// record the PAYMENT ledger entry.
    async fn repay(&self, facility_id: &str, amount: Decimal) -> Result<CreditFacility> {
        let facility_id = facility_id.to_string();
        self.writer
            .exec(move |conn| {
                let mut facility = find_facility(conn, &facility_id)?;
                facility.ensure_active()?;
                facility.apply_repay(amount)?;

                let wallet = find_primary_wallet(conn, &facility.user_id)?;
                apply_wallet_delta(conn, &wallet, -amount)?;

                insert_transaction_row(
                    conn,
                    NewTransaction {
                        from_wallet_id: Some(wallet.id),
                        to_wallet_id: None,
                        amount,
                        currency: wallet.currency,
                        transaction_type: TransactionType::Payment,
                        description: Some(format!("Repayment to facility {}", facility.id)),
                        counterparty_id: Some(facility.id.clone()),
                    },
                )?;

                save_facility(conn, &facility)?;
                find_facility(conn, &facility.id)
            })
            .await
    }

    fn get_by_id(&self, facility_id: &str) -> Result<CreditFacility> {
        let mut conn = get_connection(&self.pool)?;

        let row = cf_dsl::credit_facilities
            .select(CreditFacilityDB::as_select())
            .find(facility_id)
            .first::<CreditFacilityDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| {
                Error::Ledger(LedgerError::FacilityNotFound(facility_id.to_string()))
            })?;

        row.try_into()
    }

    fn list_for_user(&self, user: &str) -> Result<Vec<CreditFacility>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = cf_dsl::credit_facilities
            .select(CreditFacilityDB::as_select())
            .filter(cf_dsl::user_id.eq(user))
            .order(cf_dsl::created_at.asc())
            .load::<CreditFacilityDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(CreditFacility::try_from).collect()
    }
}
