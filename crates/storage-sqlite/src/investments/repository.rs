use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::user_investments;
use crate::schema::user_investments::dsl as inv_dsl;
use crate::schema::investment_products::dsl as prod_dsl;
use crate::transactions::insert_transaction_row;
use crate::utils::format_timestamp;
use crate::wallets::{apply_wallet_delta, find_wallet_for_update};

use super::model::{InvestmentProductDB, UserInvestmentDB};
use payvault_core::errors::{LedgerError, Result};
use payvault_core::investments::{
    InvestmentProduct, InvestmentProductRepositoryTrait, InvestmentRepositoryTrait,
    InvestmentStatus, NewInvestment, UserInvestment,
};
use payvault_core::transactions::{NewTransaction, TransactionType};
use payvault_core::Error;

/// Read-only repository over the product catalog.
pub struct InvestmentProductRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl InvestmentProductRepository {
    /// Creates a new InvestmentProductRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl InvestmentProductRepositoryTrait for InvestmentProductRepository {
    fn get_by_id(&self, product_id: &str) -> Result<InvestmentProduct> {
        let mut conn = get_connection(&self.pool)?;

        let row = prod_dsl::investment_products
            .select(InvestmentProductDB::as_select())
            .find(product_id)
            .first::<InvestmentProductDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| {
                Error::Ledger(LedgerError::ProductNotFound(product_id.to_string()))
            })?;

        row.try_into()
    }

    fn list(&self, active_only: bool) -> Result<Vec<InvestmentProduct>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = crate::schema::investment_products::table
            .select(InvestmentProductDB::as_select())
            .into_boxed();
        if active_only {
            query = query.filter(prod_dsl::is_active.eq(true));
        }

        let rows = query
            .order(prod_dsl::name.asc())
            .load::<InvestmentProductDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(InvestmentProduct::try_from).collect()
    }
}

/// Repository for user investment positions.
pub struct InvestmentRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl InvestmentRepository {
    /// Creates a new InvestmentRepository instance
    pub fn new(
        pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn find_investment_row(
    conn: &mut SqliteConnection,
    investment_id: &str,
) -> Result<UserInvestmentDB> {
    inv_dsl::user_investments
        .select(UserInvestmentDB::as_select())
        .find(investment_id)
        .first::<UserInvestmentDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| {
            Error::Ledger(LedgerError::InvestmentNotFound(investment_id.to_string()))
        })
}

#[async_trait]
impl InvestmentRepositoryTrait for InvestmentRepository {
    /// Atomic unit: debit the funding wallet by the principal, record the
    /// PAYMENT ledger entry, insert the position. A failed debit aborts
    /// before any investment record exists.
    async fn open(&self, new_investment: NewInvestment) -> Result<UserInvestment> {
        self.writer
            .exec(move |conn| {
                let wallet = find_wallet_for_update(conn, &new_investment.funding_wallet_id)?;
                apply_wallet_delta(conn, &wallet, -new_investment.principal_amount)?;

                let row = UserInvestmentDB::from_new(new_investment);
                insert_transaction_row(
                    conn,
                    NewTransaction {
                        from_wallet_id: Some(row.funding_wallet_id.clone()),
                        to_wallet_id: None,
                        amount: crate::utils::parse_decimal(
                            &row.principal_amount,
                            "user_investments.principal_amount",
                        )?,
                        currency: row.currency.clone(),
                        transaction_type: TransactionType::Payment,
                        description: Some(format!("Investment in product {}", row.product_id)),
                        counterparty_id: Some(row.product_id.clone()),
                    },
                )?;

                diesel::insert_into(user_investments::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;

                row.try_into()
            })
            .await
    }

    /// `ACTIVE -> MATURED` once the maturity date has passed, freezing the
    /// interest at its cap.
    async fn mature(&self, investment_id: &str, at: DateTime<Utc>) -> Result<UserInvestment> {
        let investment_id = investment_id.to_string();
        self.writer
            .exec(move |conn| {
                let investment: UserInvestment =
                    find_investment_row(conn, &investment_id)?.try_into()?;
                if investment.status != InvestmentStatus::Active || !investment.is_due(at) {
                    return Err(Error::Ledger(LedgerError::InvalidStateTransition(format!(
                        "investment {} is not due for maturation",
                        investment_id
                    ))));
                }

                let interest = investment.interest_cap();
                let value = investment.principal_amount + interest;
                diesel::update(inv_dsl::user_investments.find(&investment_id))
                    .set((
                        inv_dsl::status.eq(InvestmentStatus::Matured.as_str()),
                        inv_dsl::interest_earned.eq(interest.to_string()),
                        inv_dsl::current_value.eq(value.to_string()),
                        inv_dsl::updated_at.eq(format_timestamp(at)),
                    ))
                    .execute(conn)
                    .into_core()?;

                find_investment_row(conn, &investment_id)?.try_into()
            })
            .await
    }

    /// Settlement unit: compute the payout from the row's own state, credit
    /// the funding wallet (RECEIVE ledger entry), and mark the row
    /// withdrawn, all-or-nothing.
    async fn withdraw(
        &self,
        investment_id: &str,
        at: DateTime<Utc>,
        penalty_multiplier: Decimal,
    ) -> Result<UserInvestment> {
        let investment_id = investment_id.to_string();
        self.writer
            .exec(move |conn| {
                let row = find_investment_row(conn, &investment_id)?;
                let funding_wallet = row.funding_wallet_id.clone();
                let investment: UserInvestment = row.try_into()?;
                let (interest, payout) = investment.settlement(at, penalty_multiplier)?;

                let wallet = find_wallet_for_update(conn, &funding_wallet)?;
                apply_wallet_delta(conn, &wallet, payout)?;

                insert_transaction_row(
                    conn,
                    NewTransaction {
                        from_wallet_id: None,
                        to_wallet_id: Some(funding_wallet),
                        amount: payout,
                        currency: investment.currency.clone(),
                        transaction_type: TransactionType::Receive,
                        description: Some(format!(
                            "Settlement of investment {}",
                            investment.id
                        )),
                        counterparty_id: Some(investment.product_id.clone()),
                    },
                )?;

                diesel::update(inv_dsl::user_investments.find(&investment_id))
                    .set((
                        inv_dsl::status.eq(InvestmentStatus::Withdrawn.as_str()),
                        inv_dsl::interest_earned.eq(interest.to_string()),
                        inv_dsl::current_value.eq(payout.to_string()),
                        inv_dsl::updated_at.eq(format_timestamp(at)),
                    ))
                    .execute(conn)
                    .into_core()?;

                find_investment_row(conn, &investment_id)?.try_into()
            })
            .await
    }

    fn get_by_id(&self, investment_id: &str) -> Result<UserInvestment> {
        let mut conn = get_connection(&self.pool)?;

        let row = inv_dsl::user_investments
            .select(UserInvestmentDB::as_select())
            .find(investment_id)
            .first::<UserInvestmentDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| {
                Error::Ledger(LedgerError::InvestmentNotFound(investment_id.to_string()))
            })?;

        row.try_into()
    }

    fn list_for_user(&self, user: &str) -> Result<Vec<UserInvestment>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = inv_dsl::user_investments
            .select(UserInvestmentDB::as_select())
            .filter(inv_dsl::user_id.eq(user))
            .order(inv_dsl::created_at.desc())
            .load::<UserInvestmentDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(UserInvestment::try_from).collect()
    }
}
