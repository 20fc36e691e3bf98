use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::asset_holdings;
use crate::schema::asset_holdings::dsl::*;

use super::model::AssetHoldingDB;
use payvault_core::errors::{DatabaseError, LedgerError, Result};
use payvault_core::holdings::{AssetHolding, HoldingBuy, HoldingRepositoryTrait, HoldingSell};
use payvault_core::Error;

/// Repository for per-asset positions inside crypto wallets.
pub struct HoldingRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl HoldingRepository {
    /// Creates a new HoldingRepository instance
    pub fn new(
        pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn find_holding(
    conn: &mut SqliteConnection,
    wallet: &str,
    symbol: &str,
) -> Result<Option<AssetHolding>> {
    asset_holdings
        .select(AssetHoldingDB::as_select())
        .filter(wallet_id.eq(wallet))
        .filter(asset_symbol.eq(symbol))
        .first::<AssetHoldingDB>(conn)
        .optional()
        .into_core()?
        .map(AssetHolding::try_from)
        .transpose()
}

fn save_holding(conn: &mut SqliteConnection, holding: &AssetHolding) -> Result<()> {
    let row = AssetHoldingDB::from_domain(holding);
    diesel::update(asset_holdings.find(&row.id))
        .set(&row)
        .execute(conn)
        .into_core()?;
    Ok(())
}

#[async_trait]
impl HoldingRepositoryTrait for HoldingRepository {
    /// Upserts the position for a buy: the read-modify-write of the row
    /// happens inside one write job.
    async fn record_buy(&self, buy: HoldingBuy) -> Result<AssetHolding> {
        self.writer
            .exec(move |conn| {
                let now = Utc::now();
                match find_holding(conn, &buy.wallet_id, &buy.asset_symbol)? {
                    Some(mut holding) => {
                        holding.apply_buy(buy.quantity, buy.unit_price, now);
                        save_holding(conn, &holding)?;
                        Ok(holding)
                    }
                    None => {
                        let mut holding = AssetHolding::from_first_buy(
                            &buy.wallet_id,
                            &buy.asset_symbol,
                            buy.quantity,
                            buy.unit_price,
                            now,
                        );
                        holding.id = uuid::Uuid::new_v4().to_string();
                        diesel::insert_into(asset_holdings::table)
                            .values(&AssetHoldingDB::from_domain(&holding))
                            .execute(conn)
                            .into_core()?;
                        Ok(holding)
                    }
                }
            })
            .await
    }

    /// A sell against a row that does not exist is an insufficient-holdings
    /// error, the same as overselling an existing row. A full liquidation
    /// keeps the zeroed row so the position's history stays addressable.
    async fn record_sell(&self, sell: HoldingSell) -> Result<AssetHolding> {
        self.writer
            .exec(move |conn| {
                let mut holding = find_holding(conn, &sell.wallet_id, &sell.asset_symbol)?
                    .ok_or_else(|| {
                        Error::Ledger(LedgerError::InsufficientHoldings {
                            wallet_id: sell.wallet_id.clone(),
                            symbol: sell.asset_symbol.clone(),
                            held: "0".to_string(),
                            requested: sell.quantity.to_string(),
                        })
                    })?;
                holding.apply_sell(sell.quantity, Utc::now())?;
                save_holding(conn, &holding)?;
                Ok(holding)
            })
            .await
    }

    fn get_holding(&self, wallet: &str, symbol: &str) -> Result<AssetHolding> {
        let mut conn = get_connection(&self.pool)?;

        let row = asset_holdings
            .select(AssetHoldingDB::as_select())
            .filter(wallet_id.eq(wallet))
            .filter(asset_symbol.eq(symbol))
            .first::<AssetHoldingDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!(
                    "holding {} in wallet {}",
                    symbol, wallet
                )))
            })?;

        row.try_into()
    }

    fn list_for_wallet(&self, wallet: &str) -> Result<Vec<AssetHolding>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = asset_holdings
            .select(AssetHoldingDB::as_select())
            .filter(wallet_id.eq(wallet))
            .order(asset_symbol.asc())
            .load::<AssetHoldingDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(AssetHolding::try_from).collect()
    }
}
