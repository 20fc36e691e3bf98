use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{context::RequestContext, error::ApiResult, main_lib::AppState};
use payvault_core::holdings::{AssetHolding, HoldingBuy, HoldingSell};
use payvault_core::utils::serde_formats::decimal_format;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuyRequest {
    asset_symbol: String,
    #[serde(with = "decimal_format")]
    quantity: Decimal,
    #[serde(with = "decimal_format")]
    unit_price: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SellRequest {
    asset_symbol: String,
    #[serde(with = "decimal_format")]
    quantity: Decimal,
}

/// Record an asset purchase into the caller's crypto wallet.
async fn record_buy(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
    ctx: RequestContext,
    Json(payload): Json<BuyRequest>,
) -> ApiResult<Json<AssetHolding>> {
    super::ensure_wallet_owner(&state, &ctx, &wallet_id)?;
    let holding = state
        .holding_service
        .record_buy(HoldingBuy {
            wallet_id,
            asset_symbol: payload.asset_symbol,
            quantity: payload.quantity,
            unit_price: payload.unit_price,
        })
        .await?;
    Ok(Json(holding))
}

/// Record an asset sale out of the caller's crypto wallet.
async fn record_sell(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
    ctx: RequestContext,
    Json(payload): Json<SellRequest>,
) -> ApiResult<Json<AssetHolding>> {
    super::ensure_wallet_owner(&state, &ctx, &wallet_id)?;
    let holding = state
        .holding_service
        .record_sell(HoldingSell {
            wallet_id,
            asset_symbol: payload.asset_symbol,
            quantity: payload.quantity,
        })
        .await?;
    Ok(Json(holding))
}

/// List the caller's holdings in a wallet, alphabetically by symbol.
async fn list_holdings(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<AssetHolding>>> {
    super::ensure_wallet_owner(&state, &ctx, &wallet_id)?;
    Ok(Json(state.holding_service.list_holdings(&wallet_id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wallets/{id}/holdings", get(list_holdings))
        .route("/wallets/{id}/holdings/buy", post(record_buy))
        .route("/wallets/{id}/holdings/sell", post(record_sell))
}
