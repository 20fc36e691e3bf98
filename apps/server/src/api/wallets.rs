use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{context::RequestContext, error::ApiResult, main_lib::AppState};
use payvault_core::transactions::Transaction;
use payvault_core::utils::serde_formats::decimal_format;
use payvault_core::wallets::{NewWallet, Wallet, WalletType};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWalletRequest {
    wallet_type: WalletType,
    currency: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopupRequest {
    #[serde(with = "decimal_format")]
    amount: Decimal,
    source: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WithdrawRequest {
    #[serde(with = "decimal_format")]
    amount: Decimal,
    sink: Option<String>,
}

/// Create a wallet for the calling user. Idempotent per wallet type.
async fn create_wallet(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<CreateWalletRequest>,
) -> ApiResult<Json<Wallet>> {
    let wallet = state
        .wallet_service
        .create_wallet(NewWallet {
            user_id: ctx.user_id,
            wallet_type: payload.wallet_type,
            currency: payload.currency,
        })
        .await?;
    Ok(Json(wallet))
}

/// List the calling user's wallets.
async fn list_wallets(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<Wallet>>> {
    Ok(Json(state.wallet_service.list_wallets(&ctx.user_id)?))
}

/// List every transaction touching one of the caller's wallets,
/// newest first. Unknown or foreign wallets are a 404, not an empty
/// list.
async fn list_wallet_transactions(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<Transaction>>> {
    super::ensure_wallet_owner(&state, &ctx, &wallet_id)?;
    Ok(Json(
        state.transaction_service.list_for_wallet(&wallet_id)?,
    ))
}

/// Credit one of the caller's wallets from an external source.
async fn top_up(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
    ctx: RequestContext,
    Json(payload): Json<TopupRequest>,
) -> ApiResult<Json<Transaction>> {
    super::ensure_wallet_owner(&state, &ctx, &wallet_id)?;
    let transaction = state
        .transaction_service
        .top_up(&wallet_id, payload.amount, payload.source)
        .await?;
    Ok(Json(transaction))
}

/// Debit one of the caller's wallets into an external sink.
async fn withdraw(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
    ctx: RequestContext,
    Json(payload): Json<WithdrawRequest>,
) -> ApiResult<Json<Transaction>> {
    super::ensure_wallet_owner(&state, &ctx, &wallet_id)?;
    let transaction = state
        .transaction_service
        .withdraw(&wallet_id, payload.amount, payload.sink)
        .await?;
    Ok(Json(transaction))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wallets", post(create_wallet).get(list_wallets))
        .route(
            "/wallets/{id}/transactions",
            get(list_wallet_transactions),
        )
        .route("/wallets/{id}/topup", post(top_up))
        .route("/wallets/{id}/withdraw", post(withdraw))
}
