use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{context::RequestContext, error::ApiResult, main_lib::AppState};
use payvault_core::transactions::Transaction;
use payvault_core::utils::serde_formats::decimal_format;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferRequest {
    from_wallet_id: String,
    to_wallet_id: String,
    #[serde(with = "decimal_format")]
    amount: Decimal,
    description: Option<String>,
}

/// Move money between two wallets of the same currency. The caller
/// must own the debited wallet; the credited one may belong to anyone.
/// Atomic: the debit, the credit and the ledger row commit together or
/// not at all.
async fn create_transfer(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<TransferRequest>,
) -> ApiResult<Json<Transaction>> {
    super::ensure_wallet_owner(&state, &ctx, &payload.from_wallet_id)?;
    let transaction = state
        .transaction_service
        .transfer(
            &payload.from_wallet_id,
            &payload.to_wallet_id,
            payload.amount,
            payload.description,
        )
        .await?;
    Ok(Json(transaction))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/transfers", post(create_transfer))
}
