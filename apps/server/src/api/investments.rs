use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{context::RequestContext, error::ApiResult, main_lib::AppState};
use payvault_core::investments::{InvestmentProduct, UserInvestment};
use payvault_core::utils::serde_formats::decimal_format;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenInvestmentRequest {
    product_id: String,
    #[serde(with = "decimal_format")]
    principal_amount: Decimal,
}

/// List the products currently open for subscription.
async fn list_products(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<InvestmentProduct>>> {
    Ok(Json(state.investment_service.list_products()?))
}

/// Open a position; the principal is debited from the caller's primary
/// wallet inside the same atomic unit that creates the position.
async fn open_investment(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<OpenInvestmentRequest>,
) -> ApiResult<Json<UserInvestment>> {
    let investment = state
        .investment_service
        .open_investment(&ctx.user_id, &payload.product_id, payload.principal_amount)
        .await?;
    Ok(Json(investment))
}

/// List the caller's positions with interest accrued as of now.
async fn list_investments(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<UserInvestment>>> {
    Ok(Json(state.investment_service.list_investments(&ctx.user_id)?))
}

/// Settle a position back into the caller's primary wallet. Early
/// withdrawal pays penalized interest; a withdrawn position cannot be
/// withdrawn again.
async fn withdraw_investment(
    State(state): State<Arc<AppState>>,
    Path(investment_id): Path<String>,
    ctx: RequestContext,
) -> ApiResult<Json<UserInvestment>> {
    super::ensure_investment_owner(&state, &ctx, &investment_id)?;
    let investment = state
        .investment_service
        .withdraw_investment(&investment_id)
        .await?;
    Ok(Json(investment))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/investment-products", get(list_products))
        .route("/investments", post(open_investment).get(list_investments))
        .route("/investments/{id}/withdraw", post(withdraw_investment))
}
