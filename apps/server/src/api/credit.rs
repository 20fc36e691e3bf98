use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{context::RequestContext, error::ApiResult, main_lib::AppState};
use payvault_core::credit::{CreditFacility, FacilityKind, NewCreditFacility};
use payvault_core::utils::serde_formats::decimal_format;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenFacilityRequest {
    kind: FacilityKind,
    #[serde(with = "decimal_format")]
    credit_limit: Decimal,
    #[serde(with = "decimal_format")]
    interest_rate: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmountRequest {
    #[serde(with = "decimal_format")]
    amount: Decimal,
}

/// Open a credit facility for the calling user.
async fn open_facility(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<OpenFacilityRequest>,
) -> ApiResult<Json<CreditFacility>> {
    let facility = state
        .credit_service
        .open_facility(NewCreditFacility {
            user_id: ctx.user_id,
            kind: payload.kind,
            credit_limit: payload.credit_limit,
            interest_rate: payload.interest_rate,
        })
        .await?;
    Ok(Json(facility))
}

/// List the caller's facilities.
async fn list_facilities(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<CreditFacility>>> {
    Ok(Json(state.credit_service.list_facilities(&ctx.user_id)?))
}

/// Draw against one of the caller's facilities into their primary
/// wallet.
async fn draw(
    State(state): State<Arc<AppState>>,
    Path(facility_id): Path<String>,
    ctx: RequestContext,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<Json<CreditFacility>> {
    super::ensure_facility_owner(&state, &ctx, &facility_id)?;
    let facility = state.credit_service.draw(&facility_id, payload.amount).await?;
    Ok(Json(facility))
}

/// Repay used credit from the caller's primary wallet.
async fn repay(
    State(state): State<Arc<AppState>>,
    Path(facility_id): Path<String>,
    ctx: RequestContext,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<Json<CreditFacility>> {
    super::ensure_facility_owner(&state, &ctx, &facility_id)?;
    let facility = state
        .credit_service
        .repay(&facility_id, payload.amount)
        .await?;
    Ok(Json(facility))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/credit-facilities",
            post(open_facility).get(list_facilities),
        )
        .route("/credit-facilities/{id}/draw", post(draw))
        .route("/credit-facilities/{id}/repay", post(repay))
}
