mod assets;
mod credit;
mod health;
mod holdings;
mod investments;
mod transfers;
mod wallets;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::context::RequestContext;
use crate::error::ApiResult;
use crate::main_lib::AppState;
use payvault_core::errors::{Error, LedgerError};

/// Resolves a wallet id and checks it belongs to the caller. A wallet
/// owned by someone else is reported as missing, not as forbidden.
pub(crate) fn ensure_wallet_owner(
    state: &AppState,
    ctx: &RequestContext,
    wallet_id: &str,
) -> ApiResult<()> {
    let wallet = state.wallet_service.get_wallet_by_id(wallet_id)?;
    if wallet.user_id != ctx.user_id {
        return Err(Error::Ledger(LedgerError::WalletNotFound(wallet_id.to_string())).into());
    }
    Ok(())
}

pub(crate) fn ensure_facility_owner(
    state: &AppState,
    ctx: &RequestContext,
    facility_id: &str,
) -> ApiResult<()> {
    let facility = state.credit_service.get_facility(facility_id)?;
    if facility.user_id != ctx.user_id {
        return Err(Error::Ledger(LedgerError::FacilityNotFound(facility_id.to_string())).into());
    }
    Ok(())
}

pub(crate) fn ensure_investment_owner(
    state: &AppState,
    ctx: &RequestContext,
    investment_id: &str,
) -> ApiResult<()> {
    let investment = state.investment_service.get_investment(investment_id)?;
    if investment.user_id != ctx.user_id {
        return Err(
            Error::Ledger(LedgerError::InvestmentNotFound(investment_id.to_string())).into(),
        );
    }
    Ok(())
}

/// Composes the versioned API surface. Every route lives under `/api/v1`.
pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(assets::router())
        .merge(wallets::router())
        .merge(transfers::router())
        .merge(holdings::router())
        .merge(investments::router())
        .merge(credit::router())
        .merge(health::router());

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
