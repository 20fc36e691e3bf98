use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{error::ApiResult, main_lib::AppState};
use payvault_core::assets::DigitalAsset;

/// List the assets currently open for trading.
async fn list_assets(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<DigitalAsset>>> {
    Ok(Json(state.asset_service.list_active_assets()?))
}

/// Look up a single asset by symbol.
async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<DigitalAsset>> {
    Ok(Json(state.asset_service.get_asset(&symbol)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets", get(list_assets))
        .route("/assets/{symbol}", get(get_asset))
}
