use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use payvault_core::{
    assets::{AssetService, AssetServiceTrait},
    credit::{CreditService, CreditServiceTrait},
    holdings::{HoldingService, HoldingServiceTrait},
    investments::{InvestmentService, InvestmentServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    wallets::{WalletService, WalletServiceTrait},
};
use payvault_storage_sqlite::{
    db::{self, write_actor},
    AssetRepository, CreditRepository, HoldingRepository, InvestmentProductRepository,
    InvestmentRepository, TransactionRepository, WalletRepository,
};

/// Shared handle to every service the API routes against.
pub struct AppState {
    pub wallet_service: Arc<dyn WalletServiceTrait + Send + Sync>,
    pub transaction_service: Arc<dyn TransactionServiceTrait + Send + Sync>,
    pub holding_service: Arc<dyn HoldingServiceTrait + Send + Sync>,
    pub asset_service: Arc<dyn AssetServiceTrait + Send + Sync>,
    pub investment_service: Arc<dyn InvestmentServiceTrait + Send + Sync>,
    pub credit_service: Arc<dyn CreditServiceTrait + Send + Sync>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("PV_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Opens the database, applies migrations, spawns the single writer and
/// wires every repository and service. Called once at startup; the server
/// does not accept traffic until this returns.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let wallet_repository = Arc::new(WalletRepository::new(pool.clone(), writer.clone()));
    let wallet_service = Arc::new(WalletService::new(wallet_repository.clone()));

    let transaction_repository = Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        wallet_repository.clone(),
    ));

    let asset_repository = Arc::new(AssetRepository::new(pool.clone()));
    let asset_service = Arc::new(AssetService::new(asset_repository.clone()));

    let holding_repository = Arc::new(HoldingRepository::new(pool.clone(), writer.clone()));
    let holding_service = Arc::new(HoldingService::new(
        holding_repository,
        wallet_repository.clone(),
        asset_repository,
    ));

    let product_repository = Arc::new(InvestmentProductRepository::new(pool.clone()));
    let investment_repository = Arc::new(InvestmentRepository::new(pool.clone(), writer.clone()));
    let investment_service = Arc::new(InvestmentService::new(
        investment_repository,
        product_repository,
        wallet_repository.clone(),
        config.early_withdrawal_penalty,
    ));

    let credit_repository = Arc::new(CreditRepository::new(pool.clone(), writer.clone()));
    let credit_service = Arc::new(CreditService::new(credit_repository));

    Ok(Arc::new(AppState {
        wallet_service,
        transaction_service,
        holding_service,
        asset_service,
        investment_service,
        credit_service,
        db_path,
    }))
}
