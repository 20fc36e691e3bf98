//! SQLite storage implementation for the PayVault ledger.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `payvault-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations (with seeded reference data)
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. Everything else is database-agnostic and works with traits.
//!
//! All mutations run on a single writer actor that owns one connection and
//! executes every job inside an immediate transaction; reads go through the
//! pool. That writer is what makes the multi-row atomic units (transfer,
//! investment open, credit draw) all-or-nothing.
//!
//! ```text
//! core (domain)
//!       │
//!       ▼
//! storage-sqlite (this crate)
//!       │
//!       ▼
//!   SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod assets;
pub mod credit;
pub mod holdings;
pub mod investments;
pub mod transactions;
pub mod wallets;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export repositories at the crate root for wiring convenience
pub use assets::AssetRepository;
pub use credit::CreditRepository;
pub use holdings::HoldingRepository;
pub use investments::{InvestmentProductRepository, InvestmentRepository};
pub use transactions::TransactionRepository;
pub use wallets::WalletRepository;

// Re-export from payvault-core for convenience
pub use payvault_core::errors::{DatabaseError, Error, Result};
