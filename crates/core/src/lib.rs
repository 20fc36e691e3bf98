//! PayVault Core - Domain entities, services, and traits for the account
//! ledger.
//!
//! This crate contains the business logic of the ledger: wallets, the
//! append-only transaction record, asset holdings, fixed-term investments,
//! and revolving credit facilities. It is database-agnostic and defines
//! traits that are implemented by the `storage-sqlite` crate.

pub mod assets;
pub mod constants;
pub mod credit;
pub mod errors;
pub mod holdings;
pub mod investments;
pub mod transactions;
pub mod utils;
pub mod wallets;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
