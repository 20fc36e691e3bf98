//! PayVault HTTP server: axum routes over the core ledger services.
//!
//! Exposed as a library so integration tests can build the router
//! in-process with `tower::ServiceExt`.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod main_lib;

pub use main_lib::{build_state, init_tracing, AppState};
