//! Holdings module - per-asset balances inside a crypto wallet.

mod holdings_model;
mod holdings_service;
mod holdings_traits;

#[cfg(test)]
mod holdings_model_tests;
#[cfg(test)]
mod holdings_service_tests;

// Re-export the public interface
pub use holdings_model::{AssetHolding, HoldingBuy, HoldingSell};
pub use holdings_service::HoldingService;
pub use holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
