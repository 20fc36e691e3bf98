//! Assets module - digital-asset reference data (read-only to the ledger).

mod assets_model;
mod assets_service;
mod assets_traits;

#[cfg(test)]
mod assets_model_tests;

// Re-export the public interface
pub use assets_model::{AssetKind, DigitalAsset};
pub use assets_service::AssetService;
pub use assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
