//! Digital-asset reference data (read-only to the ledger).

mod model;
mod repository;

pub use model::DigitalAssetDB;
pub use repository::AssetRepository;
