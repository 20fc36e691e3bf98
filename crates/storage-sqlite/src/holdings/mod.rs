//! Asset-holding persistence.

mod model;
mod repository;

pub use model::AssetHoldingDB;
pub use repository::HoldingRepository;
