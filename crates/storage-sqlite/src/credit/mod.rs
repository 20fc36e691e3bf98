//! Credit facility persistence.

mod model;
mod repository;

pub use model::CreditFacilityDB;
pub use repository::CreditRepository;
