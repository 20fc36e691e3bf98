//! Credit module - revolving credit lines and overdrafts.

mod credit_model;
mod credit_service;
mod credit_traits;


// Re-export the public interface
pub use credit_model::{CreditFacility, FacilityKind, FacilityStatus, NewCreditFacility};
pub use credit_service::CreditService;
pub use credit_traits::{CreditRepositoryTrait, CreditServiceTrait};
