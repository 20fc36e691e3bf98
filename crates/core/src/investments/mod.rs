//! Investments module - fixed-term positions against a product catalog.

mod investments_model;
mod investments_service;
mod investments_traits;

#[cfg(test)]
mod investments_service_tests;

// Re-export the public interface
pub use investments_model::{
    InvestmentProduct, InvestmentStatus, NewInvestment, UserInvestment,
};
pub use investments_service::InvestmentService;
pub use investments_traits::{
    InvestmentProductRepositoryTrait, InvestmentRepositoryTrait, InvestmentServiceTrait,
};
