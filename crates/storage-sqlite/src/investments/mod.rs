//! Investment product catalog and user position persistence.

mod model;
mod repository;

pub use model::{InvestmentProductDB, UserInvestmentDB};
pub use repository::{InvestmentProductRepository, InvestmentRepository};
