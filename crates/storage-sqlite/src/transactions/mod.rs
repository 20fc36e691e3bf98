//! Transaction ledger persistence.

mod model;
mod repository;

pub use model::TransactionDB;
pub use repository::TransactionRepository;

pub(crate) use repository::insert_transaction_row;
