//! Wallet persistence.

mod model;
mod repository;

pub use model::WalletDB;
pub use repository::WalletRepository;

pub(crate) use repository::{apply_wallet_delta, find_wallet_for_update};
