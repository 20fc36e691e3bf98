//! Wallets module - domain models, services, and traits.

mod wallets_constants;
mod wallets_model;
mod wallets_service;
mod wallets_traits;


// Re-export the public interface
pub use wallets_constants::*;
pub use wallets_model::{NewWallet, Wallet, WalletType};
pub use wallets_service::WalletService;
pub use wallets_traits::{WalletRepositoryTrait, WalletServiceTrait};
