/// Wallet type constants as stored in the database.
pub mod wallet_types {
    pub const PRIMARY: &str = "PRIMARY";
    pub const SAVINGS: &str = "SAVINGS";
    pub const CRYPTO: &str = "CRYPTO";
    pub const INVESTMENT: &str = "INVESTMENT";
}

/// Returns true if the given wallet type string is valid.
pub fn is_valid_wallet_type(wallet_type: &str) -> bool {
    matches!(
        wallet_type,
        wallet_types::PRIMARY
            | wallet_types::SAVINGS
            | wallet_types::CRYPTO
            | wallet_types::INVESTMENT
    )
}
