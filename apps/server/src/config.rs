use payvault_core::errors::{Error, Result};
use rust_decimal::Decimal;

/// Server configuration, resolved once at startup from environment
/// variables. Nothing here changes while the process is running.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// Data directory the SQLite database lives in. `DATABASE_URL`
    /// overrides the resolved file path entirely.
    pub db_path: String,
    /// Multiplier applied to accrued interest when an investment is
    /// withdrawn before maturity. 1.0 keeps the full accrual.
    pub early_withdrawal_penalty: Decimal,
}

impl Config {
    /// An unset penalty defaults to 1.0; a set but unparseable one is a
    /// startup error, not a silent default.
    pub fn from_env() -> Result<Self> {
        let listen_addr =
            std::env::var("PV_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let db_path = std::env::var("PV_DB_PATH").unwrap_or_else(|_| "./data".to_string());
        let early_withdrawal_penalty = match std::env::var("PV_EARLY_WITHDRAWAL_PENALTY") {
            Ok(raw) => raw.parse::<Decimal>().map_err(|_| {
                Error::InvalidConfigValue(format!(
                    "PV_EARLY_WITHDRAWAL_PENALTY is not a decimal: '{}'",
                    raw
                ))
            })?,
            Err(_) => Decimal::ONE,
        };

        Ok(Self {
            listen_addr,
            db_path,
            early_withdrawal_penalty,
        })
    }
}
