//! Core error types for the PayVault ledger.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic. Nothing here is fatal to the process; every error is
/// scoped to a single requested operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Domain errors for ledger operations.
///
/// These are detected before or inside an atomic unit; in either case the
/// operation leaves no partial state behind.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Amount is non-positive or malformed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Wallet {0} is not active")]
    InactiveWallet(String),

    /// Debit would drive a wallet balance below zero.
    #[error("Insufficient funds in wallet {wallet_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        wallet_id: String,
        balance: String,
        requested: String,
    },

    /// Sell quantity exceeds the held quantity.
    #[error("Insufficient holdings of {symbol} in wallet {wallet_id}: held {held}, requested {requested}")]
    InsufficientHoldings {
        wallet_id: String,
        symbol: String,
        held: String,
        requested: String,
    },

    /// Investment principal outside the product's min/max bounds.
    #[error("Amount {amount} out of range for product {product_id} (min {min}, max {max})")]
    AmountOutOfRange {
        product_id: String,
        amount: String,
        min: String,
        max: String,
    },

    #[error("Draw of {requested} exceeds available credit {available} on facility {facility_id}")]
    CreditLimitExceeded {
        facility_id: String,
        available: String,
        requested: String,
    },

    #[error("Repayment of {requested} exceeds used credit {used} on facility {facility_id}")]
    OverRepayment {
        facility_id: String,
        used: String,
        requested: String,
    },

    /// Optimistic version mismatch that persisted after the bounded retries.
    #[error("Concurrent modification of wallet {0}, retries exhausted")]
    ConcurrencyConflict(String),

    #[error("Investment product not found: {0}")]
    ProductNotFound(String),

    #[error("Investment not found: {0}")]
    InvestmentNotFound(String),

    #[error("Credit facility not found: {0}")]
    FacilityNotFound(String),

    /// An operation that is not legal in the entity's current state,
    /// e.g. withdrawing an already-withdrawn investment.
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

impl Error {
    /// True when the error is a version conflict that the caller may retry.
    pub fn is_retryable_conflict(&self) -> bool {
        matches!(self, Error::Ledger(LedgerError::ConcurrencyConflict(_)))
    }
}
