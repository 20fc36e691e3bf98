//! Parsing helpers for the TEXT-encoded columns.
//!
//! Decimals and timestamps are stored as strings; these helpers convert
//! them back to their domain types, failing loudly instead of silently
//! substituting zeroes. A ledger that invents values is worse than one
//! that refuses to load a row.

use chrono::{DateTime, Utc};
use payvault_core::errors::{DatabaseError, Error, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a TEXT decimal column.
pub fn parse_decimal(value: &str, column: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        Error::Database(DatabaseError::Internal(format!(
            "corrupt decimal in column {}: '{}' ({})",
            column, value, e
        )))
    })
}

/// Parses a nullable TEXT decimal column.
pub fn parse_optional_decimal(value: Option<&str>, column: &str) -> Result<Option<Decimal>> {
    value.map(|v| parse_decimal(v, column)).transpose()
}

/// Parses a TEXT timestamp column (RFC 3339, UTC).
pub fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            Error::Database(DatabaseError::Internal(format!(
                "corrupt timestamp in column {}: '{}' ({})",
                column, value, e
            )))
        })
}

/// Formats a timestamp for storage.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_round_trip() {
        assert_eq!(parse_decimal("123.45", "balance").unwrap(), dec!(123.45));
        assert_eq!(parse_decimal("-0.00000001", "q").unwrap(), dec!(-0.00000001));
        assert!(parse_decimal("not-a-number", "balance").is_err());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let now = Utc::now();
        let parsed = parse_timestamp(&format_timestamp(now), "created_at").unwrap();
        assert_eq!(parsed, now);
        assert!(parse_timestamp("yesterday", "created_at").is_err());
    }

    #[test]
    fn test_optional_decimal() {
        assert_eq!(parse_optional_decimal(None, "limit").unwrap(), None);
        assert_eq!(
            parse_optional_decimal(Some("5.00"), "limit").unwrap(),
            Some(dec!(5.00))
        );
    }
}
