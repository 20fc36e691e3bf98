//! Shared utilities: serde formats for money/timestamps and decimal helpers.

pub mod money;
pub mod serde_formats;

pub use money::{round_money, round_quantity};
