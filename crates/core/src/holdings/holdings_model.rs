//! Asset holding domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;
use crate::utils::round_quantity;
use crate::utils::serde_formats::{decimal_format, timestamp_format};
use crate::{Error, Result};

/// Quantity and cost basis of one asset inside a crypto wallet.
///
/// One row per `(wallet_id, asset_symbol)`. The average buy price moves
/// only on buys, using a quantity-weighted mean; sells reduce quantity and
/// invested capital proportionally and never recompute the average.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHolding {
    pub id: String,
    pub wallet_id: String,
    pub asset_symbol: String,
    #[serde(with = "decimal_format")]
    pub quantity: Decimal,
    #[serde(with = "decimal_format")]
    pub average_buy_price: Decimal,
    #[serde(with = "decimal_format")]
    pub total_invested: Decimal,
    #[serde(with = "timestamp_format")]
    pub last_transaction_at: DateTime<Utc>,
}

impl AssetHolding {
    /// A fresh holding created by a first buy.
    pub fn from_first_buy(
        wallet_id: &str,
        symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            wallet_id: wallet_id.to_string(),
            asset_symbol: symbol.to_string(),
            quantity,
            average_buy_price: unit_price,
            total_invested: quantity * unit_price,
            last_transaction_at: at,
        }
    }

    /// Folds a buy into the position with a quantity-weighted average:
    /// `new_avg = (old_qty*old_avg + qty*price) / (old_qty + qty)`.
    pub fn apply_buy(&mut self, quantity: Decimal, unit_price: Decimal, at: DateTime<Utc>) {
        let new_quantity = self.quantity + quantity;
        if new_quantity > Decimal::ZERO {
            self.average_buy_price = (self.quantity * self.average_buy_price
                + quantity * unit_price)
                / new_quantity;
        }
        self.quantity = new_quantity;
        self.total_invested += quantity * unit_price;
        self.last_transaction_at = at;
    }

    /// Applies a sell, reducing quantity and invested capital
    /// proportionally. The average buy price is deliberately untouched;
    /// realized gain/loss accounting is the caller's concern.
    pub fn apply_sell(&mut self, quantity: Decimal, at: DateTime<Utc>) -> Result<()> {
        if quantity > self.quantity {
            return Err(Error::Ledger(LedgerError::InsufficientHoldings {
                wallet_id: self.wallet_id.clone(),
                symbol: self.asset_symbol.clone(),
                held: self.quantity.to_string(),
                requested: quantity.to_string(),
            }));
        }
        if quantity == self.quantity {
            // Full liquidation zeroes the row exactly, avoiding residue
            // from the proportional division.
            self.quantity = Decimal::ZERO;
            self.total_invested = Decimal::ZERO;
        } else {
            let remaining_fraction = (self.quantity - quantity) / self.quantity;
            self.total_invested *= remaining_fraction;
            self.quantity = round_quantity(self.quantity - quantity);
        }
        self.last_transaction_at = at;
        Ok(())
    }
}

/// Input model for a buy event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingBuy {
    pub wallet_id: String,
    pub asset_symbol: String,
    #[serde(with = "decimal_format")]
    pub quantity: Decimal,
    #[serde(with = "decimal_format")]
    pub unit_price: Decimal,
}

impl HoldingBuy {
    pub fn validate(&self) -> Result<()> {
        validate_symbol(&self.asset_symbol)?;
        if self.quantity <= Decimal::ZERO {
            return Err(Error::Ledger(LedgerError::InvalidAmount(format!(
                "buy quantity must be positive, got {}",
                self.quantity
            ))));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(Error::Ledger(LedgerError::InvalidAmount(format!(
                "unit price cannot be negative, got {}",
                self.unit_price
            ))));
        }
        Ok(())
    }
}

/// Input model for a sell event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingSell {
    pub wallet_id: String,
    pub asset_symbol: String,
    #[serde(with = "decimal_format")]
    pub quantity: Decimal,
}

impl HoldingSell {
    pub fn validate(&self) -> Result<()> {
        validate_symbol(&self.asset_symbol)?;
        if self.quantity <= Decimal::ZERO {
            return Err(Error::Ledger(LedgerError::InvalidAmount(format!(
                "sell quantity must be positive, got {}",
                self.quantity
            ))));
        }
        Ok(())
    }
}

fn validate_symbol(symbol: &str) -> Result<()> {
    if symbol.trim().is_empty() {
        return Err(Error::Validation(
            crate::errors::ValidationError::MissingField("assetSymbol".to_string()),
        ));
    }
    Ok(())
}
