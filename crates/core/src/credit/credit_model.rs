//! Credit facility domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::LedgerError;
use crate::utils::serde_formats::{decimal_format, timestamp_format};
use crate::{Error, Result};

/// Kind of revolving facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacilityKind {
    CreditLine,
    Overdraft,
}

impl FacilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityKind::CreditLine => "CREDIT_LINE",
            FacilityKind::Overdraft => "OVERDRAFT",
        }
    }
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "CREDIT_LINE" => Ok(FacilityKind::CreditLine),
            "OVERDRAFT" => Ok(FacilityKind::Overdraft),
            _ => Err(format!("Unknown facility kind: {}", s)),
        }
    }
}

/// Facility lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacilityStatus {
    #[default]
    Active,
    Suspended,
    Closed,
}

impl FacilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityStatus::Active => "ACTIVE",
            FacilityStatus::Suspended => "SUSPENDED",
            FacilityStatus::Closed => "CLOSED",
        }
    }
}

impl FromStr for FacilityStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(FacilityStatus::Active),
            "SUSPENDED" => Ok(FacilityStatus::Suspended),
            "CLOSED" => Ok(FacilityStatus::Closed),
            _ => Err(format!("Unknown facility status: {}", s)),
        }
    }
}

/// A revolving line of credit or overdraft.
///
/// Invariant: `used_credit + available_credit == credit_limit` after every
/// draw and repayment. Both mutations run through `apply_draw`/`apply_repay`
/// so the conservation arithmetic lives in exactly one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditFacility {
    pub id: String,
    pub user_id: String,
    pub kind: FacilityKind,
    #[serde(with = "decimal_format")]
    pub credit_limit: Decimal,
    #[serde(with = "decimal_format")]
    pub used_credit: Decimal,
    #[serde(with = "decimal_format")]
    pub available_credit: Decimal,
    /// Annual interest rate in percent.
    #[serde(with = "decimal_format")]
    pub interest_rate: Decimal,
    pub status: FacilityStatus,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<DateTime<Utc>>,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

impl CreditFacility {
    /// Errors unless the facility is active.
    pub fn ensure_active(&self) -> Result<()> {
        if self.status == FacilityStatus::Active {
            Ok(())
        } else {
            Err(Error::Ledger(LedgerError::InvalidStateTransition(format!(
                "facility {} is {}",
                self.id,
                self.status.as_str()
            ))))
        }
    }

    /// Moves `amount` from available to used credit.
    pub fn apply_draw(&mut self, amount: Decimal) -> Result<()> {
        if amount > self.available_credit {
            return Err(Error::Ledger(LedgerError::CreditLimitExceeded {
                facility_id: self.id.clone(),
                available: self.available_credit.to_string(),
                requested: amount.to_string(),
            }));
        }
        self.used_credit += amount;
        self.available_credit -= amount;
        Ok(())
    }

    /// Moves `amount` from used back to available credit.
    pub fn apply_repay(&mut self, amount: Decimal) -> Result<()> {
        if amount > self.used_credit {
            return Err(Error::Ledger(LedgerError::OverRepayment {
                facility_id: self.id.clone(),
                used: self.used_credit.to_string(),
                requested: amount.to_string(),
            }));
        }
        self.used_credit -= amount;
        self.available_credit += amount;
        Ok(())
    }
}

/// Input model for opening a facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCreditFacility {
    pub user_id: String,
    pub kind: FacilityKind,
    #[serde(with = "decimal_format")]
    pub credit_limit: Decimal,
    #[serde(with = "decimal_format")]
    pub interest_rate: Decimal,
}

impl NewCreditFacility {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation(
                crate::errors::ValidationError::MissingField("userId".to_string()),
            ));
        }
        if self.credit_limit <= Decimal::ZERO {
            return Err(Error::Ledger(LedgerError::InvalidAmount(format!(
                "credit limit must be positive, got {}",
                self.credit_limit
            ))));
        }
        if self.interest_rate < Decimal::ZERO {
            return Err(Error::Ledger(LedgerError::InvalidAmount(format!(
                "interest rate cannot be negative, got {}",
                self.interest_rate
            ))));
        }
        Ok(())
    }
}
