//! Investment domain models and the accrual arithmetic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::ACCRUAL_DAYS_PER_YEAR;
use crate::errors::LedgerError;
use crate::utils::round_money;
use crate::utils::serde_formats::{decimal_format, timestamp_format};
use crate::{Error, Result};

/// Lifecycle of a fixed-term investment position.
///
/// `Active → Matured → Withdrawn`, or `Active → Withdrawn` for an early
/// exit. `Withdrawn` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentStatus {
    Active,
    Matured,
    Withdrawn,
}

impl InvestmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentStatus::Active => "ACTIVE",
            InvestmentStatus::Matured => "MATURED",
            InvestmentStatus::Withdrawn => "WITHDRAWN",
        }
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(InvestmentStatus::Active),
            "MATURED" => Ok(InvestmentStatus::Matured),
            "WITHDRAWN" => Ok(InvestmentStatus::Withdrawn),
            _ => Err(format!("Unknown investment status: {}", s)),
        }
    }
}

/// Catalog entry describing an investable product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProduct {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub risk_level: String,
    /// Expected annual return in percent (8.5 means 8.5%).
    #[serde(with = "decimal_format")]
    pub expected_annual_return: Decimal,
    #[serde(with = "decimal_format")]
    pub minimum_amount: Decimal,
    #[serde(with = "decimal_format")]
    pub maximum_amount: Decimal,
    pub tenure_months: i32,
    pub currency: String,
    pub is_active: bool,
}

impl InvestmentProduct {
    /// Bounds check for an opening principal.
    pub fn check_amount(&self, principal: Decimal) -> Result<()> {
        if principal < self.minimum_amount || principal > self.maximum_amount {
            return Err(Error::Ledger(LedgerError::AmountOutOfRange {
                product_id: self.id.clone(),
                amount: principal.to_string(),
                min: self.minimum_amount.to_string(),
                max: self.maximum_amount.to_string(),
            }));
        }
        Ok(())
    }
}

/// A user's position in a product.
///
/// The product's rate and tenure are snapshotted onto the row at open time
/// so a later catalog change never rewrites history. `current_value` always
/// equals `principal_amount + interest_earned`; for active positions both
/// are recomputed from the linear accrual formula on every read rather than
/// stored incrementally, so there is no drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvestment {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    #[serde(with = "decimal_format")]
    pub principal_amount: Decimal,
    #[serde(with = "decimal_format")]
    pub current_value: Decimal,
    #[serde(with = "decimal_format")]
    pub interest_earned: Decimal,
    /// Annual return in percent, snapshotted from the product at open time.
    #[serde(with = "decimal_format")]
    pub annual_return_rate: Decimal,
    pub tenure_months: i32,
    pub currency: String,
    pub status: InvestmentStatus,
    #[serde(with = "timestamp_format")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub maturity_date: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

impl UserInvestment {
    /// Total interest the position earns over its full tenure:
    /// `principal * rate * tenure_months / 12`.
    pub fn interest_cap(&self) -> Decimal {
        round_money(
            self.principal_amount * self.annual_return_rate / dec!(100)
                * Decimal::from(self.tenure_months)
                / dec!(12),
        )
    }

    /// Interest accrued linearly from the start date at the snapshotted
    /// annual rate: `principal * rate * elapsed_days / 365`, frozen at the
    /// cap once maturity is reached.
    pub fn accrued_interest(&self, at: DateTime<Utc>) -> Decimal {
        if at <= self.start_date {
            return Decimal::ZERO;
        }
        if at >= self.maturity_date {
            return self.interest_cap();
        }
        let elapsed_days = Decimal::from((at - self.start_date).num_days());
        let linear = self.principal_amount * self.annual_return_rate / dec!(100) * elapsed_days
            / Decimal::from(ACCRUAL_DAYS_PER_YEAR);
        round_money(linear.min(self.interest_cap()))
    }

    /// True once the position has reached its maturity date.
    pub fn is_due(&self, at: DateTime<Utc>) -> bool {
        at >= self.maturity_date
    }

    /// A copy with `interest_earned`/`current_value` recomputed for `at`.
    ///
    /// Only active positions accrue on read; matured and withdrawn
    /// positions keep their frozen values.
    pub fn with_accrual(mut self, at: DateTime<Utc>) -> Self {
        if self.status == InvestmentStatus::Active {
            self.interest_earned = self.accrued_interest(at);
            self.current_value = self.principal_amount + self.interest_earned;
        }
        self
    }

    /// Computes the interest and payout for a withdrawal at `at`.
    ///
    /// An early withdrawal (still active, before maturity) multiplies the
    /// accrued interest by `penalty_multiplier` (1.0 means no penalty).
    pub fn settlement(
        &self,
        at: DateTime<Utc>,
        penalty_multiplier: Decimal,
    ) -> Result<(Decimal, Decimal)> {
        let interest = match self.status {
            InvestmentStatus::Withdrawn => {
                return Err(Error::Ledger(LedgerError::InvalidStateTransition(format!(
                    "investment {} is already withdrawn",
                    self.id
                ))));
            }
            InvestmentStatus::Matured => self.interest_earned,
            InvestmentStatus::Active if self.is_due(at) => self.interest_cap(),
            InvestmentStatus::Active => round_money(self.accrued_interest(at) * penalty_multiplier),
        };
        let payout = round_money(self.principal_amount + interest);
        Ok((interest, payout))
    }
}

/// Input model consumed by the storage layer to open a position.
///
/// Built by the service after all catalog validation; the repository
/// executes the principal debit, the PAYMENT ledger entry, and the row
/// insert as one atomic unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    pub user_id: String,
    pub product_id: String,
    pub funding_wallet_id: String,
    #[serde(with = "decimal_format")]
    pub principal_amount: Decimal,
    #[serde(with = "decimal_format")]
    pub annual_return_rate: Decimal,
    pub tenure_months: i32,
    pub currency: String,
    #[serde(with = "timestamp_format")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub maturity_date: DateTime<Utc>,
}
