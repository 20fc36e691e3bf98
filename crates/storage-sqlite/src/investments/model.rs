//! Database models for the investment catalog and user positions.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use payvault_core::errors::{DatabaseError, Error, Result};
use payvault_core::investments::{
    InvestmentProduct, InvestmentStatus, NewInvestment, UserInvestment,
};
use rust_decimal::Decimal;

use crate::utils::{format_timestamp, parse_decimal, parse_timestamp};

/// Database model for investment products. Seeded by migrations.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::investment_products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentProductDB {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub risk_level: String,
    pub expected_annual_return: String,
    pub minimum_amount: String,
    pub maximum_amount: String,
    pub tenure_months: i32,
    pub currency: String,
    pub is_active: bool,
}

impl TryFrom<InvestmentProductDB> for InvestmentProduct {
    type Error = Error;

    fn try_from(db: InvestmentProductDB) -> Result<Self> {
        Ok(Self {
            expected_annual_return: parse_decimal(
                &db.expected_annual_return,
                "investment_products.expected_annual_return",
            )?,
            minimum_amount: parse_decimal(
                &db.minimum_amount,
                "investment_products.minimum_amount",
            )?,
            maximum_amount: parse_decimal(
                &db.maximum_amount,
                "investment_products.maximum_amount",
            )?,
            id: db.id,
            name: db.name,
            kind: db.kind,
            risk_level: db.risk_level,
            tenure_months: db.tenure_months,
            currency: db.currency,
            is_active: db.is_active,
        })
    }
}

/// Database model for user investment positions.
///
/// `funding_wallet_id` is storage-only: the settlement unit needs to know
/// which wallet to credit, but the domain model does not expose it.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::user_investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserInvestmentDB {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub funding_wallet_id: String,
    pub principal_amount: String,
    pub current_value: String,
    pub interest_earned: String,
    pub annual_return_rate: String,
    pub tenure_months: i32,
    pub currency: String,
    pub status: String,
    pub start_date: String,
    pub maturity_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserInvestmentDB {
    /// Builds the row for a freshly opened position.
    pub fn from_new(new_investment: NewInvestment) -> Self {
        let now = format_timestamp(chrono::Utc::now());
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new_investment.user_id,
            product_id: new_investment.product_id,
            funding_wallet_id: new_investment.funding_wallet_id,
            principal_amount: new_investment.principal_amount.to_string(),
            current_value: new_investment.principal_amount.to_string(),
            interest_earned: Decimal::ZERO.to_string(),
            annual_return_rate: new_investment.annual_return_rate.to_string(),
            tenure_months: new_investment.tenure_months,
            currency: new_investment.currency,
            status: InvestmentStatus::Active.as_str().to_string(),
            start_date: format_timestamp(new_investment.start_date),
            maturity_date: format_timestamp(new_investment.maturity_date),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TryFrom<UserInvestmentDB> for UserInvestment {
    type Error = Error;

    fn try_from(db: UserInvestmentDB) -> Result<Self> {
        Ok(Self {
            principal_amount: parse_decimal(
                &db.principal_amount,
                "user_investments.principal_amount",
            )?,
            current_value: parse_decimal(&db.current_value, "user_investments.current_value")?,
            interest_earned: parse_decimal(
                &db.interest_earned,
                "user_investments.interest_earned",
            )?,
            annual_return_rate: parse_decimal(
                &db.annual_return_rate,
                "user_investments.annual_return_rate",
            )?,
            status: InvestmentStatus::from_str(&db.status)
                .map_err(DatabaseError::Internal)
                .map_err(Error::Database)?,
            start_date: parse_timestamp(&db.start_date, "user_investments.start_date")?,
            maturity_date: parse_timestamp(&db.maturity_date, "user_investments.maturity_date")?,
            created_at: parse_timestamp(&db.created_at, "user_investments.created_at")?,
            updated_at: parse_timestamp(&db.updated_at, "user_investments.updated_at")?,
            id: db.id,
            user_id: db.user_id,
            product_id: db.product_id,
            tenure_months: db.tenure_months,
            currency: db.currency,
        })
    }
}
