//! Database model for credit facilities.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use payvault_core::credit::{CreditFacility, FacilityKind, FacilityStatus, NewCreditFacility};
use payvault_core::errors::{DatabaseError, Error, Result};
use rust_decimal::Decimal;

use crate::utils::{format_timestamp, parse_decimal, parse_timestamp};

/// Database model for credit facilities.
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
#[diesel(table_name = crate::schema::credit_facilities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CreditFacilityDB {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub credit_limit: String,
    pub used_credit: String,
    pub available_credit: String,
    pub interest_rate: String,
    pub status: String,
    pub next_payment_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl CreditFacilityDB {
    /// Builds the row for a new facility: nothing used, everything
    /// available.
    pub fn from_new(new_facility: NewCreditFacility) -> Self {
        let now = format_timestamp(chrono::Utc::now());
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new_facility.user_id,
            kind: new_facility.kind.as_str().to_string(),
            credit_limit: new_facility.credit_limit.to_string(),
            used_credit: Decimal::ZERO.to_string(),
            available_credit: new_facility.credit_limit.to_string(),
            interest_rate: new_facility.interest_rate.to_string(),
            status: FacilityStatus::Active.as_str().to_string(),
            next_payment_date: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TryFrom<CreditFacilityDB> for CreditFacility {
    type Error = Error;

    fn try_from(db: CreditFacilityDB) -> Result<Self> {
        Ok(Self {
            kind: FacilityKind::from_str(&db.kind)
                .map_err(DatabaseError::Internal)
                .map_err(Error::Database)?,
            credit_limit: parse_decimal(&db.credit_limit, "credit_facilities.credit_limit")?,
            used_credit: parse_decimal(&db.used_credit, "credit_facilities.used_credit")?,
            available_credit: parse_decimal(
                &db.available_credit,
                "credit_facilities.available_credit",
            )?,
            interest_rate: parse_decimal(&db.interest_rate, "credit_facilities.interest_rate")?,
            status: FacilityStatus::from_str(&db.status)
                .map_err(DatabaseError::Internal)
                .map_err(Error::Database)?,
            next_payment_date: db
                .next_payment_date
                .as_deref()
                .map(|v| parse_timestamp(v, "credit_facilities.next_payment_date"))
                .transpose()?,
            created_at: parse_timestamp(&db.created_at, "credit_facilities.created_at")?,
            updated_at: parse_timestamp(&db.updated_at, "credit_facilities.updated_at")?,
            id: db.id,
            user_id: db.user_id,
        })
    }
}
