//! Credit facility repository and service traits.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::credit_model::{CreditFacility, NewCreditFacility};
use crate::errors::Result;

/// Trait defining the contract for credit-facility persistence.
///
/// `draw` and `repay` are atomic units spanning the facility row, the
/// user's primary-wallet balance, and the accompanying ledger entry.
#[async_trait]
pub trait CreditRepositoryTrait: Send + Sync {
    /// Inserts a facility with `used_credit = 0` and
    /// `available_credit = credit_limit`.
    async fn create(&self, new_facility: NewCreditFacility) -> Result<CreditFacility>;

    /// Draws against the facility, crediting the user's primary wallet
    /// (RECEIVE ledger entry).
    async fn draw(&self, facility_id: &str, amount: Decimal) -> Result<CreditFacility>;

    /// Repays the facility, debiting the user's primary wallet
    /// (PAYMENT ledger entry); the debit is subject to the usual
    /// insufficient-funds rule.
    async fn repay(&self, facility_id: &str, amount: Decimal) -> Result<CreditFacility>;

    /// Retrieves a facility by its ID.
    fn get_by_id(&self, facility_id: &str) -> Result<CreditFacility>;

    /// Lists a user's facilities.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<CreditFacility>>;
}

/// Trait defining the contract for the credit facility manager.
#[async_trait]
pub trait CreditServiceTrait: Send + Sync {
    /// Opens a facility with business validation.
    async fn open_facility(&self, new_facility: NewCreditFacility) -> Result<CreditFacility>;

    /// Draws `amount` against a facility into the user's primary wallet.
    async fn draw(&self, facility_id: &str, amount: Decimal) -> Result<CreditFacility>;

    /// Repays `amount` of used credit from the user's primary wallet.
    async fn repay(&self, facility_id: &str, amount: Decimal) -> Result<CreditFacility>;

    /// Retrieves a facility by ID.
    fn get_facility(&self, facility_id: &str) -> Result<CreditFacility>;

    /// Lists a user's facilities.
    fn list_facilities(&self, user_id: &str) -> Result<Vec<CreditFacility>>;
}
