//! Investment repository and service traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::investments_model::{InvestmentProduct, NewInvestment, UserInvestment};
use crate::errors::Result;

/// Trait defining read access to the investment-product catalog.
pub trait InvestmentProductRepositoryTrait: Send + Sync {
    /// Retrieves a product by its ID.
    fn get_by_id(&self, product_id: &str) -> Result<InvestmentProduct>;

    /// Lists products, optionally restricted to active ones.
    fn list(&self, active_only: bool) -> Result<Vec<InvestmentProduct>>;
}

/// Trait defining the contract for investment-position persistence.
///
/// Every mutating method is one atomic unit covering the position row, the
/// funding-wallet balance, and the accompanying ledger entry.
#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    /// Debits the funding wallet by the principal (PAYMENT ledger entry)
    /// and inserts the position. A failed debit aborts before any
    /// investment record exists.
    async fn open(&self, new_investment: NewInvestment) -> Result<UserInvestment>;

    /// Transitions `ACTIVE → MATURED` when `at` has reached the maturity
    /// date, freezing the interest at its cap. A no-op error otherwise.
    async fn mature(&self, investment_id: &str, at: DateTime<Utc>) -> Result<UserInvestment>;

    /// Settles the position: credits the payout back to the funding wallet
    /// (RECEIVE ledger entry) and marks the row withdrawn.
    ///
    /// The settlement amounts are recomputed inside the atomic unit from
    /// the row's own state so that a concurrent maturation cannot be lost.
    async fn withdraw(
        &self,
        investment_id: &str,
        at: DateTime<Utc>,
        penalty_multiplier: Decimal,
    ) -> Result<UserInvestment>;

    /// Retrieves a position by its ID.
    fn get_by_id(&self, investment_id: &str) -> Result<UserInvestment>;

    /// Lists a user's positions, newest first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<UserInvestment>>;
}

/// Trait defining the contract for the investment engine.
#[async_trait]
pub trait InvestmentServiceTrait: Send + Sync {
    /// Opens a position against a catalog product, debiting the user's
    /// primary wallet by the principal.
    async fn open_investment(
        &self,
        user_id: &str,
        product_id: &str,
        principal_amount: Decimal,
    ) -> Result<UserInvestment>;

    /// Matures the position if its maturity date has passed.
    async fn mature_if_due(&self, investment_id: &str) -> Result<UserInvestment>;

    /// Withdraws the position, crediting its current value back to the
    /// user's primary wallet.
    async fn withdraw_investment(&self, investment_id: &str) -> Result<UserInvestment>;

    /// Retrieves a position with accrual applied as of now.
    fn get_investment(&self, investment_id: &str) -> Result<UserInvestment>;

    /// Lists a user's positions with accrual applied as of now.
    fn list_investments(&self, user_id: &str) -> Result<Vec<UserInvestment>>;

    /// Lists the active product catalog.
    fn list_products(&self) -> Result<Vec<InvestmentProduct>>;

    /// Retrieves a catalog product.
    fn get_product(&self, product_id: &str) -> Result<InvestmentProduct>;
}
