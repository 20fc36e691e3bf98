use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::credit_model::{CreditFacility, NewCreditFacility};
use super::credit_traits::{CreditRepositoryTrait, CreditServiceTrait};
use crate::constants::CONCURRENCY_RETRY_LIMIT;
use crate::errors::{LedgerError, Result};
use crate::Error;

/// Service managing revolving credit lines and overdrafts.
pub struct CreditService {
    repository: Arc<dyn CreditRepositoryTrait>,
}

impl CreditService {
    /// Creates a new CreditService instance.
    pub fn new(repository: Arc<dyn CreditRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn validate_amount(amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(Error::Ledger(LedgerError::InvalidAmount(format!(
                "amount must be positive, got {}",
                amount
            ))));
        }
        Ok(())
    }

    async fn run_with_retry<F, Fut>(&self, what: &str, op: F) -> Result<CreditFacility>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<CreditFacility>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Err(err) if err.is_retryable_conflict() && attempt + 1 < CONCURRENCY_RETRY_LIMIT => {
                    attempt += 1;
                    warn!(
                        "Version conflict on credit {}, retry {}/{}",
                        what, attempt, CONCURRENCY_RETRY_LIMIT
                    );
                }
                other => return other,
            }
        }
    }
}

#[async_trait::async_trait]
impl CreditServiceTrait for CreditService {
    async fn open_facility(&self, new_facility: NewCreditFacility) -> Result<CreditFacility> {
        new_facility.validate()?;
        debug!(
            "Opening {} facility for user {}, limit {}",
            new_facility.kind, new_facility.user_id, new_facility.credit_limit
        );
        self.repository.create(new_facility).await
    }

    async fn draw(&self, facility_id: &str, amount: Decimal) -> Result<CreditFacility> {
        Self::validate_amount(amount)?;
        let facility = self.repository.get_by_id(facility_id)?;
        facility.ensure_active()?;

        self.run_with_retry("draw", || self.repository.draw(facility_id, amount))
            .await
    }

    async fn repay(&self, facility_id: &str, amount: Decimal) -> Result<CreditFacility> {
        Self::validate_amount(amount)?;
        let facility = self.repository.get_by_id(facility_id)?;
        facility.ensure_active()?;

        self.run_with_retry("repayment", || self.repository.repay(facility_id, amount))
            .await
    }

    fn get_facility(&self, facility_id: &str) -> Result<CreditFacility> {
        self.repository.get_by_id(facility_id)
    }

    fn list_facilities(&self, user_id: &str) -> Result<Vec<CreditFacility>> {
        self.repository.list_for_user(user_id)
    }
}
