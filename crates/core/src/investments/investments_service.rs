use chrono::{Months, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::investments_model::{InvestmentProduct, NewInvestment, UserInvestment};
use super::investments_traits::{
    InvestmentProductRepositoryTrait, InvestmentRepositoryTrait, InvestmentServiceTrait,
};
use crate::constants::CONCURRENCY_RETRY_LIMIT;
use crate::errors::{LedgerError, Result};
use crate::wallets::{WalletRepositoryTrait, WalletType};
use crate::Error;

/// Service running the fixed-term investment lifecycle.
pub struct InvestmentService {
    repository: Arc<dyn InvestmentRepositoryTrait>,
    product_repository: Arc<dyn InvestmentProductRepositoryTrait>,
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
    /// Multiplier applied to accrued interest on early withdrawal.
    /// 1.0 means no penalty; set by operating policy, not by this crate.
    early_withdrawal_penalty: Decimal,
}

impl InvestmentService {
    /// Creates a new InvestmentService instance.
    pub fn new(
        repository: Arc<dyn InvestmentRepositoryTrait>,
        product_repository: Arc<dyn InvestmentProductRepositoryTrait>,
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
        early_withdrawal_penalty: Decimal,
    ) -> Self {
        Self {
            repository,
            product_repository,
            wallet_repository,
            early_withdrawal_penalty,
        }
    }
}

#[async_trait::async_trait]
impl InvestmentServiceTrait for InvestmentService {
    async fn open_investment(
        &self,
        user_id: &str,
        product_id: &str,
        principal_amount: Decimal,
    ) -> Result<UserInvestment> {
        if principal_amount <= Decimal::ZERO {
            return Err(Error::Ledger(LedgerError::InvalidAmount(format!(
                "principal must be positive, got {}",
                principal_amount
            ))));
        }

        let product = self.product_repository.get_by_id(product_id)?;
        if !product.is_active {
            return Err(Error::Ledger(LedgerError::ProductNotFound(format!(
                "product {} is closed for subscription",
                product.id
            ))));
        }
        product.check_amount(principal_amount)?;

        // Funding comes from the user's primary wallet; resolve it before
        // the atomic unit so a missing wallet never reaches ledger state.
        let funding_wallet = self
            .wallet_repository
            .get_for_user(user_id, WalletType::Primary)?;
        funding_wallet.ensure_active()?;
        if funding_wallet.currency != product.currency {
            return Err(Error::Ledger(LedgerError::CurrencyMismatch(format!(
                "wallet {} is {}, product {} is {}",
                funding_wallet.id, funding_wallet.currency, product.id, product.currency
            ))));
        }

        let start_date = Utc::now();
        // Calendar-month arithmetic, not fixed 30-day increments.
        let maturity_date = start_date
            .checked_add_months(Months::new(product.tenure_months as u32))
            .ok_or_else(|| {
                Error::Unexpected(format!(
                    "maturity date overflow for tenure {} months",
                    product.tenure_months
                ))
            })?;

        let new_investment = NewInvestment {
            user_id: user_id.to_string(),
            product_id: product.id.clone(),
            funding_wallet_id: funding_wallet.id.clone(),
            principal_amount,
            annual_return_rate: product.expected_annual_return,
            tenure_months: product.tenure_months,
            currency: product.currency.clone(),
            start_date,
            maturity_date,
        };

        debug!(
            "Opening investment of {} {} in product {} for user {}",
            principal_amount, product.currency, product.id, user_id
        );

        let mut attempt = 0;
        loop {
            match self.repository.open(new_investment.clone()).await {
                Err(err) if err.is_retryable_conflict() && attempt + 1 < CONCURRENCY_RETRY_LIMIT => {
                    attempt += 1;
                    warn!(
                        "Version conflict opening investment, retry {}/{}",
                        attempt, CONCURRENCY_RETRY_LIMIT
                    );
                }
                other => return other,
            }
        }
    }

    async fn mature_if_due(&self, investment_id: &str) -> Result<UserInvestment> {
        self.repository.mature(investment_id, Utc::now()).await
    }

    async fn withdraw_investment(&self, investment_id: &str) -> Result<UserInvestment> {
        let now = Utc::now();
        let mut attempt = 0;
        loop {
            match self
                .repository
                .withdraw(investment_id, now, self.early_withdrawal_penalty)
                .await
            {
                Err(err) if err.is_retryable_conflict() && attempt + 1 < CONCURRENCY_RETRY_LIMIT => {
                    attempt += 1;
                    warn!(
                        "Version conflict withdrawing investment {}, retry {}/{}",
                        investment_id, attempt, CONCURRENCY_RETRY_LIMIT
                    );
                }
                other => return other,
            }
        }
    }

    fn get_investment(&self, investment_id: &str) -> Result<UserInvestment> {
        Ok(self.repository.get_by_id(investment_id)?.with_accrual(Utc::now()))
    }

    fn list_investments(&self, user_id: &str) -> Result<Vec<UserInvestment>> {
        let now = Utc::now();
        Ok(self
            .repository
            .list_for_user(user_id)?
            .into_iter()
            .map(|inv| inv.with_accrual(now))
            .collect())
    }

    fn list_products(&self) -> Result<Vec<InvestmentProduct>> {
        self.product_repository.list(true)
    }

    fn get_product(&self, product_id: &str) -> Result<InvestmentProduct> {
        self.product_repository.get_by_id(product_id)
    }
}
