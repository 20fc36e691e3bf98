/// Decimal precision for monetary amounts (API and storage).
pub const MONEY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for asset quantities.
pub const QUANTITY_DECIMAL_PRECISION: u32 = 8;

/// Bounded retry count for optimistic-concurrency conflicts.
pub const CONCURRENCY_RETRY_LIMIT: u32 = 3;

/// Days per year used by the linear accrual formula.
pub const ACCRUAL_DAYS_PER_YEAR: i64 = 365;
