use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use payvault_core::errors::{DatabaseError, Error, LedgerError};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Wrapper turning a domain error into an HTTP response.
///
/// The mapping is deliberate: validation problems are the caller's fault
/// (400), a missing entity is 404, a version conflict that survived the
/// retries is 409, a rule the ledger refused to break is 422, and anything
/// the storage layer coughed up is 500.
pub struct ApiError(pub Error);

impl<E> From<E> for ApiError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

fn classify(err: &Error) -> (StatusCode, &'static str) {
    match err {
        Error::Validation(_) | Error::InvalidConfigValue(_) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
        }
        Error::Ledger(ledger) => match ledger {
            LedgerError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            LedgerError::WalletNotFound(_) => (StatusCode::NOT_FOUND, "WALLET_NOT_FOUND"),
            LedgerError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "PRODUCT_NOT_FOUND"),
            LedgerError::InvestmentNotFound(_) => (StatusCode::NOT_FOUND, "INVESTMENT_NOT_FOUND"),
            LedgerError::FacilityNotFound(_) => (StatusCode::NOT_FOUND, "FACILITY_NOT_FOUND"),
            LedgerError::ConcurrencyConflict(_) => (StatusCode::CONFLICT, "CONCURRENCY_CONFLICT"),
            LedgerError::InsufficientFunds { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_FUNDS")
            }
            LedgerError::InsufficientHoldings { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_HOLDINGS")
            }
            LedgerError::AmountOutOfRange { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "AMOUNT_OUT_OF_RANGE")
            }
            LedgerError::CreditLimitExceeded { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "CREDIT_LIMIT_EXCEEDED")
            }
            LedgerError::OverRepayment { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "OVER_REPAYMENT")
            }
            LedgerError::InactiveWallet(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INACTIVE_WALLET"),
            LedgerError::InvalidStateTransition(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_STATE")
            }
            LedgerError::CurrencyMismatch(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "CURRENCY_MISMATCH")
            }
        },
        Error::Database(DatabaseError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        Error::Database(_) | Error::Unexpected(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = classify(&self.0);
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        } else {
            tracing::debug!("request rejected ({}): {}", code, self.0);
        }
        // 5xx details stay in the log, not on the wire.
        let message = if status.is_server_error() {
            "internal error".to_string()
        } else {
            self.0.to_string()
        };
        let body = Json(json!({ "error": { "code": code, "message": message } }));
        (status, body).into_response()
    }
}

impl ApiError {
    /// Shorthand for request-shape problems detected in the HTTP layer
    /// itself, before any service is called.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError(Error::Validation(
            payvault_core::errors::ValidationError::InvalidInput(message.into()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_maps_to_422() {
        let err = Error::Ledger(LedgerError::InsufficientFunds {
            wallet_id: "w1".to_string(),
            balance: "10".to_string(),
            requested: "20".to_string(),
        });
        let (status, code) = classify(&err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "INSUFFICIENT_FUNDS");
    }

    #[test]
    fn missing_wallet_maps_to_404() {
        let err = Error::Ledger(LedgerError::WalletNotFound("w1".to_string()));
        assert_eq!(classify(&err).0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = Error::Ledger(LedgerError::ConcurrencyConflict("w1".to_string()));
        assert_eq!(classify(&err).0, StatusCode::CONFLICT);
    }

    #[test]
    fn database_errors_stay_internal() {
        let err = Error::Database(DatabaseError::QueryFailed("boom".to_string()));
        assert_eq!(classify(&err).0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
