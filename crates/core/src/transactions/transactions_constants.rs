/// Transaction type constants as stored in the database.
pub mod transaction_types {
    pub const SEND: &str = "SEND";
    pub const RECEIVE: &str = "RECEIVE";
    pub const TOPUP: &str = "TOPUP";
    pub const WITHDRAW: &str = "WITHDRAW";
    pub const PAYMENT: &str = "PAYMENT";
}

/// Transaction status constants as stored in the database.
pub mod transaction_statuses {
    pub const PENDING: &str = "PENDING";
    pub const COMPLETED: &str = "COMPLETED";
    pub const FAILED: &str = "FAILED";
}
