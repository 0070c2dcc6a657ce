//! Error types for the Lending Module

use odra::prelude::*;

/// Errors that can occur in the lending module
#[odra::odra_error]
pub enum LendingError {
    // Ledger Errors
    /// Deposit carried no value
    InvalidAmount = 1,
    /// Address has no ledger record
    InvalidAccount = 2,

    // Accrual Errors
    /// Host clock is behind the account's last accrual timestamp
    ClockRegression = 3,

    // Credit Request Errors
    /// A credit-score request is already pending for this account
    DuplicateRequest = 4,
    /// Fulfillment does not match the account's pending request
    UnknownOrStaleRequest = 5,
    /// Attached value does not equal the configured oracle fee
    InvalidFee = 6,

    // Access Control Errors
    /// Caller is not allowed to perform this operation
    Unauthorized = 7,

    // Configuration Errors
    /// Constructor parameters are malformed or configuration is missing
    InvalidConfiguration = 8,
}

/// Errors that can occur in the reference credit oracle
#[odra::odra_error]
pub enum OracleError {
    /// Caller is not the configured operator
    OperatorOnly = 1,
    /// No open request recorded under this key
    RequestNotFound = 2,
    /// The request was already answered
    RequestAlreadyProcessed = 3,
}
