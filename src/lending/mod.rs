//! Lending Module - deposits, time-proportional interest and async credit scoring
//!
//! This module provides a compact lending contract for native tokens:
//! depositors accumulate simple interest at a fixed annual rate, and can
//! request a credit score from an external oracle through an asynchronous
//! request/fulfill protocol keyed by correlation ids.

pub mod accrual;
pub mod ledger;
pub mod oracle_gateway;
pub mod lending_module;
pub mod credit_oracle;
pub mod errors;
pub mod events;

#[cfg(test)]
mod tests;

pub use accrual::InterestAccrual;
pub use ledger::{AccountRecord, Ledger};
pub use oracle_gateway::OracleGateway;
pub use lending_module::{LendingModule, ModuleConfig};
pub use credit_oracle::{CreditOracle, OracleRequest};
pub use errors::{LendingError, OracleError};
pub use events::*;
