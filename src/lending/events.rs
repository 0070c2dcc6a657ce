//! Events for the Lending Module

use odra::prelude::*;
use odra::casper_types::{U256, U512};

// ============================================================================
// Deposit / Interest Events
// ============================================================================

/// Event emitted when native tokens are deposited into an account
#[odra::event]
pub struct Deposited {
    /// Address that deposited
    pub account: Address,
    /// Amount deposited, in motes
    pub amount: U256,
    /// Timestamp of deposit
    pub timestamp: u64,
}

/// Event emitted when interest is accrued for an account
#[odra::event]
pub struct InterestAccrued {
    /// Address the interest was accrued for
    pub account: Address,
    /// Interest credited by this accrual, in motes
    pub amount: U256,
    /// Timestamp of accrual
    pub timestamp: u64,
}

/// Event emitted when unmerged interest is folded into principal
#[odra::event]
pub struct InterestMerged {
    /// Address the interest was merged for
    pub account: Address,
    /// Interest moved into principal, in motes
    pub amount: U256,
    /// Timestamp of the merge
    pub timestamp: u64,
}

// ============================================================================
// Credit Request Events
// ============================================================================

/// Event emitted when a credit-score request is issued
#[odra::event]
pub struct CreditScoreRequested {
    /// Account the score was requested for
    pub account: Address,
    /// Correlation identifier of the request
    pub request_id: u64,
    /// Fee forwarded to the oracle, in motes
    pub fee: U512,
    /// Timestamp of the request
    pub timestamp: u64,
}

/// Event emitted when an oracle fulfillment is applied
#[odra::event]
pub struct CreditScoreFulfilled {
    /// Account the score belongs to
    pub account: Address,
    /// Correlation identifier of the answered request
    pub request_id: u64,
    /// The delivered credit score
    pub score: u32,
    /// Timestamp of fulfillment
    pub timestamp: u64,
}

/// Event emitted when a fulfillment with a stale or unknown id is dropped
#[odra::event]
pub struct StaleFulfillmentDropped {
    /// Correlation identifier carried by the dropped fulfillment
    pub request_id: u64,
    /// Timestamp of the drop
    pub timestamp: u64,
}

/// Event emitted when a pending request lapses past its expiry
#[odra::event]
pub struct CreditRequestExpired {
    /// Account whose request expired
    pub account: Address,
    /// Correlation identifier of the expired request
    pub request_id: u64,
    /// Timestamp of the expiry
    pub timestamp: u64,
}

// ============================================================================
// Oracle Transport Events
// ============================================================================

/// Event emitted by the reference oracle when a request is recorded
#[odra::event]
pub struct OracleRequestOpened {
    /// Consumer contract that opened the request
    pub consumer: Address,
    /// Correlation identifier assigned by the consumer
    pub request_id: u64,
    /// Account the score is requested for
    pub account: Address,
    /// Timestamp the request arrived
    pub timestamp: u64,
}

/// Event emitted by the reference oracle when a score is submitted
#[odra::event]
pub struct OracleScoreSubmitted {
    /// Consumer contract the answer was delivered to
    pub consumer: Address,
    /// Correlation identifier of the answered request
    pub request_id: u64,
    /// The submitted credit score
    pub score: u32,
    /// Timestamp of submission
    pub timestamp: u64,
}
