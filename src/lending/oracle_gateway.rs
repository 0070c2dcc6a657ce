//! Oracle Request Gateway - bridges the ledger to an asynchronous
//! credit-score oracle
//!
//! Requests are fire-and-forget: issuing one returns a correlation id
//! immediately, and the answer arrives later as an independent inbound call.
//! The gateway keeps the correlation state needed to match (or reject)
//! those callbacks, tolerating duplicates, delays and stale answers.

use odra::prelude::*;
use odra::casper_types::U512;
use odra::ContractRef;
use super::errors::LendingError;
use super::events::CreditRequestExpired;
use super::ledger::AccountRecord;

/// Outbound interface of the credit-score oracle transport
#[odra::external_contract]
pub trait CreditOracleClient {
    /// Open a credit-score request for `account` under `job_id`
    fn open_request(&mut self, request_id: u64, account: Address, job_id: String);
}

/// Oracle request gateway submodule
#[odra::module]
pub struct OracleGateway {
    /// Next request identifier
    next_request_id: Var<u64>,
    /// Request id -> requesting account
    request_owner: Mapping<u64, Address>,
    /// Request id -> block time the request was issued
    request_issued_at: Mapping<u64, u64>,
}

impl OracleGateway {
    /// Transition the account to the pending state under a fresh request id.
    ///
    /// Reverts with `DuplicateRequest` while an unexpired request is
    /// outstanding. When `request_ttl` is non-zero and the outstanding
    /// request is older than the ttl, it lapses here and the new request
    /// takes its place.
    pub fn issue_request(
        &mut self,
        account: Address,
        record: &mut AccountRecord,
        request_ttl: u64,
        now: u64,
    ) -> u64 {
        if let Some(pending_id) = record.pending_request {
            if !self.is_expired(pending_id, request_ttl, now) {
                self.env().revert(LendingError::DuplicateRequest);
            }
            record.pending_request = None;
            self.env().emit_event(CreditRequestExpired {
                account,
                request_id: pending_id,
                timestamp: now,
            });
        }

        let request_id = self.next_request_id.get_or_default();
        self.next_request_id.set(request_id + 1);
        self.request_owner.set(&request_id, account);
        self.request_issued_at.set(&request_id, now);
        record.pending_request = Some(request_id);

        request_id
    }

    /// Forward a previously issued request to the oracle transport,
    /// paying the per-request fee.
    pub fn dispatch_request(
        &mut self,
        oracle: Address,
        job_id: String,
        fee: U512,
        request_id: u64,
        account: Address,
    ) {
        if !fee.is_zero() {
            self.env().transfer_tokens(&oracle, &fee);
        }

        let mut transport = CreditOracleClientContractRef::new(self.env(), oracle);
        transport.open_request(request_id, account, job_id);
    }

    /// Apply an inbound fulfillment to the account record.
    ///
    /// Returns `UnknownOrStaleRequest` when the id does not match the
    /// account's current pending request; the caller decides whether that
    /// is a revert or a drop. State is untouched on mismatch.
    pub fn apply_fulfillment(
        &self,
        record: &mut AccountRecord,
        request_id: u64,
        score: u32,
    ) -> Result<(), LendingError> {
        match record.pending_request {
            Some(pending_id) if pending_id == request_id => {
                record.credit_score = Some(score);
                record.pending_request = None;
                Ok(())
            }
            _ => Err(LendingError::UnknownOrStaleRequest),
        }
    }

    /// Account that issued a request id, if the id was ever issued
    pub fn owner_of(&self, request_id: u64) -> Option<Address> {
        self.request_owner.get(&request_id)
    }

    fn is_expired(&self, request_id: u64, request_ttl: u64, now: u64) -> bool {
        if request_ttl == 0 {
            return false;
        }
        let issued_at = self.request_issued_at.get(&request_id).unwrap_or_default();
        now.saturating_sub(issued_at) >= request_ttl
    }
}
