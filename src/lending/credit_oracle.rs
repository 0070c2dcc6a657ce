//! Reference credit-score oracle for local networks and tests
//!
//! Plays the role of the on-chain rendezvous point of an oracle network:
//! consumer contracts open requests here, a designated operator pushes the
//! answers, and the oracle calls each consumer back through its fulfillment
//! entrypoint. The scoring network behind the operator stays opaque;
//! production deployments point the lending module at a real oracle
//! endpoint instead.

use odra::prelude::*;
use odra::ContractRef;
use super::errors::OracleError;
use super::events::{OracleRequestOpened, OracleScoreSubmitted};

/// Inbound interface the oracle expects from consumer contracts
#[odra::external_contract]
pub trait CreditScoreConsumer {
    /// Deliver the score for a previously opened request
    fn fulfill_credit_score(&mut self, request_id: u64, score: u32);
}

/// A request as recorded by the oracle
#[odra::odra_type]
pub struct OracleRequest {
    /// Consumer contract that opened the request
    pub consumer: Address,
    /// Account the score is requested for
    pub account: Address,
    /// Job identifier supplied by the consumer
    pub job_id: String,
    /// Block time the request arrived
    pub received_at: u64,
    /// Whether an answer was already submitted
    pub processed: bool,
}

/// Reference credit oracle contract
#[odra::module]
pub struct CreditOracle {
    /// Operator allowed to submit scores
    operator: Var<Address>,
    /// Requests keyed by (consumer, request id)
    requests: Mapping<(Address, u64), OracleRequest>,
}

#[odra::module]
impl CreditOracle {
    /// Initialize the oracle with its operator identity
    pub fn init(&mut self, operator: Address) {
        self.operator.set(operator);
    }

    /// Record a request opened by a consumer contract.
    /// Request ids are scoped per consumer, so ids from different
    /// consumers never collide here.
    pub fn open_request(&mut self, request_id: u64, account: Address, job_id: String) {
        let consumer = self.env().caller();
        let received_at = self.env().get_block_time();

        self.requests.set(
            &(consumer, request_id),
            OracleRequest {
                consumer,
                account,
                job_id,
                received_at,
                processed: false,
            },
        );

        self.env().emit_event(OracleRequestOpened {
            consumer,
            request_id,
            account,
            timestamp: received_at,
        });
    }

    /// Submit a score for an open request and call the consumer back.
    /// Operator only; a request can be answered at most once.
    pub fn submit_score(&mut self, consumer: Address, request_id: u64, score: u32) {
        self.only_operator();

        let mut request = self
            .requests
            .get(&(consumer, request_id))
            .unwrap_or_revert_with(&self.env(), OracleError::RequestNotFound);
        if request.processed {
            self.env().revert(OracleError::RequestAlreadyProcessed);
        }
        request.processed = true;
        self.requests.set(&(consumer, request_id), request);

        let mut consumer_ref = CreditScoreConsumerContractRef::new(self.env(), consumer);
        consumer_ref.fulfill_credit_score(request_id, score);

        let timestamp = self.env().get_block_time();
        self.env().emit_event(OracleScoreSubmitted {
            consumer,
            request_id,
            score,
            timestamp,
        });
    }

    /// Look up a recorded request
    pub fn get_request(&self, consumer: Address, request_id: u64) -> Option<OracleRequest> {
        self.requests.get(&(consumer, request_id))
    }

    /// Operator identity
    pub fn get_operator(&self) -> Address {
        self.operator.get_or_revert_with(OracleError::OperatorOnly)
    }

    fn only_operator(&self) {
        let caller = self.env().caller();
        let operator = self.operator.get_or_revert_with(OracleError::OperatorOnly);
        if caller != operator {
            self.env().revert(OracleError::OperatorOnly);
        }
    }
}
