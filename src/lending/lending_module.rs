//! Lending Module - facade contract for deposits, interest and credit scores
//!
//! Composes the ledger, the interest accrual engine and the oracle request
//! gateway behind a single deployable contract:
//! - deposits and balance queries act on the ledger
//! - accrual converts elapsed block time into interest against the ledger
//! - credit-score requests go out through the gateway; fulfillments come
//!   back through `fulfill_credit_score`, restricted to the configured
//!   oracle identity

use odra::prelude::*;
use odra::casper_types::{U256, U512};
use super::accrual::InterestAccrual;
use super::errors::LendingError;
use super::events::*;
use super::ledger::{AccountRecord, Ledger};
use super::oracle_gateway::OracleGateway;

/// Module configuration, set once at construction and immutable thereafter
#[odra::odra_type]
pub struct ModuleConfig {
    /// Annual interest rate in basis points
    pub annual_rate_bps: u64,
    /// Oracle transport address; the only identity allowed to fulfill
    pub oracle: Address,
    /// Oracle job identifier
    pub job_id: String,
    /// Fee paid per credit-score request, in motes
    pub fee: U512,
    /// Pending-request expiry in milliseconds; zero disables expiry
    pub request_ttl: u64,
}

/// Lending Module contract
#[odra::module]
pub struct LendingModule {
    /// Immutable module configuration
    config: Var<ModuleConfig>,
    /// Balance ledger
    ledger: SubModule<Ledger>,
    /// Credit-score request gateway
    gateway: SubModule<OracleGateway>,
}

#[odra::module]
impl LendingModule {
    /// Initialize the module with its immutable configuration
    pub fn init(
        &mut self,
        annual_rate_bps: u64,
        oracle: Address,
        job_id: String,
        fee: U512,
        request_ttl: u64,
    ) {
        if job_id.is_empty() {
            self.env().revert(LendingError::InvalidConfiguration);
        }
        self.config.set(ModuleConfig {
            annual_rate_bps,
            oracle,
            job_id,
            fee,
            request_ttl,
        });
    }

    // ========================================
    // Deposits & Balances
    // ========================================

    /// Deposit the attached native tokens into the caller's account.
    ///
    /// An existing account is brought current first and its unmerged
    /// interest folded into principal, so the new principal earns from a
    /// clean baseline.
    #[odra(payable)]
    pub fn deposit(&mut self) {
        let attached = self.env().attached_value();
        if attached.is_zero() {
            self.env().revert(LendingError::InvalidAmount);
        }
        let amount = U256::from(attached.as_u128());
        let caller = self.env().caller();
        let now = self.env().get_block_time();

        if self.ledger.load(caller).is_some() {
            self.accrue_for(caller, now);
            let merged = self.ledger.merge_interest(caller);
            if !merged.is_zero() {
                self.env().emit_event(InterestMerged {
                    account: caller,
                    amount: merged,
                    timestamp: now,
                });
            }
        }

        self.ledger.deposit(caller, amount, now);
        self.env().emit_event(Deposited {
            account: caller,
            amount,
            timestamp: now,
        });
    }

    /// Balance of an account: principal plus unmerged interest.
    /// Unknown addresses read as zero.
    pub fn get_balance(&self, account: Address) -> U256 {
        self.ledger.balance_of(account)
    }

    // ========================================
    // Interest Accrual
    // ========================================

    /// Accrue interest on the caller's account up to the current block time
    pub fn accrue_interest(&mut self) {
        let caller = self.env().caller();
        if self.ledger.load(caller).is_none() {
            self.env().revert(LendingError::InvalidAccount);
        }
        let now = self.env().get_block_time();
        self.accrue_for(caller, now);
    }

    /// Interest an accrual right now would leave unmerged: interest already
    /// accrued plus the projection over the elapsed window. Read-only; the
    /// accrual timestamp is not touched. Unknown addresses read as zero.
    pub fn calculate_interest(&self, account: Address) -> U256 {
        let record = match self.ledger.load(account) {
            Some(record) => record,
            None => return U256::zero(),
        };
        let config = self.config();
        let now = self.env().get_block_time();
        let elapsed = match now.checked_sub(record.last_accrual) {
            Some(elapsed) => elapsed,
            None => self.env().revert(LendingError::ClockRegression),
        };

        let raw = InterestAccrual::raw_interest(record.principal, config.annual_rate_bps, elapsed);
        let (payable, _) = InterestAccrual::split(record.accrual_remainder + raw);
        record.accrued_interest + payable
    }

    // ========================================
    // Credit Scores
    // ========================================

    /// Request a credit score for the caller's account.
    ///
    /// The configured oracle fee must be attached in full; it is forwarded
    /// to the oracle together with the request. Returns the correlation id.
    /// The call never waits for the answer - poll `get_user_credit_score`.
    #[odra(payable)]
    pub fn request_credit_score(&mut self) -> u64 {
        let config = self.config();
        if self.env().attached_value() != config.fee {
            self.env().revert(LendingError::InvalidFee);
        }

        let caller = self.env().caller();
        let mut record = match self.ledger.load(caller) {
            Some(record) => record,
            None => self.env().revert(LendingError::InvalidAccount),
        };
        let now = self.env().get_block_time();

        let request_id = self
            .gateway
            .issue_request(caller, &mut record, config.request_ttl, now);
        self.ledger.store(caller, record);

        self.gateway
            .dispatch_request(config.oracle, config.job_id, config.fee, request_id, caller);

        self.env().emit_event(CreditScoreRequested {
            account: caller,
            request_id,
            fee: config.fee,
            timestamp: now,
        });

        request_id
    }

    /// Last fulfilled credit score, or `None` while none has arrived
    pub fn get_user_credit_score(&self, account: Address) -> Option<u32> {
        self.ledger.load(account).and_then(|record| record.credit_score)
    }

    /// Outstanding request id for an account, if any
    pub fn pending_request_of(&self, account: Address) -> Option<u64> {
        self.ledger.load(account).and_then(|record| record.pending_request)
    }

    /// Inbound fulfillment from the oracle transport.
    ///
    /// Only the configured oracle identity may call this. A fulfillment
    /// whose id does not match the account's pending request is dropped
    /// without reverting - the transport is fire-and-forget and a stale or
    /// replayed answer must not overwrite newer state.
    pub fn fulfill_credit_score(&mut self, request_id: u64, score: u32) {
        let config = self.config();
        if self.env().caller() != config.oracle {
            self.env().revert(LendingError::Unauthorized);
        }
        let now = self.env().get_block_time();

        let account = match self.gateway.owner_of(request_id) {
            Some(account) => account,
            None => {
                self.env().emit_event(StaleFulfillmentDropped { request_id, timestamp: now });
                return;
            }
        };
        let mut record = match self.ledger.load(account) {
            Some(record) => record,
            None => {
                self.env().emit_event(StaleFulfillmentDropped { request_id, timestamp: now });
                return;
            }
        };

        match self.gateway.apply_fulfillment(&mut record, request_id, score) {
            Ok(()) => {
                self.ledger.store(account, record);
                self.env().emit_event(CreditScoreFulfilled {
                    account,
                    request_id,
                    score,
                    timestamp: now,
                });
            }
            Err(LendingError::UnknownOrStaleRequest) => {
                self.env().emit_event(StaleFulfillmentDropped { request_id, timestamp: now });
            }
            Err(err) => self.env().revert(err),
        }
    }

    // ========================================
    // View Functions
    // ========================================

    /// Annual interest rate in basis points
    pub fn annual_interest_rate_bps(&self) -> u64 {
        self.config().annual_rate_bps
    }

    /// Configured oracle transport address
    pub fn oracle(&self) -> Address {
        self.config().oracle
    }

    /// Configured oracle job identifier
    pub fn job_id(&self) -> String {
        self.config().job_id
    }

    /// Fee consumed per credit-score request, in motes
    pub fn oracle_fee(&self) -> U512 {
        self.config().fee
    }

    /// Pending-request expiry in milliseconds; zero means no expiry
    pub fn request_ttl(&self) -> u64 {
        self.config().request_ttl
    }

    /// Full account record, if the address ever deposited
    pub fn get_account(&self, account: Address) -> Option<AccountRecord> {
        self.ledger.load(account)
    }

    /// Sum of all principal
    pub fn total_principal(&self) -> U256 {
        self.ledger.total_principal()
    }

    /// Cumulative deposits received
    pub fn total_deposited(&self) -> U256 {
        self.ledger.total_deposited()
    }

    /// Cumulative interest merged into principal
    pub fn total_interest_merged(&self) -> U256 {
        self.ledger.total_interest_merged()
    }

    // ========================================
    // Internals
    // ========================================

    /// Accrue interest for an account up to `now`.
    /// No-op within a single instant; a regressing clock is fatal.
    fn accrue_for(&mut self, account: Address, now: u64) {
        let record = match self.ledger.load(account) {
            Some(record) => record,
            None => self.env().revert(LendingError::InvalidAccount),
        };
        let elapsed = match now.checked_sub(record.last_accrual) {
            Some(elapsed) => elapsed,
            None => self.env().revert(LendingError::ClockRegression),
        };
        if elapsed == 0 {
            return;
        }

        let config = self.config();
        let raw = InterestAccrual::raw_interest(record.principal, config.annual_rate_bps, elapsed);
        let credited = self.ledger.credit_interest(account, raw, now);
        if !credited.is_zero() {
            self.env().emit_event(InterestAccrued {
                account,
                amount: credited,
                timestamp: now,
            });
        }
    }

    fn config(&self) -> ModuleConfig {
        self.config.get_or_revert_with(LendingError::InvalidConfiguration)
    }
}
