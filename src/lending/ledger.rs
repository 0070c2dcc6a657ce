//! Ledger - per-account balance and interest-accounting state
//!
//! Single source of truth for principal, unmerged interest and accrual
//! timestamps. Composed into the lending module as a submodule; all
//! operations here are crate-internal and reached through the facade.

use odra::prelude::*;
use odra::casper_types::U256;
use super::accrual::InterestAccrual;
use super::errors::LendingError;

/// State of a single participant account
#[odra::odra_type]
pub struct AccountRecord {
    /// Deposited principal, in motes
    pub principal: U256,
    /// Interest computed but not yet merged into principal, in motes
    pub accrued_interest: U256,
    /// Sub-mote interest carry, in raw numerator units
    pub accrual_remainder: U256,
    /// Block time of the last interest accrual
    pub last_accrual: u64,
    /// Last fulfilled credit score, if any
    pub credit_score: Option<u32>,
    /// Identifier of the outstanding credit-score request, if any
    pub pending_request: Option<u64>,
}

/// Ledger submodule
#[odra::module]
pub struct Ledger {
    /// Account records
    accounts: Mapping<Address, AccountRecord>,
    /// Sum of all principal across accounts
    total_principal: Var<U256>,
    /// Cumulative deposits received
    total_deposited: Var<U256>,
    /// Cumulative interest merged into principal
    total_interest_merged: Var<U256>,
}

impl Ledger {
    /// Load an account record
    pub fn load(&self, account: Address) -> Option<AccountRecord> {
        self.accounts.get(&account)
    }

    /// Store an account record back
    pub fn store(&mut self, account: Address, record: AccountRecord) {
        self.accounts.set(&account, record);
    }

    /// Record a deposit, creating the account lazily on first use.
    /// A fresh account starts accruing from `now`, not from creation.
    pub fn deposit(&mut self, account: Address, amount: U256, now: u64) {
        let record = match self.accounts.get(&account) {
            Some(mut record) => {
                record.principal += amount;
                record
            }
            None => AccountRecord {
                principal: amount,
                accrued_interest: U256::zero(),
                accrual_remainder: U256::zero(),
                last_accrual: now,
                credit_score: None,
                pending_request: None,
            },
        };
        self.accounts.set(&account, record);

        self.total_principal
            .set(self.total_principal.get_or_default() + amount);
        self.total_deposited
            .set(self.total_deposited.get_or_default() + amount);
    }

    /// Balance of an account: principal plus unmerged interest.
    /// Unknown addresses read as zero, not as an error.
    pub fn balance_of(&self, account: Address) -> U256 {
        match self.accounts.get(&account) {
            Some(record) => record.principal + record.accrued_interest,
            None => U256::zero(),
        }
    }

    /// Fold a raw interest numerator into the account and advance its
    /// accrual timestamp. Returns the payable motes credited.
    pub fn credit_interest(&mut self, account: Address, raw: U256, now: u64) -> U256 {
        let mut record = self
            .accounts
            .get(&account)
            .unwrap_or_revert_with(&self.env(), LendingError::InvalidAccount);

        let (payable, remainder) = InterestAccrual::split(record.accrual_remainder + raw);
        record.accrued_interest += payable;
        record.accrual_remainder = remainder;
        record.last_accrual = now;
        self.accounts.set(&account, record);

        payable
    }

    /// Move the whole of the account's unmerged interest into principal.
    /// Returns the merged amount.
    pub fn merge_interest(&mut self, account: Address) -> U256 {
        let mut record = self
            .accounts
            .get(&account)
            .unwrap_or_revert_with(&self.env(), LendingError::InvalidAccount);

        let merged = record.accrued_interest;
        if merged.is_zero() {
            return merged;
        }

        record.principal += merged;
        record.accrued_interest = U256::zero();
        self.accounts.set(&account, record);

        self.total_principal
            .set(self.total_principal.get_or_default() + merged);
        self.total_interest_merged
            .set(self.total_interest_merged.get_or_default() + merged);

        merged
    }

    /// Sum of all principal
    pub fn total_principal(&self) -> U256 {
        self.total_principal.get_or_default()
    }

    /// Cumulative deposits received
    pub fn total_deposited(&self) -> U256 {
        self.total_deposited.get_or_default()
    }

    /// Cumulative interest merged into principal
    pub fn total_interest_merged(&self) -> U256 {
        self.total_interest_merged.get_or_default()
    }
}
