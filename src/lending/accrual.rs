//! Interest accrual math for the lending module
//! Fixed-point simple interest over elapsed block time

use odra::casper_types::U256;

/// Milliseconds in a 365-day year
pub const MILLIS_PER_YEAR: u64 = 31_536_000_000;

/// Basis point denominator (100% = 10,000 bps)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Interest accrual engine
///
/// Interest owed for an elapsed window is computed as a raw numerator
/// `principal * annual_rate_bps * elapsed_ms` and only divided down to motes
/// when credited to an account. The sub-mote division remainder is carried
/// per account, so accruing over `[t0, t1]` and then `[t1, t2]` credits
/// exactly the same total as a single accrual over `[t0, t2]`.
pub struct InterestAccrual;

impl InterestAccrual {
    /// Denominator converting raw interest numerators into motes
    pub fn denominator() -> U256 {
        U256::from(BPS_DENOMINATOR) * U256::from(MILLIS_PER_YEAR)
    }

    /// Raw interest numerator owed for an elapsed window
    pub fn raw_interest(principal: U256, annual_rate_bps: u64, elapsed_ms: u64) -> U256 {
        principal * U256::from(annual_rate_bps) * U256::from(elapsed_ms)
    }

    /// Split a raw numerator into payable motes and the sub-mote remainder
    pub fn split(raw: U256) -> (U256, U256) {
        let denominator = Self::denominator();
        (raw / denominator, raw % denominator)
    }
}
