//! Tests for the lending module

#[cfg(test)]
mod tests {
    use odra::casper_types::{U256, U512};
    use odra::host::{Deployer, HostEnv, HostRef};
    use crate::lending::accrual::MILLIS_PER_YEAR;
    use crate::lending::credit_oracle::{CreditOracle, CreditOracleHostRef, CreditOracleInitArgs};
    use crate::lending::errors::{LendingError, OracleError};
    use crate::lending::lending_module::{
        LendingModule, LendingModuleHostRef, LendingModuleInitArgs,
    };

    const ONE_CSPR: u64 = 1_000_000_000;
    const REQUEST_FEE: u64 = 100_000_000; // 0.1 CSPR per request

    fn setup(
        annual_rate_bps: u64,
        request_ttl: u64,
    ) -> (HostEnv, LendingModuleHostRef, CreditOracleHostRef) {
        let env = odra_test::env();
        let operator = env.get_account(9);
        let oracle = CreditOracle::deploy(&env, CreditOracleInitArgs { operator });
        let lending = LendingModule::deploy(
            &env,
            LendingModuleInitArgs {
                annual_rate_bps,
                oracle: oracle.address().clone(),
                job_id: String::from("credit-score-v1"),
                fee: U512::from(REQUEST_FEE),
                request_ttl,
            },
        );
        (env, lending, oracle)
    }

    #[test]
    fn deposit_and_balance() {
        let (env, mut lending, _oracle) = setup(500, 0);
        let user = env.get_account(0);

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();

        assert_eq!(lending.get_balance(user), U256::from(ONE_CSPR));
        assert_eq!(lending.total_deposited(), U256::from(ONE_CSPR));
        assert_eq!(lending.total_principal(), U256::from(ONE_CSPR));

        // unknown addresses read as zero, not as an error
        let stranger = env.get_account(5);
        assert_eq!(lending.get_balance(stranger), U256::zero());
    }

    #[test]
    fn zero_deposit_is_rejected() {
        let (_env, mut lending, _oracle) = setup(500, 0);

        assert_eq!(
            lending.try_deposit(),
            Err(LendingError::InvalidAmount.into())
        );
        assert_eq!(lending.total_deposited(), U256::zero());
    }

    #[test]
    fn one_year_at_five_percent() {
        let (env, mut lending, _oracle) = setup(500, 0);
        let user = env.get_account(0);

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();

        // nothing has elapsed yet
        assert_eq!(lending.calculate_interest(user), U256::zero());

        env.advance_block_time(MILLIS_PER_YEAR);

        // projection does not touch the ledger
        assert_eq!(lending.calculate_interest(user), U256::from(50_000_000u64));
        assert_eq!(lending.get_balance(user), U256::from(ONE_CSPR));

        lending.accrue_interest();

        assert_eq!(lending.get_balance(user), U256::from(1_050_000_000u64));
        let record = lending.get_account(user).unwrap();
        assert_eq!(record.principal, U256::from(ONE_CSPR));
        assert_eq!(record.accrued_interest, U256::from(50_000_000u64));
    }

    #[test]
    fn accrual_is_idempotent_within_an_instant() {
        let (env, mut lending, _oracle) = setup(500, 0);
        let user = env.get_account(0);

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();
        env.advance_block_time(MILLIS_PER_YEAR / 2);

        lending.accrue_interest();
        let after_first = lending.get_account(user).unwrap();

        lending.accrue_interest();
        let after_second = lending.get_account(user).unwrap();

        assert_eq!(after_first.accrued_interest, after_second.accrued_interest);
        assert_eq!(after_first.accrual_remainder, after_second.accrual_remainder);
        assert_eq!(after_first.last_accrual, after_second.last_accrual);
    }

    #[test]
    fn split_accrual_matches_single_accrual() {
        // awkward numbers so the sub-mote carry actually matters
        let principal = U512::from(1_000_000_007u64);
        let first_window = 11_111_111;
        let second_window = 22_222_229;

        let (env, mut lending, _oracle) = setup(37, 0);
        let split_user = env.get_account(1);
        let single_user = env.get_account(2);

        env.set_caller(split_user);
        lending.with_tokens(principal).deposit();
        env.set_caller(single_user);
        lending.with_tokens(principal).deposit();

        env.advance_block_time(first_window);
        env.set_caller(split_user);
        lending.accrue_interest();

        env.advance_block_time(second_window);
        env.set_caller(split_user);
        lending.accrue_interest();
        env.set_caller(single_user);
        lending.accrue_interest();

        let split = lending.get_account(split_user).unwrap();
        let single = lending.get_account(single_user).unwrap();
        assert_eq!(split.accrued_interest, single.accrued_interest);
        assert_eq!(split.accrual_remainder, single.accrual_remainder);
        assert_eq!(split.last_accrual, single.last_accrual);
    }

    #[test]
    fn accrual_without_a_deposit_is_rejected() {
        let (env, mut lending, _oracle) = setup(500, 0);

        env.set_caller(env.get_account(3));
        assert_eq!(
            lending.try_accrue_interest(),
            Err(LendingError::InvalidAccount.into())
        );
    }

    #[test]
    fn deposit_merges_outstanding_interest() {
        let (env, mut lending, _oracle) = setup(500, 0);
        let user = env.get_account(0);

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();
        env.advance_block_time(MILLIS_PER_YEAR);
        lending.with_tokens(U512::from(ONE_CSPR)).deposit();

        let record = lending.get_account(user).unwrap();
        assert_eq!(record.principal, U256::from(2_050_000_000u64));
        assert_eq!(record.accrued_interest, U256::zero());

        // accrual creates no value until merged; merging keeps the books tied
        assert_eq!(lending.total_deposited(), U256::from(2 * ONE_CSPR));
        assert_eq!(lending.total_interest_merged(), U256::from(50_000_000u64));
        assert_eq!(
            lending.total_principal(),
            lending.total_deposited() + lending.total_interest_merged()
        );
    }

    #[test]
    fn request_and_fulfill_roundtrip() {
        let (env, mut lending, mut oracle) = setup(500, 0);
        let user = env.get_account(0);
        let operator = oracle.get_operator();

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();
        let request_id = lending
            .with_tokens(U512::from(REQUEST_FEE))
            .request_credit_score();

        assert_eq!(lending.pending_request_of(user), Some(request_id));
        assert_eq!(lending.get_user_credit_score(user), None);

        // the transport recorded the outbound request
        let request = oracle
            .get_request(lending.address().clone(), request_id)
            .unwrap();
        assert_eq!(request.account, user);
        assert!(!request.processed);

        env.set_caller(operator);
        oracle.submit_score(lending.address().clone(), request_id, 720);

        assert_eq!(lending.get_user_credit_score(user), Some(720));
        assert_eq!(lending.pending_request_of(user), None);
    }

    #[test]
    fn duplicate_request_is_rejected() {
        let (env, mut lending, _oracle) = setup(500, 0);
        let user = env.get_account(0);

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();
        let request_id = lending
            .with_tokens(U512::from(REQUEST_FEE))
            .request_credit_score();

        assert_eq!(
            lending
                .with_tokens(U512::from(REQUEST_FEE))
                .try_request_credit_score(),
            Err(LendingError::DuplicateRequest.into())
        );
        assert_eq!(lending.pending_request_of(user), Some(request_id));
    }

    #[test]
    fn request_fee_must_match_exactly() {
        let (_env, mut lending, _oracle) = setup(500, 0);

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();

        assert_eq!(
            lending.try_request_credit_score(),
            Err(LendingError::InvalidFee.into())
        );
        assert_eq!(
            lending
                .with_tokens(U512::from(REQUEST_FEE - 1))
                .try_request_credit_score(),
            Err(LendingError::InvalidFee.into())
        );
    }

    #[test]
    fn request_without_a_deposit_is_rejected() {
        let (env, mut lending, _oracle) = setup(500, 0);

        env.set_caller(env.get_account(4));
        assert_eq!(
            lending
                .with_tokens(U512::from(REQUEST_FEE))
                .try_request_credit_score(),
            Err(LendingError::InvalidAccount.into())
        );
    }

    #[test]
    fn fulfillment_from_a_non_oracle_identity_is_rejected() {
        let (env, mut lending, _oracle) = setup(500, 0);

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();
        let request_id = lending
            .with_tokens(U512::from(REQUEST_FEE))
            .request_credit_score();

        env.set_caller(env.get_account(7));
        assert_eq!(
            lending.try_fulfill_credit_score(request_id, 720),
            Err(LendingError::Unauthorized.into())
        );
    }

    #[test]
    fn replayed_fulfillment_is_dropped() {
        let (env, mut lending, mut oracle) = setup(500, 0);
        let user = env.get_account(0);
        let operator = oracle.get_operator();

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();
        let request_id = lending
            .with_tokens(U512::from(REQUEST_FEE))
            .request_credit_score();

        env.set_caller(operator);
        oracle.submit_score(lending.address().clone(), request_id, 720);
        assert_eq!(lending.get_user_credit_score(user), Some(720));

        // a duplicate callback for the consumed id must not overwrite the
        // score; the module drops it rather than reverting at the transport
        env.set_caller(oracle.address().clone());
        lending.fulfill_credit_score(request_id, 650);

        assert_eq!(lending.get_user_credit_score(user), Some(720));
        assert!(env.emitted(&lending, "StaleFulfillmentDropped"));
    }

    #[test]
    fn oracle_refuses_to_answer_twice() {
        let (env, mut lending, mut oracle) = setup(500, 0);
        let operator = oracle.get_operator();

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();
        let request_id = lending
            .with_tokens(U512::from(REQUEST_FEE))
            .request_credit_score();

        env.set_caller(operator);
        oracle.submit_score(lending.address().clone(), request_id, 720);
        assert_eq!(
            oracle.try_submit_score(lending.address().clone(), request_id, 650),
            Err(OracleError::RequestAlreadyProcessed.into())
        );
    }

    #[test]
    fn expired_request_can_be_reissued() {
        let ttl = 60_000;
        let (env, mut lending, mut oracle) = setup(500, ttl);
        let user = env.get_account(0);
        let operator = oracle.get_operator();

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();
        let stale_id = lending
            .with_tokens(U512::from(REQUEST_FEE))
            .request_credit_score();

        // the oracle never answers; after the ttl a fresh request goes out
        env.advance_block_time(ttl + 1);
        let fresh_id = lending
            .with_tokens(U512::from(REQUEST_FEE))
            .request_credit_score();
        assert_ne!(fresh_id, stale_id);
        assert_eq!(lending.pending_request_of(user), Some(fresh_id));

        // the late answer to the replaced request is dropped
        env.set_caller(operator);
        oracle.submit_score(lending.address().clone(), stale_id, 500);
        assert_eq!(lending.get_user_credit_score(user), None);
        assert_eq!(lending.pending_request_of(user), Some(fresh_id));

        // the answer to the fresh request lands
        oracle.submit_score(lending.address().clone(), fresh_id, 680);
        assert_eq!(lending.get_user_credit_score(user), Some(680));
    }

    #[test]
    fn re_request_after_fulfillment_issues_a_fresh_id() {
        let (env, mut lending, mut oracle) = setup(500, 0);
        let user = env.get_account(0);
        let operator = oracle.get_operator();

        lending.with_tokens(U512::from(ONE_CSPR)).deposit();
        let first_id = lending
            .with_tokens(U512::from(REQUEST_FEE))
            .request_credit_score();

        env.set_caller(operator);
        oracle.submit_score(lending.address().clone(), first_id, 720);

        env.set_caller(user);
        let second_id = lending
            .with_tokens(U512::from(REQUEST_FEE))
            .request_credit_score();
        assert_ne!(second_id, first_id);

        env.set_caller(operator);
        oracle.submit_score(lending.address().clone(), second_id, 655);
        assert_eq!(lending.get_user_credit_score(user), Some(655));
    }

    #[test]
    fn configuration_views() {
        let (_env, lending, oracle) = setup(500, 0);

        assert_eq!(lending.annual_interest_rate_bps(), 500);
        assert_eq!(lending.oracle(), oracle.address().clone());
        assert_eq!(lending.job_id(), String::from("credit-score-v1"));
        assert_eq!(lending.oracle_fee(), U512::from(REQUEST_FEE));
        assert_eq!(lending.request_ttl(), 0);
    }
}
