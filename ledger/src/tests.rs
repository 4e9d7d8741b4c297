//! Ledger Integration Tests
//!
//! Scenario and property coverage for the `LendingPool` facade, driven through the
//! mock asset, manual clock and stub verifier.

#[cfg(test)]
mod integration_tests {
    use std::rc::Rc;

    use crate::error::{LedgerError, StateError};
    use crate::events::LedgerEvent;
    use crate::gateway::GatewayConfig;
    use crate::loan::LoanState;
    use crate::math::SECONDS_PER_YEAR;
    use crate::mock::*;
    use crate::pool::{LedgerConfig, LendingPool};
    use crate::types::{Address, Amount};

    type TestPool = LendingPool<Rc<MockAsset>, ManualClock>;

    const YEAR: u64 = SECONDS_PER_YEAR as u64;
    const START: u64 = 1_700_000_000;

    fn pool_account() -> Address {
        Address::from_low_u8(0xf0)
    }

    fn admin() -> Address {
        Address::from_low_u8(0xad)
    }

    fn alice() -> Address {
        Address::from_low_u8(1)
    }

    fn bob() -> Address {
        Address::from_low_u8(2)
    }

    /// 유동성 공급자
    fn lp() -> Address {
        Address::from_low_u8(3)
    }

    struct Harness {
        pool: TestPool,
        asset: Rc<MockAsset>,
        clock: ManualClock,
    }

    fn harness() -> Harness {
        let asset = MockAsset::new(pool_account());
        let clock = ManualClock::at(START);
        let config = LedgerConfig {
            pool_account: pool_account(),
            gateway: GatewayConfig::new(admin(), dev_key()),
        };
        let pool = LendingPool::new(config, asset.clone(), clock.clone(), MockVerifier::new()).unwrap();

        for who in [alice(), bob(), lp()] {
            asset.mint(&who, 1_000_000);
        }

        Harness { pool, asset, clock }
    }

    fn funded(deposit: Amount) -> Harness {
        let h = harness();
        h.pool.deposit(&alice(), deposit).unwrap();
        h
    }

    // =============================================================
    // Scenarios
    // =============================================================

    mod scenarios {
        use super::*;

        #[test]
        fn test_scenario_a_single_active_loan() {
            let h = funded(1000);

            h.pool.borrow(&alice(), 500).unwrap();
            assert_eq!(
                h.pool.borrow(&alice(), 1).unwrap_err(),
                LedgerError::State(StateError::LoanExists)
            );
        }

        #[test]
        fn test_scenario_b_standard_max_exceeded() {
            let h = funded(1000);

            let err = h.pool.borrow(&alice(), 501).unwrap_err();
            assert!(matches!(err, LedgerError::CollateralSafety(_)));
            assert!(!h.pool.has_active_loan(&alice()));
        }

        #[test]
        fn test_scenario_c_zk_borrow_then_replay() {
            let h = funded(1000);
            h.pool.deposit(&lp(), 5000).unwrap();
            let inputs = inputs_for(alice(), 750, 7);

            let receipt = h
                .pool
                .borrow_with_proof(&alice(), 1100, valid_proof(), inputs.clone())
                .unwrap();
            assert!(receipt.zk_verified);
            assert!(h.pool.is_verified(&alice()));
            assert!(h.pool.is_nullifier_used(&inputs.nullifier_hash));

            h.pool.repay(&alice(), 1100).unwrap();
            assert!(!h.pool.has_active_loan(&alice()));

            let err = h
                .pool
                .borrow_with_proof(&alice(), 1100, valid_proof(), inputs)
                .unwrap_err();
            assert!(matches!(err, LedgerError::Replay(_)));
        }

        #[test]
        fn test_scenario_d_no_partial_repayment() {
            let h = funded(1000);
            h.pool.borrow(&alice(), 500).unwrap();
            let liquidity_after_borrow = h.pool.pool_status().total_liquidity;

            let err = h.pool.repay(&alice(), 499).unwrap_err();
            assert!(matches!(err, LedgerError::InsufficientFunds(_)));
            assert!(h.pool.has_active_loan(&alice()));

            h.pool.repay(&alice(), 500).unwrap();
            assert!(!h.pool.has_active_loan(&alice()));
            assert_eq!(h.pool.loan_state(&alice()), LoanState::Closed);
            assert_eq!(
                h.pool.pool_status().total_liquidity,
                liquidity_after_borrow + 500
            );
        }
    }

    // =============================================================
    // LTV Boundaries
    // =============================================================

    mod ltv_boundaries {
        use super::*;

        #[test]
        fn test_max_borrow_views() {
            let h = funded(1000);
            assert_eq!(h.pool.max_borrow(&alice(), false).unwrap(), 500);
            assert_eq!(h.pool.max_borrow(&alice(), true).unwrap(), 1200);
            assert_eq!(h.pool.max_borrow(&bob(), true).unwrap(), 0);
        }

        #[test]
        fn test_standard_max_succeeds() {
            let h = funded(1000);
            h.pool.borrow(&alice(), 500).unwrap();
        }

        #[test]
        fn test_zk_max_succeeds_and_max_plus_one_fails() {
            let h = funded(1000);
            h.pool.deposit(&lp(), 5000).unwrap();

            let err = h
                .pool
                .borrow_with_proof(&alice(), 1201, valid_proof(), inputs_for(alice(), 720, 1))
                .unwrap_err();
            assert!(matches!(err, LedgerError::CollateralSafety(_)));
            // rolled back: the nullifier survives a failed borrow
            assert!(!h.pool.is_nullifier_used(&inputs_for(alice(), 720, 1).nullifier_hash));

            h.pool
                .borrow_with_proof(&alice(), 1200, valid_proof(), inputs_for(alice(), 720, 1))
                .unwrap();
        }

        #[test]
        fn test_borrow_without_collateral() {
            let h = harness();
            assert_eq!(
                h.pool.borrow(&bob(), 10).unwrap_err(),
                LedgerError::State(StateError::NoCollateral)
            );
        }

        #[test]
        fn test_zero_borrow_rejected() {
            let h = funded(1000);
            assert!(matches!(h.pool.borrow(&alice(), 0), Err(LedgerError::Validation(_))));
        }

        #[test]
        fn test_borrow_capped_by_pool_liquidity() {
            let h = funded(1000);
            let err = h
                .pool
                .borrow_with_proof(&alice(), 1100, valid_proof(), inputs_for(alice(), 750, 2))
                .unwrap_err();
            assert!(matches!(err, LedgerError::InsufficientFunds(_)));
        }

        #[test]
        fn test_proof_for_other_subject_rejected() {
            let h = funded(1000);
            let err = h
                .pool
                .borrow_with_proof(&alice(), 600, valid_proof(), inputs_for(bob(), 750, 3))
                .unwrap_err();
            assert!(matches!(err, LedgerError::Authorization(_)));
            assert!(!h.pool.is_verified(&bob()));
        }

        #[test]
        fn test_invalid_proof_rejected() {
            let h = funded(1000);
            let err = h
                .pool
                .borrow_with_proof(&alice(), 600, invalid_proof(), inputs_for(alice(), 750, 4))
                .unwrap_err();
            assert!(matches!(err, LedgerError::Authorization(_)));
            assert!(!h.pool.has_active_loan(&alice()));
        }
    }

    // =============================================================
    // Withdraw
    // =============================================================

    mod withdraw {
        use super::*;

        #[test]
        fn test_withdraw_respects_required_collateral() {
            let h = funded(1000);
            h.pool.borrow(&alice(), 400).unwrap();

            // 400 @ 50% requires 800
            let err = h.pool.withdraw(&alice(), 201).unwrap_err();
            assert!(matches!(err, LedgerError::CollateralSafety(_)));

            h.pool.withdraw(&alice(), 200).unwrap();
            assert_eq!(h.pool.collateral_balance(&alice()), 800);
        }

        #[test]
        fn test_withdraw_more_than_balance() {
            let h = funded(1000);
            let err = h.pool.withdraw(&alice(), 1001).unwrap_err();
            assert!(matches!(err, LedgerError::InsufficientFunds(_)));
        }

        #[test]
        fn test_withdraw_blocked_by_lent_out_liquidity() {
            let h = funded(1000);
            h.pool.deposit(&bob(), 1000).unwrap();
            h.pool
                .borrow_with_proof(&bob(), 1200, valid_proof(), inputs_for(bob(), 750, 1))
                .unwrap();
            assert_eq!(h.pool.pool_status().total_liquidity, 800);

            let err = h.pool.withdraw(&alice(), 1000).unwrap_err();
            assert!(matches!(err, LedgerError::InsufficientFunds(_)));
            h.pool.withdraw(&alice(), 800).unwrap();
        }

        #[test]
        fn test_full_cycle_returns_funds() {
            let h = funded(1000);
            h.pool.borrow(&alice(), 500).unwrap();
            h.pool.repay(&alice(), 500).unwrap();
            h.pool.withdraw(&alice(), 1000).unwrap();

            assert_eq!(h.asset.balance_of(&alice()), 1_000_000);
            assert_eq!(h.asset.pool_balance(), 0);
            assert_eq!(h.pool.pool_status().total_deposits, 0);
        }
    }

    // =============================================================
    // Interest
    // =============================================================

    mod interest {
        use super::*;

        #[test]
        fn test_one_year_simple_interest() {
            let h = funded(20_000);
            h.pool.borrow(&alice(), 10_000).unwrap();
            h.clock.advance(YEAR);

            // 10_000 * 5% = 500
            assert_eq!(h.pool.total_debt(&alice()).unwrap(), 10_500);
        }

        #[test]
        fn test_interest_truncates() {
            let h = funded(2000);
            h.pool.borrow(&alice(), 1000).unwrap();
            // 1000 * 500 * 1 / (31_536_000 * 10_000) = 0
            h.clock.advance(1);
            assert_eq!(h.pool.total_debt(&alice()).unwrap(), 1000);
        }

        #[test]
        fn test_accrue_reports_only_delta() {
            let h = funded(20_000);
            h.pool.borrow(&alice(), 10_000).unwrap();
            h.pool.take_events();

            h.clock.advance(YEAR / 2);
            let first = h.pool.accrue_interest(&bob(), &alice()).unwrap().unwrap();
            assert_eq!(first.delta, 250);
            assert_eq!(first.total, 250);

            // same tick: nothing moves, no error
            assert_eq!(h.pool.accrue_interest(&bob(), &alice()).unwrap(), None);

            h.clock.advance(YEAR / 2);
            let second = h.pool.accrue_interest(&bob(), &alice()).unwrap().unwrap();
            assert_eq!(second.delta, 250);
            assert_eq!(second.total, 500);

            let accrued: Vec<_> = h
                .pool
                .take_events()
                .into_iter()
                .filter_map(|r| match r.event {
                    LedgerEvent::InterestAccrued { delta, .. } => Some(delta),
                    _ => None,
                })
                .collect();
            assert_eq!(accrued, vec![250, 250]);
        }

        #[test]
        fn test_debt_monotonic_over_time() {
            let h = funded(200_000);
            h.pool.borrow(&alice(), 100_000).unwrap();

            let mut last = h.pool.total_debt(&alice()).unwrap();
            for _ in 0..12 {
                h.clock.advance(YEAR / 12);
                let debt = h.pool.total_debt(&alice()).unwrap();
                assert!(debt >= last);
                last = debt;
            }
            assert_eq!(last, 105_000);
        }

        #[test]
        fn test_repay_collects_interest() {
            let h = funded(20_000);
            h.pool.borrow(&alice(), 10_000).unwrap();
            h.clock.advance(YEAR);

            assert!(matches!(
                h.pool.repay(&alice(), 10_499),
                Err(LedgerError::InsufficientFunds(_))
            ));

            let receipt = h.pool.repay(&alice(), 10_600).unwrap();
            assert_eq!(receipt.debt, 10_500);
            assert_eq!(receipt.interest, 500);
            assert_eq!(receipt.refund, 100);

            let status = h.pool.pool_status();
            assert_eq!(status.total_liquidity, 20_000);
            assert_eq!(status.interest_collected, 500);
            // user paid exactly the debt
            assert_eq!(h.asset.balance_of(&alice()), 1_000_000 - 20_000 + 10_000 - 10_500);
        }

        #[test]
        fn test_accrue_without_loan() {
            let h = funded(1000);
            assert_eq!(
                h.pool.accrue_interest(&bob(), &alice()).unwrap_err(),
                LedgerError::State(StateError::NoLoan)
            );
        }
    }

    // =============================================================
    // Liquidation
    // =============================================================

    mod liquidation {
        use super::*;

        fn zk_loan(principal: Amount) -> Harness {
            let h = funded(1000);
            h.pool.deposit(&lp(), 5000).unwrap();
            h.pool
                .borrow_with_proof(&alice(), principal, valid_proof(), inputs_for(alice(), 750, 9))
                .unwrap();
            h
        }

        #[test]
        fn test_threshold_is_strict() {
            let h = zk_loan(800);
            let err = h.pool.liquidate(&bob(), &alice()).unwrap_err();
            assert!(matches!(err, LedgerError::CollateralSafety(_)));
            assert!(h.pool.has_active_loan(&alice()));
        }

        #[test]
        fn test_liquidation_above_threshold() {
            let h = zk_loan(801);
            let bob_before = h.asset.balance_of(&bob());
            let liquidity_before = h.pool.pool_status().total_liquidity;

            let receipt = h.pool.liquidate(&bob(), &alice()).unwrap();
            assert_eq!(receipt.seizure.reward, 100);
            assert_eq!(receipt.seizure.seized, 1000);
            assert_eq!(receipt.seizure.remainder, 900);

            assert!(!h.pool.has_active_loan(&alice()));
            assert_eq!(h.pool.collateral_balance(&alice()), 0);
            assert_eq!(h.asset.balance_of(&bob()), bob_before + 100);

            let status = h.pool.pool_status();
            assert_eq!(status.total_liquidity, liquidity_before - 100);
            assert_eq!(status.liquidation_swept, 900);
            assert_eq!(status.total_deposits, 5000);
        }

        #[test]
        fn test_drained_pool_defers_liquidation() {
            // alice's own collateral is the only liquidity and she borrows all of it
            let h = funded(1000);
            h.pool
                .borrow_with_proof(&alice(), 1000, valid_proof(), inputs_for(alice(), 750, 12))
                .unwrap();
            assert_eq!(h.pool.pool_status().total_liquidity, 0);
            h.pool.take_events();

            let status_before = h.pool.pool_status();
            let bob_before = h.asset.balance_of(&bob());

            let err = h.pool.liquidate(&bob(), &alice()).unwrap_err();
            assert!(matches!(err, LedgerError::InsufficientFunds(_)));
            assert!(h.pool.has_active_loan(&alice()));
            assert_eq!(h.pool.collateral_balance(&alice()), 1000);
            assert_eq!(h.pool.pool_status(), status_before);
            assert_eq!(h.asset.balance_of(&bob()), bob_before);
            assert!(h.pool.take_events().is_empty());

            // fresh liquidity makes the same loan liquidatable
            h.pool.deposit(&lp(), 100).unwrap();
            let receipt = h.pool.liquidate(&bob(), &alice()).unwrap();
            assert_eq!(receipt.seizure.reward, 100);
            assert_eq!(h.asset.balance_of(&bob()), bob_before + 100);
            assert_eq!(h.asset.pool_balance(), h.pool.pool_status().total_liquidity);
        }

        #[test]
        fn test_standard_loans_never_liquidatable() {
            let h = funded(1000);
            h.pool.borrow(&alice(), 500).unwrap();
            h.clock.advance(10 * YEAR);
            assert!(matches!(
                h.pool.liquidate(&bob(), &alice()),
                Err(LedgerError::CollateralSafety(_))
            ));
        }

        #[test]
        fn test_liquidate_without_loan() {
            let h = funded(1000);
            assert_eq!(
                h.pool.liquidate(&bob(), &alice()).unwrap_err(),
                LedgerError::State(StateError::NoLoan)
            );
        }

        #[test]
        fn test_null_parties_rejected() {
            let h = zk_loan(900);
            assert!(matches!(
                h.pool.liquidate(&Address::ZERO, &alice()),
                Err(LedgerError::Validation(_))
            ));
            assert!(matches!(
                h.pool.liquidate(&bob(), &Address::ZERO),
                Err(LedgerError::Validation(_))
            ));
        }

        #[test]
        fn test_borrower_can_reborrow_after_liquidation() {
            let h = zk_loan(900);
            h.pool.liquidate(&bob(), &alice()).unwrap();

            h.pool.deposit(&alice(), 1000).unwrap();
            h.pool.borrow(&alice(), 500).unwrap();
            assert_eq!(h.pool.loan_details(&alice()).unwrap().collateral_snapshot, 1000);
        }
    }

    // =============================================================
    // Proof Gateway through the facade
    // =============================================================

    mod gateway {
        use super::*;
        use crate::types::{ProofSubmission, VerifyingKey};

        #[test]
        fn test_batch_verify_independent_entries() {
            let h = harness();
            let batch = vec![
                ProofSubmission::new(valid_proof(), inputs_for(alice(), 800, 1)),
                ProofSubmission::new(invalid_proof(), inputs_for(bob(), 800, 2)),
                ProofSubmission::new(valid_proof(), inputs_for(bob(), 800, 1)),
                ProofSubmission::new(valid_proof(), inputs_for(bob(), 650, 3)),
            ];

            let results = h.pool.batch_verify(&admin(), &batch).unwrap();
            assert_eq!(results[0], Ok(true));
            assert_eq!(results[1], Ok(false));
            assert!(matches!(results[2], Err(LedgerError::Replay(_))));
            assert_eq!(results[3], Ok(false));

            assert!(h.pool.is_verified(&alice()));
            assert!(!h.pool.is_verified(&bob()));

            let verified = h
                .pool
                .take_events()
                .into_iter()
                .filter(|r| matches!(r.event, LedgerEvent::ProofVerified { .. }))
                .count();
            assert_eq!(verified, 1);
        }

        #[test]
        fn test_pre_verified_nullifier_cannot_back_a_borrow() {
            let h = funded(1000);
            let inputs = inputs_for(alice(), 800, 5);
            h.pool
                .batch_verify(&alice(), &[ProofSubmission::new(valid_proof(), inputs.clone())])
                .unwrap();

            let err = h
                .pool
                .borrow_with_proof(&alice(), 600, valid_proof(), inputs)
                .unwrap_err();
            assert!(matches!(err, LedgerError::Replay(_)));
        }

        #[test]
        fn test_verifying_key_rotation() {
            let h = harness();
            assert!(matches!(
                h.pool.update_verifying_key(&alice(), VerifyingKey(vec![7])),
                Err(LedgerError::Authorization(_))
            ));

            h.pool.update_verifying_key(&admin(), VerifyingKey(vec![7])).unwrap();
            assert_eq!(h.pool.verifying_key(), VerifyingKey(vec![7]));
        }
    }

    // =============================================================
    // Atomicity
    // =============================================================

    mod atomicity {
        use super::*;

        #[test]
        fn test_failed_deposit_transfer_credits_nothing() {
            let h = harness();
            h.asset.fail_next();

            let err = h.pool.deposit(&alice(), 1000).unwrap_err();
            assert!(matches!(err, LedgerError::TransferFailure(_)));
            assert_eq!(h.pool.collateral_balance(&alice()), 0);
            assert_eq!(h.pool.pool_status().total_deposits, 0);
            assert!(h.pool.take_events().is_empty());
        }

        #[test]
        fn test_deposit_beyond_wallet_fails() {
            let h = harness();
            let err = h.pool.deposit(&alice(), 2_000_000).unwrap_err();
            assert!(matches!(err, LedgerError::TransferFailure(_)));
            assert_eq!(h.pool.collateral_balance(&alice()), 0);
        }

        #[test]
        fn test_failed_zk_disbursement_restores_everything() {
            let h = funded(1000);
            h.pool.deposit(&lp(), 5000).unwrap();
            h.pool.take_events();
            let before = h.pool.pool_status();
            let inputs = inputs_for(alice(), 750, 11);

            h.asset.fail_next();
            let err = h
                .pool
                .borrow_with_proof(&alice(), 1000, valid_proof(), inputs.clone())
                .unwrap_err();
            assert!(matches!(err, LedgerError::TransferFailure(_)));

            assert!(!h.pool.has_active_loan(&alice()));
            assert_eq!(h.pool.loan_state(&alice()), LoanState::NonExistent);
            assert!(!h.pool.is_nullifier_used(&inputs.nullifier_hash));
            assert!(!h.pool.is_verified(&alice()));
            assert_eq!(h.pool.pool_status(), before);
            assert!(h.pool.take_events().is_empty());

            // the same proof is still good
            h.pool
                .borrow_with_proof(&alice(), 1000, valid_proof(), inputs)
                .unwrap();
        }

        #[test]
        fn test_failed_overpaid_repay_restores_everything() {
            let h = funded(1000);
            h.pool.borrow(&alice(), 500).unwrap();
            h.pool.take_events();

            let wallet_before = h.asset.balance_of(&alice());
            let vault_before = h.asset.pool_balance();
            let status_before = h.pool.pool_status();
            assert_eq!(vault_before, status_before.total_liquidity);

            h.asset.fail_next();
            let err = h.pool.repay(&alice(), 600).unwrap_err();
            assert!(matches!(err, LedgerError::TransferFailure(_)));

            assert!(h.pool.has_active_loan(&alice()));
            assert_eq!(h.asset.balance_of(&alice()), wallet_before);
            assert_eq!(h.asset.pool_balance(), vault_before);
            assert_eq!(h.pool.pool_status(), status_before);
            assert_eq!(h.asset.pool_balance(), h.pool.pool_status().total_liquidity);
            assert!(h.pool.take_events().is_empty());
        }

        #[test]
        fn test_overpaid_repay_pulls_only_debt() {
            let h = funded(1000);
            h.pool.borrow(&alice(), 500).unwrap();
            let wallet_before = h.asset.balance_of(&alice());

            let receipt = h.pool.repay(&alice(), 600).unwrap();
            assert_eq!(receipt.paid, 500);
            assert_eq!(receipt.refund, 100);

            assert_eq!(
                h.asset.calls().last().copied(),
                Some(AssetCall::TransferFrom {
                    from: alice(),
                    to: pool_account(),
                    amount: 500
                })
            );
            assert_eq!(h.asset.balance_of(&alice()), wallet_before - 500);
            assert_eq!(h.asset.pool_balance(), h.pool.pool_status().total_liquidity);
        }

        #[test]
        fn test_events_follow_commit_order() {
            let h = funded(1000);
            h.pool.borrow(&alice(), 500).unwrap();
            h.pool.repay(&alice(), 500).unwrap();

            let events = h.pool.take_events();
            let kinds: Vec<_> = events.iter().map(|r| r.event.kind()).collect();
            assert_eq!(kinds, vec!["deposit", "borrow", "repay"]);
            assert!(events.windows(2).all(|w| w[0].seq < w[1].seq));
            assert!(events.iter().all(|r| r.timestamp == START));
        }

        #[test]
        fn test_transfers_use_pool_account() {
            let h = funded(1000);
            h.pool.borrow(&alice(), 500).unwrap();
            assert_eq!(
                h.asset.calls(),
                vec![
                    AssetCall::TransferFrom {
                        from: alice(),
                        to: pool_account(),
                        amount: 1000
                    },
                    AssetCall::Transfer {
                        to: alice(),
                        amount: 500
                    },
                ]
            );
        }
    }

    // =============================================================
    // Re-entrancy
    // =============================================================

    mod reentrancy {
        use super::*;
        use crate::error::LedgerResult;
        use std::cell::RefCell;

        #[test]
        fn test_reentrant_call_during_transfer_rejected() {
            let h = harness();
            let Harness { pool, asset, .. } = h;
            let pool = Rc::new(pool);

            let outcome: Rc<RefCell<Vec<LedgerResult<()>>>> = Rc::new(RefCell::new(Vec::new()));
            let observed_balance = Rc::new(RefCell::new(None));

            let weak = Rc::downgrade(&pool);
            let sink = outcome.clone();
            let observed = observed_balance.clone();
            asset.set_on_transfer(move || {
                if let Some(pool) = weak.upgrade() {
                    sink.borrow_mut().push(pool.deposit(&alice(), 1));
                    // views work mid-transfer and see committed state
                    *observed.borrow_mut() = Some(pool.collateral_balance(&alice()));
                }
            });

            pool.deposit(&alice(), 1000).unwrap();

            assert_eq!(
                outcome.borrow().as_slice(),
                &[Err(LedgerError::State(StateError::Reentrant))]
            );
            assert_eq!(*observed_balance.borrow(), Some(1000));
            assert_eq!(pool.collateral_balance(&alice()), 1000);
        }

        #[test]
        fn test_guard_released_after_failure() {
            let h = harness();
            assert!(h.pool.borrow(&alice(), 10).is_err());
            h.pool.deposit(&alice(), 10).unwrap();
        }
    }

    // =============================================================
    // Construction
    // =============================================================

    mod construction {
        use super::*;

        #[test]
        fn test_null_pool_account_rejected() {
            let result = LendingPool::new(
                LedgerConfig {
                    pool_account: Address::ZERO,
                    gateway: GatewayConfig::new(admin(), dev_key()),
                },
                MockAsset::new(pool_account()),
                ManualClock::at(START),
                MockVerifier::new(),
            );
            assert!(matches!(result, Err(LedgerError::Validation(_))));
        }

        #[test]
        fn test_gateway_threshold_configurable() {
            let mut gateway = GatewayConfig::new(admin(), dev_key());
            gateway.min_threshold = 800;
            let asset = MockAsset::new(pool_account());
            asset.mint(&alice(), 10_000);
            let pool = LendingPool::new(
                LedgerConfig {
                    pool_account: pool_account(),
                    gateway,
                },
                asset,
                ManualClock::at(START),
                MockVerifier::new(),
            )
            .unwrap();

            pool.deposit(&alice(), 1000).unwrap();
            let err = pool
                .borrow_with_proof(&alice(), 600, valid_proof(), inputs_for(alice(), 750, 1))
                .unwrap_err();
            assert!(matches!(err, LedgerError::Authorization(_)));
            assert_eq!(pool.min_threshold(), 800);
        }
    }
}
