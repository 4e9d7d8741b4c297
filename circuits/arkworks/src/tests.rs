//! Groth16 Integration Tests
//!
//! Real setup/prove/verify round trips, tampering, and an end-to-end ZK borrow
//! through `LendingPool` wired to `Groth16Verifier`.

#[cfg(test)]
mod integration_tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::sync::{Arc, OnceLock};

    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use zk_credit_ledger::{
        Address, Amount, AssetTransfer, Clock, GatewayConfig, LedgerConfig, LedgerError, LendingPool,
        Nullifier, PairingVerifier, Proof, ProofSubmission, Timestamp,
    };

    use crate::error::CircuitError;
    use crate::prover::EligibilityProver;
    use crate::verifier::Groth16Verifier;

    /// Deterministic seeded RNG (same seed as `ark_std::test_rng`), concrete so
    /// it satisfies the `CryptoRng` bound on setup/prove.
    fn test_rng() -> StdRng {
        StdRng::from_seed([
            1, 0, 0, 0, 23, 0, 0, 0, 200, 1, 0, 0, 210, 30, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
        ])
    }

    /// Setup is the slow part; share one across tests.
    fn prover() -> &'static EligibilityProver {
        static PROVER: OnceLock<EligibilityProver> = OnceLock::new();
        PROVER.get_or_init(|| EligibilityProver::setup(&mut test_rng()).unwrap())
    }

    fn alice() -> Address {
        Address::from_low_u8(1)
    }

    fn prove(score: u64, threshold: u64, secret: u64, subject: Address) -> ProofSubmission {
        prover()
            .prove(score, threshold, secret, &subject, &mut test_rng())
            .unwrap()
    }

    // =============================================================
    // Prove / Verify
    // =============================================================

    mod groth16 {
        use super::*;

        #[test]
        fn test_valid_proof_verifies() {
            let vk = prover().verifying_key().unwrap();
            let s = prove(780, 700, 12345, alice());

            assert!(Groth16Verifier::verify(&vk, &s.proof, &s.inputs).unwrap());
            assert!(Groth16Verifier.verify_pairing(&vk, &s.proof, &s.inputs));
        }

        #[test]
        fn test_prover_refuses_false_statement() {
            let err = prover()
                .prove(650, 700, 12345, &alice(), &mut test_rng())
                .err();
            assert_eq!(
                err,
                Some(CircuitError::ScoreBelowThreshold {
                    score: 650,
                    threshold: 700
                })
            );
        }

        #[test]
        fn test_prover_refuses_zero_secret() {
            let err = prover().prove(780, 700, 0, &alice(), &mut test_rng()).err();
            assert_eq!(err, Some(CircuitError::InvalidSecret));
        }

        #[test]
        fn test_tampered_threshold_rejected() {
            let vk = prover().verifying_key().unwrap();
            let s = prove(780, 700, 12345, alice());

            let mut inputs = s.inputs;
            inputs.threshold = 760;
            assert!(!Groth16Verifier.verify_pairing(&vk, &s.proof, &inputs));
        }

        #[test]
        fn test_tampered_subject_rejected() {
            let vk = prover().verifying_key().unwrap();
            let s = prove(780, 700, 12345, alice());

            let mut inputs = s.inputs;
            inputs.subject = Address::from_low_u8(2);
            assert!(!Groth16Verifier.verify_pairing(&vk, &s.proof, &inputs));
        }

        #[test]
        fn test_tampered_nullifier_rejected() {
            let vk = prover().verifying_key().unwrap();
            let s = prove(780, 700, 12345, alice());

            let mut inputs = s.inputs;
            inputs.nullifier_hash = Nullifier::new([3; 32]);
            assert!(!Groth16Verifier.verify_pairing(&vk, &s.proof, &inputs));
        }

        #[test]
        fn test_garbage_material_is_false_not_panic() {
            let vk = prover().verifying_key().unwrap();
            let s = prove(780, 700, 12345, alice());

            assert!(!Groth16Verifier.verify_pairing(&vk, &Proof(vec![1, 2, 3]), &s.inputs));
            assert!(!Groth16Verifier.verify_pairing(
                &zk_credit_ledger::VerifyingKey(vec![9; 8]),
                &s.proof,
                &s.inputs
            ));
            assert!(matches!(
                Groth16Verifier::verify(&vk, &Proof(vec![]), &s.inputs),
                Err(CircuitError::Serialization { .. })
            ));
        }

        #[test]
        fn test_key_acceptance() {
            let vk = prover().verifying_key().unwrap();
            assert!(Groth16Verifier.accepts_key(&vk));
            assert!(!Groth16Verifier.accepts_key(&zk_credit_ledger::VerifyingKey(vec![9; 8])));

            let mut truncated = vk.clone();
            truncated.0.truncate(vk.0.len() / 2);
            assert!(!Groth16Verifier.accepts_key(&truncated));
        }

        #[test]
        fn test_same_secret_same_nullifier() {
            let a = prove(780, 700, 777, alice());
            let b = prove(800, 720, 777, alice());
            let c = prove(800, 720, 777, Address::from_low_u8(2));

            assert_eq!(a.inputs.nullifier_hash, b.inputs.nullifier_hash);
            assert_ne!(a.inputs.nullifier_hash, c.inputs.nullifier_hash);
        }

        #[test]
        fn test_proving_key_roundtrip() {
            let bytes = prover().proving_key_bytes().unwrap();
            let restored = EligibilityProver::from_proving_key_bytes(&bytes).unwrap();
            assert_eq!(
                restored.verifying_key().unwrap(),
                prover().verifying_key().unwrap()
            );
        }
    }

    // =============================================================
    // End-to-end through the ledger
    // =============================================================

    mod ledger_flow {
        use super::*;

        const POOL: Address = Address::from_low_u8(0xf0);
        const ADMIN: Address = Address::from_low_u8(0xad);

        struct Vault {
            balances: RefCell<HashMap<Address, Amount>>,
        }

        impl Vault {
            fn with(holders: &[(Address, Amount)]) -> Self {
                Self {
                    balances: RefCell::new(holders.iter().copied().collect()),
                }
            }

            fn move_funds(&self, from: &Address, to: &Address, amount: Amount) -> bool {
                let mut balances = self.balances.borrow_mut();
                let available = balances.get(from).copied().unwrap_or(0);
                if available < amount {
                    return false;
                }
                balances.insert(*from, available - amount);
                *balances.entry(*to).or_insert(0) += amount;
                true
            }
        }

        impl AssetTransfer for Vault {
            fn transfer(&self, to: &Address, amount: Amount) -> bool {
                self.move_funds(&POOL, to, amount)
            }

            fn transfer_from(&self, from: &Address, to: &Address, amount: Amount) -> bool {
                self.move_funds(from, to, amount)
            }
        }

        struct FixedClock(Timestamp);

        impl Clock for FixedClock {
            fn now(&self) -> Timestamp {
                self.0
            }
        }

        fn pool() -> LendingPool<Vault, FixedClock> {
            let lp = Address::from_low_u8(3);
            LendingPool::new(
                LedgerConfig {
                    pool_account: POOL,
                    gateway: GatewayConfig::new(ADMIN, prover().verifying_key().unwrap()),
                },
                Vault::with(&[(alice(), 10_000), (lp, 10_000)]),
                FixedClock(1_700_000_000),
                Arc::new(Groth16Verifier),
            )
            .map(|pool| {
                pool.deposit(&lp, 5000).unwrap();
                pool
            })
            .unwrap()
        }

        #[test]
        fn test_zk_borrow_then_replay() {
            let pool = pool();
            pool.deposit(&alice(), 1000).unwrap();

            let s = prove(780, 720, 4242, alice());
            let receipt = pool
                .borrow_with_proof(&alice(), 1100, s.proof.clone(), s.inputs)
                .unwrap();
            assert!(receipt.zk_verified);
            assert!(pool.is_nullifier_used(&s.inputs.nullifier_hash));

            pool.repay(&alice(), 1100).unwrap();

            let err = pool
                .borrow_with_proof(&alice(), 1100, s.proof, s.inputs)
                .unwrap_err();
            assert!(matches!(err, LedgerError::Replay(_)));
        }

        #[test]
        fn test_proof_below_gateway_minimum() {
            let pool = pool();
            pool.deposit(&alice(), 1000).unwrap();

            // valid proof of a statement the gateway does not care about
            let s = prove(690, 650, 99, alice());
            let err = pool
                .borrow_with_proof(&alice(), 600, s.proof, s.inputs)
                .unwrap_err();
            assert!(matches!(err, LedgerError::Authorization(_)));
            assert!(!pool.is_nullifier_used(&s.inputs.nullifier_hash));
        }

        #[test]
        fn test_stolen_proof_cannot_be_used_by_another_borrower() {
            let pool = pool();
            let bob = Address::from_low_u8(3);
            pool.deposit(&alice(), 1000).unwrap();

            let s = prove(780, 720, 4242, alice());
            let err = pool
                .borrow_with_proof(&bob, 600, s.proof, s.inputs)
                .unwrap_err();
            assert!(matches!(err, LedgerError::Authorization(_)));
        }
    }
}
