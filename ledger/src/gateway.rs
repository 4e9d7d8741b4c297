//! Proof Gateway
//!
//! Replay protection and bookkeeping for credit-eligibility proofs.
//!
//! # Flow
//!
//! ```text
//! verify(proof, {threshold, nullifier, subject})
//!   1. nullifier already used?          → Err(Replay)
//!   2. threshold < min_threshold?       → Ok(false)   (nullifier NOT consumed)
//!   3. PairingVerifier::verify_pairing  → false → Ok(false) (nullifier NOT consumed)
//!   4. consume nullifier, mark subject  → Ok(true)
//! ```
//!
//! Elliptic-curve work happens only behind [`PairingVerifier`]. The gateway never
//! inspects proof or key bytes.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{Address, Nullifier, Proof, ProofSubmission, PublicInputs, VerifyingKey};

/// 기본 최소 신용 점수 임계값
pub const DEFAULT_MIN_THRESHOLD: u64 = 700;

/// External pairing check (Groth16, PLONK, ...)
pub trait PairingVerifier: Send + Sync {
    fn verify_pairing(&self, key: &VerifyingKey, proof: &Proof, inputs: &PublicInputs) -> bool;

    /// Whether `key` decodes as a verifying key of this proving system. A rotation to a
    /// key that fails here is refused.
    fn accepts_key(&self, _key: &VerifyingKey) -> bool {
        true
    }
}

impl<F> PairingVerifier for F
where
    F: Fn(&VerifyingKey, &Proof, &PublicInputs) -> bool + Send + Sync,
{
    fn verify_pairing(&self, key: &VerifyingKey, proof: &Proof, inputs: &PublicInputs) -> bool {
        self(key, proof, inputs)
    }
}

/// Gateway 생성 설정
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// verifying key 교체 권한
    pub admin: Address,
    pub verifying_key: VerifyingKey,
    /// proof가 주장해야 하는 최소 threshold
    pub min_threshold: u64,
}

impl GatewayConfig {
    pub fn new(admin: Address, verifying_key: VerifyingKey) -> Self {
        Self {
            admin,
            verifying_key,
            min_threshold: DEFAULT_MIN_THRESHOLD,
        }
    }
}

#[derive(Clone)]
pub struct ProofGateway {
    admin: Address,
    verifying_key: VerifyingKey,
    min_threshold: u64,
    verifier: Arc<dyn PairingVerifier>,
    /// 사용된 nullifier (write-once)
    nullifiers: HashSet<Nullifier>,
    /// 한 번이라도 검증을 통과한 사용자
    verified: HashSet<Address>,
}

impl fmt::Debug for ProofGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofGateway")
            .field("admin", &self.admin)
            .field("min_threshold", &self.min_threshold)
            .field("nullifiers", &self.nullifiers.len())
            .field("verified", &self.verified.len())
            .finish_non_exhaustive()
    }
}

impl ProofGateway {
    pub fn new(config: GatewayConfig, verifier: Arc<dyn PairingVerifier>) -> LedgerResult<Self> {
        if config.admin.is_zero() {
            return Err(LedgerError::Validation("null gateway admin".to_string()));
        }
        Ok(Self {
            admin: config.admin,
            verifying_key: config.verifying_key,
            min_threshold: config.min_threshold,
            verifier,
            nullifiers: HashSet::new(),
            verified: HashSet::new(),
        })
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    pub fn min_threshold(&self) -> u64 {
        self.min_threshold
    }

    pub fn is_nullifier_used(&self, nullifier: &Nullifier) -> bool {
        self.nullifiers.contains(nullifier)
    }

    pub fn is_verified(&self, user: &Address) -> bool {
        self.verified.contains(user)
    }

    /// Single proof check. `Ok(false)` leaves the nullifier unconsumed.
    pub fn verify(&mut self, proof: &Proof, inputs: &PublicInputs) -> LedgerResult<bool> {
        if self.nullifiers.contains(&inputs.nullifier_hash) {
            return Err(LedgerError::Replay(inputs.nullifier_hash.to_string()));
        }

        if inputs.threshold < self.min_threshold {
            tracing::debug!(
                threshold = inputs.threshold,
                min = self.min_threshold,
                "proof threshold below minimum"
            );
            return Ok(false);
        }

        if !self.verifier.verify_pairing(&self.verifying_key, proof, inputs) {
            tracing::debug!(nullifier = %inputs.nullifier_hash, "pairing check failed");
            return Ok(false);
        }

        self.nullifiers.insert(inputs.nullifier_hash);
        self.verified.insert(inputs.subject);
        Ok(true)
    }

    /// Independent per-entry verification; earlier successes stay consumed when a later
    /// entry fails.
    pub fn batch_verify(&mut self, submissions: &[ProofSubmission]) -> Vec<LedgerResult<bool>> {
        submissions
            .iter()
            .map(|s| self.verify(&s.proof, &s.inputs))
            .collect()
    }

    pub fn update_verifying_key(&mut self, caller: &Address, key: VerifyingKey) -> LedgerResult<()> {
        if *caller != self.admin {
            return Err(LedgerError::Authorization(format!(
                "{} is not the gateway admin",
                caller
            )));
        }
        if key.is_empty() {
            return Err(LedgerError::Validation("empty verifying key".to_string()));
        }
        if !self.verifier.accepts_key(&key) {
            return Err(LedgerError::Validation("undecodable verifying key".to_string()));
        }
        self.verifying_key = key;
        Ok(())
    }
}
