//! Credit Eligibility Circuit - arkworks R1CS Implementation
//!
//! Proves `credit_score >= threshold` for a subject without revealing the score, and
//! binds the proof to a one-time nullifier derived from a private secret.
//!
//! # Circuit Constraints
//! 1. Range check: credit_score in [0, 2^64)
//! 2. Range check: threshold in [0, 2^64)
//! 3. Comparison: credit_score - threshold in [0, 2^64)
//! 4. Nullifier: nullifier_hash == secret * subject + secret
//!
//! # Public Inputs (in order)
//!
//! | Index | Input | Encoding |
//! |-------|-------|----------|
//! | 0 | threshold | `F::from(u64)` |
//! | 1 | nullifier_hash | canonical little-endian field bytes |
//! | 2 | subject | 20-byte address, big-endian integer |
//!
//! # Comparison
//!
//! With both operands range-checked to 64 bits, `score - threshold` wraps to a value
//! near the field modulus when `score < threshold`, which fails the 64-bit check on the
//! difference. No offset is needed.

use ark_ff::PrimeField;
use ark_r1cs_std::{
    alloc::AllocVar,
    boolean::Boolean,
    eq::EqGadget,
    fields::fp::FpVar,
    ToBitsGadget,
};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_std::marker::PhantomData;

/// Number of bits for range checking
pub const RANGE_BITS: usize = 64;

/// Credit Eligibility Circuit
#[derive(Clone)]
pub struct EligibilityCircuit<F: PrimeField> {
    /// Private: actual credit score
    pub credit_score: Option<F>,
    /// Private: nullifier secret
    pub secret: Option<F>,
    /// Public: minimum score claimed
    pub threshold: Option<F>,
    /// Public: one-time nullifier
    pub nullifier_hash: Option<F>,
    /// Public: identity the proof is bound to
    pub subject: Option<F>,
    _marker: PhantomData<F>,
}

impl<F: PrimeField> EligibilityCircuit<F> {
    pub fn new(credit_score: F, secret: F, threshold: F, subject: F) -> Self {
        Self {
            credit_score: Some(credit_score),
            secret: Some(secret),
            threshold: Some(threshold),
            nullifier_hash: Some(Self::compute_nullifier(secret, subject)),
            subject: Some(subject),
            _marker: PhantomData,
        }
    }

    /// Create empty circuit for setup
    pub fn empty() -> Self {
        Self {
            credit_score: None,
            secret: None,
            threshold: None,
            nullifier_hash: None,
            subject: None,
            _marker: PhantomData,
        }
    }

    /// Nullifier (simplified field commitment)
    pub fn compute_nullifier(secret: F, subject: F) -> F {
        secret * subject + secret
    }

    /// Public inputs in allocation order
    pub fn public_inputs(&self) -> Option<Vec<F>> {
        Some(vec![self.threshold?, self.nullifier_hash?, self.subject?])
    }
}

/// Enforce that `value` fits in [`RANGE_BITS`] bits.
fn enforce_range<F: PrimeField>(value: &FpVar<F>) -> Result<(), SynthesisError> {
    let bits = value.to_bits_le()?;
    for bit in bits.iter().skip(RANGE_BITS) {
        bit.enforce_equal(&Boolean::constant(false))?;
    }
    Ok(())
}

impl<F: PrimeField> ConstraintSynthesizer<F> for EligibilityCircuit<F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        // ======== Allocate Private Inputs ========

        let score_var = FpVar::new_witness(cs.clone(), || {
            self.credit_score.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let secret_var = FpVar::new_witness(cs.clone(), || {
            self.secret.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // ======== Allocate Public Inputs ========

        let threshold_var = FpVar::new_input(cs.clone(), || {
            self.threshold.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let nullifier_var = FpVar::new_input(cs.clone(), || {
            self.nullifier_hash.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let subject_var = FpVar::new_input(cs.clone(), || {
            self.subject.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // ======== Constraint 1-2: Range Checks ========

        enforce_range(&score_var)?;
        enforce_range(&threshold_var)?;

        // ======== Constraint 3: credit_score >= threshold ========

        let diff = &score_var - &threshold_var;
        enforce_range(&diff)?;

        // ======== Constraint 4: Nullifier Binding ========

        let computed = &secret_var * &subject_var + &secret_var;
        computed.enforce_equal(&nullifier_var)?;

        Ok(())
    }
}
