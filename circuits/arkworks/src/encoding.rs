//! Ledger types ↔ BN254 scalar field
//!
//! Nullifiers travel as canonical little-endian field bytes. Any 32-byte string that is
//! not the canonical encoding of its field element is refused, so two distinct ledger
//! nullifiers can never name the same in-circuit value.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use zk_credit_ledger::{Address, Nullifier, PublicInputs};

use crate::error::{CircuitError, CircuitResult};

/// 20-byte identity read as a big-endian integer (always below the modulus)
pub fn subject_to_field(subject: &Address) -> Fr {
    Fr::from_be_bytes_mod_order(subject.as_bytes())
}

pub fn field_to_nullifier(value: Fr) -> Nullifier {
    let bytes = value.into_bigint().to_bytes_le();
    let mut out = [0u8; 32];
    for (dst, src) in out.iter_mut().zip(bytes.iter()) {
        *dst = *src;
    }
    Nullifier::new(out)
}

pub fn nullifier_to_field(nullifier: &Nullifier) -> CircuitResult<Fr> {
    let value = Fr::from_le_bytes_mod_order(nullifier.as_bytes());
    if field_to_nullifier(value) != *nullifier {
        return Err(CircuitError::NonCanonicalInput {
            field: "nullifier_hash".to_string(),
        });
    }
    Ok(value)
}

/// `[threshold, nullifier_hash, subject]` in circuit allocation order
pub fn public_inputs_to_field(inputs: &PublicInputs) -> CircuitResult<Vec<Fr>> {
    Ok(vec![
        Fr::from(inputs.threshold),
        nullifier_to_field(&inputs.nullifier_hash)?,
        subject_to_field(&inputs.subject),
    ])
}
