//! Groth16 (BN254) implementation of the ledger's pairing predicate

use ark_bn254::Bn254;
use ark_groth16::{Groth16, Proof as ArkProof, VerifyingKey as ArkVerifyingKey};
use ark_serialize::CanonicalDeserialize;
use ark_snark::SNARK;
use zk_credit_ledger::{PairingVerifier, Proof, PublicInputs, VerifyingKey};

use crate::encoding::public_inputs_to_field;
use crate::error::{CircuitError, CircuitResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct Groth16Verifier;

impl Groth16Verifier {
    pub fn new() -> Self {
        Self
    }

    /// Decode key, proof and inputs, then run the pairing check.
    pub fn verify(key: &VerifyingKey, proof: &Proof, inputs: &PublicInputs) -> CircuitResult<bool> {
        let vk = ArkVerifyingKey::<Bn254>::deserialize_compressed(key.0.as_slice())
            .map_err(|e| CircuitError::Serialization { reason: e.to_string() })?;
        let proof = ArkProof::<Bn254>::deserialize_compressed(proof.0.as_slice())
            .map_err(|e| CircuitError::Serialization { reason: e.to_string() })?;
        let public_inputs = public_inputs_to_field(inputs)?;

        Groth16::<Bn254>::verify(&vk, &public_inputs, &proof)
            .map_err(|e| CircuitError::VerificationFailed { reason: e.to_string() })
    }
}

impl PairingVerifier for Groth16Verifier {
    /// Undecodable material verifies as false.
    fn verify_pairing(&self, key: &VerifyingKey, proof: &Proof, inputs: &PublicInputs) -> bool {
        Self::verify(key, proof, inputs).unwrap_or(false)
    }

    fn accepts_key(&self, key: &VerifyingKey) -> bool {
        ArkVerifyingKey::<Bn254>::deserialize_compressed(key.0.as_slice()).is_ok()
    }
}
