//! Groth16 prover for the eligibility circuit
//!
//! Proof generation is off-ledger; this type backs tests, benches and the development
//! server. Setup is circuit-specific (one trusted setup per circuit).

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use zk_credit_ledger::{Address, Proof, ProofSubmission, PublicInputs, VerifyingKey};

use crate::eligibility::EligibilityCircuit;
use crate::encoding::{field_to_nullifier, subject_to_field};
use crate::error::validation::{validate_eligibility, validate_secret};
use crate::error::{CircuitError, CircuitResult};

pub struct EligibilityProver {
    proving_key: ProvingKey<Bn254>,
}

impl EligibilityProver {
    /// Circuit-specific trusted setup.
    pub fn setup<R: RngCore + CryptoRng>(rng: &mut R) -> CircuitResult<Self> {
        let (proving_key, _) =
            Groth16::<Bn254>::circuit_specific_setup(EligibilityCircuit::<Fr>::empty(), rng)
                .map_err(|e| CircuitError::SetupFailed { reason: e.to_string() })?;
        Ok(Self { proving_key })
    }

    pub fn from_proving_key_bytes(bytes: &[u8]) -> CircuitResult<Self> {
        let proving_key = ProvingKey::<Bn254>::deserialize_compressed(bytes)
            .map_err(|e| CircuitError::Serialization { reason: e.to_string() })?;
        Ok(Self { proving_key })
    }

    pub fn proving_key_bytes(&self) -> CircuitResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| CircuitError::Serialization { reason: e.to_string() })?;
        Ok(bytes)
    }

    /// Verifying key in the ledger's opaque byte form
    pub fn verifying_key(&self) -> CircuitResult<VerifyingKey> {
        let mut bytes = Vec::new();
        self.proving_key
            .vk
            .serialize_compressed(&mut bytes)
            .map_err(|e| CircuitError::Serialization { reason: e.to_string() })?;
        Ok(VerifyingKey(bytes))
    }

    /// Prove `credit_score >= threshold` for `subject`.
    ///
    /// The nullifier is derived from `(secret, subject)`, so reusing a secret for the
    /// same subject yields the same nullifier.
    pub fn prove<R: RngCore + CryptoRng>(
        &self,
        credit_score: u64,
        threshold: u64,
        secret: u64,
        subject: &Address,
        rng: &mut R,
    ) -> CircuitResult<ProofSubmission> {
        validate_eligibility(credit_score, threshold)?;
        validate_secret(secret)?;

        let secret_f = Fr::from(secret);
        let subject_f = subject_to_field(subject);
        let nullifier = EligibilityCircuit::compute_nullifier(secret_f, subject_f);
        let circuit = EligibilityCircuit::new(Fr::from(credit_score), secret_f, Fr::from(threshold), subject_f);

        let proof = Groth16::<Bn254>::prove(&self.proving_key, circuit, rng)
            .map_err(|e| CircuitError::ProofGenerationFailed { reason: e.to_string() })?;

        let mut bytes = Vec::new();
        proof
            .serialize_compressed(&mut bytes)
            .map_err(|e| CircuitError::Serialization { reason: e.to_string() })?;

        Ok(ProofSubmission::new(
            Proof(bytes),
            PublicInputs {
                threshold,
                nullifier_hash: field_to_nullifier(nullifier),
                subject: *subject,
            },
        ))
    }
}
