//! arkworks R1CS Credit Eligibility
//!
//! ZK circuit and Groth16 plumbing behind the ledger's ZK borrow tier.
//!
//! # Key Points
//! - R1CS: Rank-1 Constraint System (a·b = c gates only)
//! - Range check: Bit decomposition (~254 constraints per decomposition on BN254)
//! - Proving system: Groth16 (per-circuit trusted setup, ~3 pairings to verify)
//!
//! # Components
//!
//! | Item | Purpose |
//! |------|---------|
//! | EligibilityCircuit | credit_score >= threshold, nullifier binding |
//! | EligibilityProver | setup + prove (off-ledger) |
//! | Groth16Verifier | `PairingVerifier` for the ledger's ProofGateway |
//!
//! # Flow
//!
//! ```text
//!  user (score, secret) ──▶ EligibilityProver::prove ──▶ (proof, {threshold, nullifier, subject})
//!                                                                │
//!                                                                ▼
//!                   LendingPool::borrow_with_proof ──▶ ProofGateway ──▶ Groth16Verifier
//! ```

pub mod eligibility;
pub mod encoding;
pub mod error;
pub mod prover;
pub mod verifier;

#[cfg(test)]
mod tests;

pub use eligibility::EligibilityCircuit;
pub use error::{CircuitError, CircuitResult};
pub use prover::EligibilityProver;
pub use verifier::Groth16Verifier;
