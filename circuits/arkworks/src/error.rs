//! Error types for the credit-eligibility circuit
//!
//! Provides structured error handling for setup, proving and key handling.

use std::fmt;

/// Error types for circuit operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    /// Credit score does not meet the claimed threshold
    ScoreBelowThreshold { score: u64, threshold: u64 },

    /// Secret must be non-zero (a zero secret makes the nullifier zero for every subject)
    InvalidSecret,

    /// Groth16 circuit-specific setup failed
    SetupFailed { reason: String },

    /// Proof generation failed
    ProofGenerationFailed { reason: String },

    /// Key or proof could not be (de)serialized
    Serialization { reason: String },

    /// Public input does not encode a canonical field element
    NonCanonicalInput { field: String },

    /// Verification could not run
    VerificationFailed { reason: String },
}

impl fmt::Display for CircuitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitError::ScoreBelowThreshold { score, threshold } => {
                write!(f, "Credit score {} below threshold {}", score, threshold)
            }
            CircuitError::InvalidSecret => {
                write!(f, "Invalid secret value")
            }
            CircuitError::SetupFailed { reason } => {
                write!(f, "Setup failed: {}", reason)
            }
            CircuitError::ProofGenerationFailed { reason } => {
                write!(f, "Proof generation failed: {}", reason)
            }
            CircuitError::Serialization { reason } => {
                write!(f, "Serialization failed: {}", reason)
            }
            CircuitError::NonCanonicalInput { field } => {
                write!(f, "{} is not a canonical field element", field)
            }
            CircuitError::VerificationFailed { reason } => {
                write!(f, "Verification failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for CircuitError {}

/// Result type for circuit operations
pub type CircuitResult<T> = Result<T, CircuitError>;

/// Input validation utilities
pub mod validation {
    use super::*;

    /// Validate the statement before spending time on a proof
    pub fn validate_eligibility(score: u64, threshold: u64) -> CircuitResult<()> {
        if score < threshold {
            return Err(CircuitError::ScoreBelowThreshold { score, threshold });
        }
        Ok(())
    }

    /// Validate secret is non-zero
    pub fn validate_secret(secret: u64) -> CircuitResult<()> {
        if secret == 0 {
            return Err(CircuitError::InvalidSecret);
        }
        Ok(())
    }
}
