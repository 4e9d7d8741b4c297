//! Error Handling Module
//!
//! Every variant aborts the whole ledger call; a failed call leaves ledger state
//! exactly as it was before the call. The ledger never retries.

use std::fmt;

use thiserror::Error;

/// 원장 에러 타입
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Malformed input: zero amounts, null identities, arithmetic overflow
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The call is not legal in the current state
    #[error("Invalid state: {0}")]
    State(StateError),

    /// Caller is not the bound authority / admin, or the proof was rejected
    #[error("Unauthorized: {0}")]
    Authorization(String),

    /// Balance, pool liquidity or repayment shortfall
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Would breach the LTV limit, or the loan is not eligible for liquidation
    #[error("Collateral safety check failed: {0}")]
    CollateralSafety(String),

    /// Nullifier already consumed
    #[error("Nullifier already used: {0}")]
    Replay(String),

    /// Asset capability reported failure
    #[error("Asset transfer failed: {0}")]
    TransferFailure(String),
}

/// `LedgerError::State` 세부 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    NoCollateral,
    LoanExists,
    NoLoan,
    AlreadyBound,
    Reentrant,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateError::NoCollateral => "NoCollateral",
            StateError::LoanExists => "LoanExists",
            StateError::NoLoan => "NoLoan",
            StateError::AlreadyBound => "AlreadyBound",
            StateError::Reentrant => "Reentrant",
        };
        f.write_str(name)
    }
}

impl From<StateError> for LedgerError {
    fn from(kind: StateError) -> Self {
        LedgerError::State(kind)
    }
}

impl LedgerError {
    /// Stable machine-readable code (API 응답, 로그용)
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "VALIDATION_ERROR",
            LedgerError::State(_) => "STATE_ERROR",
            LedgerError::Authorization(_) => "AUTHORIZATION_ERROR",
            LedgerError::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            LedgerError::CollateralSafety(_) => "COLLATERAL_SAFETY",
            LedgerError::Replay(_) => "REPLAY",
            LedgerError::TransferFailure(_) => "TRANSFER_FAILURE",
        }
    }

    pub(crate) fn overflow(operation: &str) -> Self {
        LedgerError::Validation(format!("arithmetic overflow in {}", operation))
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
