//! ZK Credit Lending Ledger
//!
//! # Overview
//!
//! 담보 기반 대출 원장. 사용자는 담보를 예치하고 두 가지 LTV tier로 대출합니다:
//!
//! - Standard: 50% LTV
//! - ZK-verified: 120% LTV, backed by a zero-knowledge proof that the user's credit
//!   score meets a threshold, without revealing the score
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        LendingPool                            │
//! │   (guard · clock · transaction boundary · event log)          │
//! │                                                               │
//! │                   ┌──────────────────────┐                    │
//! │                   │  BorrowPolicyEngine  │ ── LedgerAuthority │
//! │                   └──────────┬───────────┘                    │
//! │          ┌───────────────────┼───────────────────┐            │
//! │          ▼                   ▼                   ▼            │
//! │  ┌───────────────┐   ┌──────────────┐   ┌───────────────┐     │
//! │  │ Collateral    │   │  LoanLedger  │   │ ProofGateway  │     │
//! │  │ Manager       │   │              │   │               │     │
//! │  └───────────────┘   └──────────────┘   └───────┬───────┘     │
//! └─────────────────────────────────────────────────┼─────────────┘
//!          │ AssetTransfer                          │ PairingVerifier
//!          ▼                                        ▼
//!   external fungible asset               Groth16 / mock verifier
//! ```
//!
//! ## Modules
//!
//! - `types`: identities, amounts, proof material
//! - `math`: LTV / interest / liquidation arithmetic
//! - `collateral`, `loan`, `gateway`: the three stateful components
//! - `policy`: borrow / repay / liquidate orchestration
//! - `pool`: public facade and transaction boundary
//! - `asset`, `clock`: injected capabilities
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zk_credit_ledger::{GatewayConfig, LedgerConfig, LendingPool, SystemClock};
//!
//! let pool = LendingPool::new(
//!     LedgerConfig { pool_account, gateway: GatewayConfig::new(admin, vk) },
//!     asset,
//!     SystemClock,
//!     verifier,
//! )?;
//! pool.deposit(&alice, 1000)?;
//! pool.borrow(&alice, 500)?;
//! ```

pub mod asset;
pub mod clock;
pub mod collateral;
pub mod error;
pub mod events;
pub mod gateway;
pub mod guard;
pub mod loan;
pub mod math;
pub mod policy;
pub mod pool;
pub mod types;

#[cfg(test)]
mod mock;

#[cfg(test)]
mod tests;

pub use asset::{AssetTransfer, Transfer};
pub use clock::{Clock, SystemClock};
pub use collateral::{CollateralManager, LiquidityPool, Seizure};
pub use error::{LedgerError, LedgerResult, StateError};
pub use events::{EventRecord, LedgerEvent};
pub use gateway::{GatewayConfig, PairingVerifier, ProofGateway, DEFAULT_MIN_THRESHOLD};
pub use loan::{InterestAccrual, LedgerAuthority, Loan, LoanLedger, LoanState};
pub use policy::{BorrowPolicyEngine, BorrowReceipt, LiquidationReceipt, RepayReceipt};
pub use pool::{LedgerConfig, LendingPool};
pub use types::{Address, Amount, Nullifier, Proof, ProofSubmission, PublicInputs, Timestamp, VerifyingKey};
