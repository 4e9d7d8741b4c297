//! Ledger events
//!
//! Recorded only for calls that fully committed (state + transfers). A rolled-back
//! call leaves no event behind.

use serde::Serialize;

use crate::types::{Address, Amount, Nullifier, Timestamp};

/// 원장 이벤트 타입
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum LedgerEvent {
    /// 담보 예치
    Deposited {
        user: Address,
        #[serde(with = "crate::types::amount_string")]
        amount: Amount,
    },
    /// 담보 출금
    Withdrawn {
        user: Address,
        #[serde(with = "crate::types::amount_string")]
        amount: Amount,
    },
    /// 대출
    Borrowed {
        user: Address,
        #[serde(with = "crate::types::amount_string")]
        principal: Amount,
        #[serde(with = "crate::types::amount_string")]
        collateral_snapshot: Amount,
        zk_verified: bool,
    },
    /// 전액 상환
    Repaid {
        user: Address,
        #[serde(with = "crate::types::amount_string")]
        paid: Amount,
        #[serde(with = "crate::types::amount_string")]
        principal: Amount,
        #[serde(with = "crate::types::amount_string")]
        interest: Amount,
        #[serde(with = "crate::types::amount_string")]
        refund: Amount,
    },
    /// 이자 누적 (delta only)
    InterestAccrued {
        user: Address,
        #[serde(with = "crate::types::amount_string")]
        delta: Amount,
        #[serde(with = "crate::types::amount_string")]
        total: Amount,
    },
    /// 청산
    Liquidated {
        borrower: Address,
        liquidator: Address,
        #[serde(with = "crate::types::amount_string")]
        principal: Amount,
        #[serde(with = "crate::types::amount_string")]
        reward: Amount,
        #[serde(with = "crate::types::amount_string")]
        seized: Amount,
        /// 풀에 귀속된 잔여 담보
        #[serde(with = "crate::types::amount_string")]
        swept_to_pool: Amount,
    },
    /// ZK proof 검증 통과
    ProofVerified { subject: Address, nullifier: Nullifier },
    VerifyingKeyUpdated { admin: Address },
}

impl LedgerEvent {
    /// Short name, used as the event-index `event_type` column.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::Deposited { .. } => "deposit",
            LedgerEvent::Withdrawn { .. } => "withdraw",
            LedgerEvent::Borrowed { .. } => "borrow",
            LedgerEvent::Repaid { .. } => "repay",
            LedgerEvent::InterestAccrued { .. } => "accrue",
            LedgerEvent::Liquidated { .. } => "liquidate",
            LedgerEvent::ProofVerified { .. } => "proof_verified",
            LedgerEvent::VerifyingKeyUpdated { .. } => "verifying_key_updated",
        }
    }

    /// Identities whose history this event belongs to.
    pub fn accounts(&self) -> Vec<Address> {
        match self {
            LedgerEvent::Deposited { user, .. }
            | LedgerEvent::Withdrawn { user, .. }
            | LedgerEvent::Borrowed { user, .. }
            | LedgerEvent::Repaid { user, .. }
            | LedgerEvent::InterestAccrued { user, .. } => vec![*user],
            LedgerEvent::Liquidated { borrower, liquidator, .. } => vec![*borrower, *liquidator],
            LedgerEvent::ProofVerified { subject, .. } => vec![*subject],
            LedgerEvent::VerifyingKeyUpdated { admin } => vec![*admin],
        }
    }

    /// Headline amount of the event, if any.
    pub fn amount(&self) -> Option<Amount> {
        match self {
            LedgerEvent::Deposited { amount, .. } | LedgerEvent::Withdrawn { amount, .. } => Some(*amount),
            LedgerEvent::Borrowed { principal, .. } => Some(*principal),
            LedgerEvent::Repaid { paid, .. } => Some(*paid),
            LedgerEvent::InterestAccrued { delta, .. } => Some(*delta),
            LedgerEvent::Liquidated { reward, .. } => Some(*reward),
            LedgerEvent::ProofVerified { .. } | LedgerEvent::VerifyingKeyUpdated { .. } => None,
        }
    }
}

/// Committed event with its position in the ledger's log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub seq: u64,
    pub timestamp: Timestamp,
    pub event: LedgerEvent,
}
