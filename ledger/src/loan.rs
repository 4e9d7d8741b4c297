//! Loan Ledger
//!
//! 대출 상태 머신과 이자 계산을 담당합니다.
//!
//! # State Machine
//!
//! ```text
//!                 create_loan               close_loan
//!  NonExistent ───────────────▶ Active ───────────────▶ Closed
//!                                  ▲                       │
//!                                  └───────────────────────┘
//!                                   create_loan (overwrite)
//! ```
//!
//! One record per user. A new loan overwrites the closed one; history is not kept here
//! (the facade's event log carries it).
//!
//! # Access Control
//!
//! Mutations require the [`LedgerAuthority`] capability returned by the single
//! successful [`LoanLedger::bind`] call. Each binding carries a process-unique id, so a
//! capability minted by another ledger fails even when it names the same address.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult, StateError};
use crate::math::{self, LtvTier};
use crate::types::{Address, Amount, Timestamp};

/// 대출 기록
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Loan {
    /// 대출 원금
    #[serde(with = "crate::types::amount_string")]
    pub principal: Amount,
    /// 대출 생성 시점의 담보 잔액
    #[serde(with = "crate::types::amount_string")]
    pub collateral_snapshot: Amount,
    /// 마지막으로 기록된 누적 이자 (absolute total)
    #[serde(with = "crate::types::amount_string")]
    pub interest_accrued: Amount,
    /// 대출 시작 시각
    pub start_time: Timestamp,
    pub active: bool,
    /// ZK 신용 증명으로 상향된 LTV tier 여부
    pub zk_verified: bool,
}

impl Loan {
    pub fn tier(&self) -> LtvTier {
        LtvTier::from_zk(self.zk_verified)
    }

    /// Interest owed at `now`, recomputed from the absolute elapsed time.
    pub fn interest_at(&self, now: Timestamp) -> LedgerResult<Amount> {
        math::simple_interest(self.principal, self.start_time, now)
    }

    pub fn debt_at(&self, now: Timestamp) -> LedgerResult<Amount> {
        self.principal
            .checked_add(self.interest_at(now)?)
            .ok_or_else(|| LedgerError::overflow("total debt"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoanState {
    NonExistent,
    Active,
    Closed,
}

/// Result of an `accrue_interest` call that moved the stored total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestAccrual {
    pub delta: Amount,
    pub total: Amount,
}

static NEXT_BINDING: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    authority: Address,
    id: u64,
}

/// Capability proving the holder is the ledger's bound authority.
///
/// Only [`LoanLedger::bind`] mints one.
#[derive(Debug)]
pub struct LedgerAuthority {
    binding: Binding,
}

impl LedgerAuthority {
    pub fn address(&self) -> Address {
        self.binding.authority
    }
}

/// Working copies made by `clone` share the binding of the ledger they came from.
#[derive(Debug, Clone, Default)]
pub struct LoanLedger {
    binding: Option<Binding>,
    loans: HashMap<Address, Loan>,
}

impl LoanLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// authority 바인딩 (1회만 가능)
    pub fn bind(&mut self, authority: Address) -> LedgerResult<LedgerAuthority> {
        if self.binding.is_some() {
            return Err(StateError::AlreadyBound.into());
        }
        if authority.is_zero() {
            return Err(LedgerError::Validation("null ledger authority".to_string()));
        }
        let binding = Binding {
            authority,
            id: NEXT_BINDING.fetch_add(1, Ordering::Relaxed),
        };
        self.binding = Some(binding);
        Ok(LedgerAuthority { binding })
    }

    pub fn authority(&self) -> Option<Address> {
        self.binding.map(|binding| binding.authority)
    }

    fn authorize(&self, auth: &LedgerAuthority) -> LedgerResult<()> {
        match self.binding {
            Some(bound) if bound == auth.binding => Ok(()),
            Some(bound) if bound.authority == auth.binding.authority => Err(
                LedgerError::Authorization("capability minted for another ledger binding".to_string()),
            ),
            Some(_) => Err(LedgerError::Authorization(format!(
                "{} is not the ledger authority",
                auth.binding.authority
            ))),
            None => Err(LedgerError::Authorization("ledger authority not bound".to_string())),
        }
    }

    pub fn state(&self, user: &Address) -> LoanState {
        match self.loans.get(user) {
            None => LoanState::NonExistent,
            Some(loan) if loan.active => LoanState::Active,
            Some(_) => LoanState::Closed,
        }
    }

    /// Latest record for `user`, active or closed.
    pub fn loan(&self, user: &Address) -> Option<&Loan> {
        self.loans.get(user)
    }

    pub fn active_loan(&self, user: &Address) -> Option<&Loan> {
        self.loans.get(user).filter(|loan| loan.active)
    }

    pub fn has_active_loan(&self, user: &Address) -> bool {
        self.active_loan(user).is_some()
    }

    pub fn create_loan(
        &mut self,
        auth: &LedgerAuthority,
        user: &Address,
        principal: Amount,
        collateral_snapshot: Amount,
        zk_verified: bool,
        now: Timestamp,
    ) -> LedgerResult<()> {
        self.authorize(auth)?;
        if user.is_zero() {
            return Err(LedgerError::Validation("null borrower".to_string()));
        }
        if principal == 0 {
            return Err(LedgerError::Validation("principal must be positive".to_string()));
        }
        if self.has_active_loan(user) {
            return Err(StateError::LoanExists.into());
        }

        self.loans.insert(
            *user,
            Loan {
                principal,
                collateral_snapshot,
                interest_accrued: 0,
                start_time: now,
                active: true,
                zk_verified,
            },
        );
        Ok(())
    }

    /// 이자 누적
    ///
    /// Stores the absolute `interest(now)` when it exceeds the stored total and returns
    /// the delta. Returns `None` when nothing moved (e.g. same clock tick).
    pub fn accrue_interest(
        &mut self,
        auth: &LedgerAuthority,
        user: &Address,
        now: Timestamp,
    ) -> LedgerResult<Option<InterestAccrual>> {
        self.authorize(auth)?;
        let loan = self
            .loans
            .get_mut(user)
            .filter(|loan| loan.active)
            .ok_or(LedgerError::State(StateError::NoLoan))?;

        let total = loan.interest_at(now)?;
        if total <= loan.interest_accrued {
            return Ok(None);
        }

        let delta = total - loan.interest_accrued;
        loan.interest_accrued = total;
        Ok(Some(InterestAccrual { delta, total }))
    }

    /// `principal + interest(now)`; zero when the user has no active loan.
    pub fn total_debt(&self, user: &Address, now: Timestamp) -> LedgerResult<Amount> {
        match self.active_loan(user) {
            Some(loan) => loan.debt_at(now),
            None => Ok(0),
        }
    }

    /// Finalizes interest and deactivates the loan. The returned record is the closed
    /// loan, readable by the caller for settlement.
    pub fn close_loan(
        &mut self,
        auth: &LedgerAuthority,
        user: &Address,
        now: Timestamp,
    ) -> LedgerResult<Loan> {
        self.authorize(auth)?;
        let loan = self
            .loans
            .get_mut(user)
            .filter(|loan| loan.active)
            .ok_or(LedgerError::State(StateError::NoLoan))?;

        let total = loan.interest_at(now)?;
        loan.interest_accrued = loan.interest_accrued.max(total);
        loan.active = false;
        Ok(*loan)
    }
}
