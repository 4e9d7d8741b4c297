//! Borrow Policy Engine
//!
//! Orchestrates borrow / repay / liquidate over the three stateful components. It holds
//! the [`LedgerAuthority`] capability and never touches another component's state
//! except through that component's methods.
//!
//! # Borrow
//!
//! ```text
//! 1. amount == 0                         → Validation
//! 2. balance == 0                        → State(NoCollateral)
//! 3. active loan                         → State(LoanExists)
//! 4. ZK only: subject != user            → Authorization
//!             gateway.verify             → Replay | Authorization
//! 5. amount > maxBorrow(tier)            → CollateralSafety
//! 6. amount > totalLiquidity             → InsufficientFunds
//! 7. loans.create_loan(balance snapshot)
//! 8. totalLiquidity -= amount, Transfer::Out
//! ```

use crate::asset::Transfer;
use crate::collateral::{CollateralManager, Seizure};
use crate::error::{LedgerError, LedgerResult, StateError};
use crate::gateway::ProofGateway;
use crate::loan::{InterestAccrual, LedgerAuthority, LoanLedger};
use crate::math::{self, LtvTier};
use crate::types::{Address, Amount, ProofSubmission, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowReceipt {
    pub principal: Amount,
    pub collateral_snapshot: Amount,
    pub zk_verified: bool,
    pub transfer: Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepayReceipt {
    /// Amount actually pulled from the payer (always the full debt)
    pub paid: Amount,
    pub debt: Amount,
    pub principal: Amount,
    pub interest: Amount,
    /// Offered minus debt; settled net, so it is never transferred in either direction
    pub refund: Amount,
    pub transfer: Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidationReceipt {
    pub principal: Amount,
    pub collateral_snapshot: Amount,
    pub seizure: Seizure,
    /// Reward payout; none when the reward truncates to zero
    pub transfer: Option<Transfer>,
}

#[derive(Debug)]
pub struct BorrowPolicyEngine {
    authority: LedgerAuthority,
}

impl BorrowPolicyEngine {
    pub fn new(authority: LedgerAuthority) -> Self {
        Self { authority }
    }

    pub fn authority(&self) -> Address {
        self.authority.address()
    }

    /// `balance * ltv(tier) / BASIS_POINTS`
    pub fn max_borrow(
        &self,
        collateral: &CollateralManager,
        user: &Address,
        zk_verified: bool,
    ) -> LedgerResult<Amount> {
        math::max_borrow(collateral.balance_of(user), LtvTier::from_zk(zk_verified))
    }

    /// Collateral floor for withdrawals: zero without an active loan.
    pub fn required_collateral(&self, loans: &LoanLedger, user: &Address) -> LedgerResult<Amount> {
        match loans.active_loan(user) {
            Some(loan) => math::required_collateral(loan.principal, loan.tier()),
            None => Ok(0),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn borrow(
        &self,
        collateral: &mut CollateralManager,
        loans: &mut LoanLedger,
        gateway: &mut ProofGateway,
        user: &Address,
        amount: Amount,
        proof: Option<&ProofSubmission>,
        now: Timestamp,
    ) -> LedgerResult<BorrowReceipt> {
        if amount == 0 {
            return Err(LedgerError::Validation("borrow amount must be positive".to_string()));
        }

        let balance = collateral.balance_of(user);
        if balance == 0 {
            return Err(StateError::NoCollateral.into());
        }
        if loans.has_active_loan(user) {
            return Err(StateError::LoanExists.into());
        }

        let zk_verified = proof.is_some();
        if let Some(submission) = proof {
            if submission.inputs.subject != *user {
                return Err(LedgerError::Authorization(format!(
                    "proof subject {} does not match borrower {}",
                    submission.inputs.subject, user
                )));
            }
            if !gateway.verify(&submission.proof, &submission.inputs)? {
                return Err(LedgerError::Authorization("credit proof rejected".to_string()));
            }
        }

        let max = self.max_borrow(collateral, user, zk_verified)?;
        if amount > max {
            return Err(LedgerError::CollateralSafety(format!(
                "borrow {} exceeds max {}",
                amount, max
            )));
        }

        collateral.disburse(amount)?;
        loans.create_loan(&self.authority, user, amount, balance, zk_verified, now)?;

        Ok(BorrowReceipt {
            principal: amount,
            collateral_snapshot: balance,
            zk_verified,
            transfer: Transfer::Out { to: *user, amount },
        })
    }

    /// 전액 상환 (partial repayment is never accepted)
    pub fn repay(
        &self,
        collateral: &mut CollateralManager,
        loans: &mut LoanLedger,
        user: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> LedgerResult<RepayReceipt> {
        let principal = loans
            .active_loan(user)
            .map(|loan| loan.principal)
            .ok_or(LedgerError::State(StateError::NoLoan))?;

        let debt = loans.total_debt(user, now)?;
        if amount < debt {
            return Err(LedgerError::InsufficientFunds(format!(
                "repay {} < debt {}",
                amount, debt
            )));
        }

        loans.close_loan(&self.authority, user, now)?;
        let interest = debt - principal;
        collateral.restore(principal, interest)?;

        // net settlement: only `debt` is pulled, the excess never leaves the wallet
        Ok(RepayReceipt {
            paid: debt,
            debt,
            principal,
            interest,
            refund: amount - debt,
            transfer: Transfer::In { from: *user, amount: debt },
        })
    }

    /// 청산
    ///
    /// Eligible iff `principal * BASIS_POINTS / collateral_snapshot > 8000`. The
    /// liquidator receives 10% of the snapshot; the rest of the seized collateral stays
    /// in the pool.
    pub fn liquidate(
        &self,
        collateral: &mut CollateralManager,
        loans: &mut LoanLedger,
        caller: &Address,
        borrower: &Address,
        now: Timestamp,
    ) -> LedgerResult<LiquidationReceipt> {
        if caller.is_zero() || borrower.is_zero() {
            return Err(LedgerError::Validation("null liquidation party".to_string()));
        }

        let (principal, collateral_snapshot) = loans
            .active_loan(borrower)
            .map(|loan| (loan.principal, loan.collateral_snapshot))
            .ok_or(LedgerError::State(StateError::NoLoan))?;

        if !math::is_liquidatable(principal, collateral_snapshot)? {
            return Err(LedgerError::CollateralSafety(format!(
                "ltv {} bps not above liquidation threshold {}",
                math::current_ltv(principal, collateral_snapshot)?,
                math::LIQUIDATION_THRESHOLD
            )));
        }

        let reward = math::liquidation_reward(collateral_snapshot)?;
        loans.close_loan(&self.authority, borrower, now)?;
        let seizure = collateral.seize(borrower, collateral_snapshot, reward)?;

        let transfer = (reward > 0).then_some(Transfer::Out { to: *caller, amount: reward });

        Ok(LiquidationReceipt {
            principal,
            collateral_snapshot,
            seizure,
            transfer,
        })
    }

    pub fn accrue_interest(
        &self,
        loans: &mut LoanLedger,
        user: &Address,
        now: Timestamp,
    ) -> LedgerResult<Option<InterestAccrual>> {
        loans.accrue_interest(&self.authority, user, now)
    }
}
