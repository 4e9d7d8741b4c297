//! Collateral Manager
//!
//! 사용자별 담보 잔액과 공용 유동성 풀을 단독으로 소유합니다.
//! Other components reach these counters only through the methods below.
//!
//! # Accounting
//!
//! ```text
//! deposit   : balance += a   totalDeposits += a   totalLiquidity += a
//! withdraw  : balance -= a   totalDeposits -= a   totalLiquidity -= a
//! disburse  :                                     totalLiquidity -= principal
//! restore   :                                     totalLiquidity += principal
//! seize     : balance -= s   totalDeposits -= s   totalLiquidity -= reward
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{Address, Amount};

/// 유동성 풀 집계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LiquidityPool {
    /// 전체 담보 예치량
    #[serde(with = "crate::types::amount_string")]
    pub total_deposits: Amount,
    /// 대출 가능한 유동성
    #[serde(with = "crate::types::amount_string")]
    pub total_liquidity: Amount,
    /// 상환으로 회수된 이자 (principal 제외)
    #[serde(with = "crate::types::amount_string")]
    pub interest_collected: Amount,
    /// 청산 후 풀에 귀속된 담보 잔여분
    #[serde(with = "crate::types::amount_string")]
    pub liquidation_swept: Amount,
}

/// Outcome of seizing a borrower's collateral during liquidation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seizure {
    /// Collateral removed from the borrower's balance
    pub seized: Amount,
    /// Paid out of the pool to the liquidator
    pub reward: Amount,
    /// `seized - reward`, kept by the pool
    pub remainder: Amount,
}

#[derive(Debug, Clone, Default)]
pub struct CollateralManager {
    balances: HashMap<Address, Amount>,
    pool: LiquidityPool,
}

impl CollateralManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, user: &Address) -> Amount {
        self.balances.get(user).copied().unwrap_or(0)
    }

    pub fn pool(&self) -> &LiquidityPool {
        &self.pool
    }

    pub fn deposit(&mut self, user: &Address, amount: Amount) -> LedgerResult<()> {
        if amount == 0 {
            return Err(LedgerError::Validation("deposit amount must be positive".to_string()));
        }
        if user.is_zero() {
            return Err(LedgerError::Validation("null depositor".to_string()));
        }

        let balance = self
            .balance_of(user)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("collateral balance"))?;
        let total_deposits = self
            .pool
            .total_deposits
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("total deposits"))?;
        let total_liquidity = self
            .pool
            .total_liquidity
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("total liquidity"))?;

        self.balances.insert(*user, balance);
        self.pool.total_deposits = total_deposits;
        self.pool.total_liquidity = total_liquidity;
        Ok(())
    }

    /// 담보 출금
    ///
    /// `min_collateral` is the floor the remaining balance must respect while the user
    /// has an active loan (zero otherwise).
    pub fn withdraw(
        &mut self,
        user: &Address,
        amount: Amount,
        min_collateral: Amount,
    ) -> LedgerResult<()> {
        if amount == 0 {
            return Err(LedgerError::Validation("withdraw amount must be positive".to_string()));
        }
        if user.is_zero() {
            return Err(LedgerError::Validation("null withdrawer".to_string()));
        }

        let balance = self.balance_of(user);
        if amount > balance {
            return Err(LedgerError::InsufficientFunds(format!(
                "balance {} < withdraw {}",
                balance, amount
            )));
        }

        let remaining = balance - amount;
        if remaining < min_collateral {
            return Err(LedgerError::CollateralSafety(format!(
                "remaining collateral {} below required {}",
                remaining, min_collateral
            )));
        }

        if amount > self.pool.total_liquidity {
            return Err(LedgerError::InsufficientFunds(format!(
                "pool liquidity {} < withdraw {}",
                self.pool.total_liquidity, amount
            )));
        }

        let total_deposits = self
            .pool
            .total_deposits
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::overflow("total deposits"))?;

        self.balances.insert(*user, remaining);
        self.pool.total_deposits = total_deposits;
        self.pool.total_liquidity -= amount;
        Ok(())
    }

    /// Take `amount` out of lendable liquidity for a loan disbursement.
    pub fn disburse(&mut self, amount: Amount) -> LedgerResult<()> {
        if amount > self.pool.total_liquidity {
            return Err(LedgerError::InsufficientFunds(format!(
                "pool liquidity {} < borrow {}",
                self.pool.total_liquidity, amount
            )));
        }
        self.pool.total_liquidity -= amount;
        Ok(())
    }

    /// Credit a full repayment: principal returns to liquidity, interest to reserves.
    pub fn restore(&mut self, principal: Amount, interest: Amount) -> LedgerResult<()> {
        self.pool.total_liquidity = self
            .pool
            .total_liquidity
            .checked_add(principal)
            .ok_or_else(|| LedgerError::overflow("total liquidity"))?;
        self.pool.interest_collected = self
            .pool
            .interest_collected
            .checked_add(interest)
            .ok_or_else(|| LedgerError::overflow("interest collected"))?;
        Ok(())
    }

    /// 청산 시 담보 압류
    ///
    /// Removes up to `collateral_snapshot` from the borrower, pays `reward` out of pool
    /// liquidity and sweeps the remainder into the pool.
    pub fn seize(
        &mut self,
        borrower: &Address,
        collateral_snapshot: Amount,
        reward: Amount,
    ) -> LedgerResult<Seizure> {
        if reward > self.pool.total_liquidity {
            return Err(LedgerError::InsufficientFunds(format!(
                "pool liquidity {} < liquidation reward {}",
                self.pool.total_liquidity, reward
            )));
        }

        let balance = self.balance_of(borrower);
        let seized = balance.min(collateral_snapshot);
        let remainder = seized.saturating_sub(reward);

        let swept = self
            .pool
            .liquidation_swept
            .checked_add(remainder)
            .ok_or_else(|| LedgerError::overflow("liquidation swept"))?;

        let total_deposits = self
            .pool
            .total_deposits
            .checked_sub(seized)
            .ok_or_else(|| LedgerError::overflow("total deposits"))?;

        self.balances.insert(*borrower, balance - seized);
        self.pool.total_deposits = total_deposits;
        self.pool.total_liquidity -= reward;
        self.pool.liquidation_swept = swept;

        Ok(Seizure { seized, reward, remainder })
    }
}
