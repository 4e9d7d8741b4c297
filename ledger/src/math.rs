//! Risk parameters and fixed-point LTV / interest math
//!
//! All ratios are basis points (10000 = 100%). Every division truncates toward zero and
//! every multiplication is checked.
//!
//! ```text
//! maxBorrow        = balance   * ltv(tier)        / 10000
//! requiredMinimum  = principal * 10000            / ltv(tier)
//! currentLtv       = principal * 10000            / collateralSnapshot
//! interest(t)      = principal * 500 * (t - t0)   / (365 * 86400 * 10000)
//! ```

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{Amount, Timestamp};

pub const BASIS_POINTS: u128 = 10_000;

/// 일반 대출 LTV (50%)
pub const STANDARD_LTV: u128 = 5_000;

/// ZK 신용 증명 대출 LTV (120%)
pub const ZK_LTV: u128 = 12_000;

/// 청산 가능 LTV 경계 (80%, strict `>`)
pub const LIQUIDATION_THRESHOLD: u128 = 8_000;

/// 청산 보상 (10% of collateral snapshot)
pub const LIQUIDATION_BONUS: u128 = 1_000;

/// 연 이자율 (5%)
pub const ANNUAL_RATE_BPS: u128 = 500;

pub const SECONDS_PER_YEAR: u128 = 365 * 86_400;

/// LTV tier a loan was opened under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LtvTier {
    Standard,
    ZkVerified,
}

impl LtvTier {
    pub fn from_zk(zk_verified: bool) -> Self {
        if zk_verified {
            LtvTier::ZkVerified
        } else {
            LtvTier::Standard
        }
    }

    pub fn bps(self) -> u128 {
        match self {
            LtvTier::Standard => STANDARD_LTV,
            LtvTier::ZkVerified => ZK_LTV,
        }
    }
}

/// `balance * ltv / BASIS_POINTS`
pub fn max_borrow(balance: Amount, tier: LtvTier) -> LedgerResult<Amount> {
    balance
        .checked_mul(tier.bps())
        .map(|v| v / BASIS_POINTS)
        .ok_or_else(|| LedgerError::overflow("max borrow"))
}

/// Minimum collateral that keeps `principal` within the tier's LTV.
pub fn required_collateral(principal: Amount, tier: LtvTier) -> LedgerResult<Amount> {
    principal
        .checked_mul(BASIS_POINTS)
        .map(|v| v / tier.bps())
        .ok_or_else(|| LedgerError::overflow("required collateral"))
}

/// `principal * BASIS_POINTS / collateral_snapshot`. A zero snapshot reads as unbounded.
pub fn current_ltv(principal: Amount, collateral_snapshot: Amount) -> LedgerResult<u128> {
    if collateral_snapshot == 0 {
        return Ok(u128::MAX);
    }
    principal
        .checked_mul(BASIS_POINTS)
        .map(|v| v / collateral_snapshot)
        .ok_or_else(|| LedgerError::overflow("current ltv"))
}

pub fn is_liquidatable(principal: Amount, collateral_snapshot: Amount) -> LedgerResult<bool> {
    Ok(current_ltv(principal, collateral_snapshot)? > LIQUIDATION_THRESHOLD)
}

pub fn liquidation_reward(collateral_snapshot: Amount) -> LedgerResult<Amount> {
    collateral_snapshot
        .checked_mul(LIQUIDATION_BONUS)
        .map(|v| v / BASIS_POINTS)
        .ok_or_else(|| LedgerError::overflow("liquidation reward"))
}

/// Simple interest from absolute elapsed time. A clock reading before `start` is zero
/// elapsed time.
pub fn simple_interest(principal: Amount, start: Timestamp, now: Timestamp) -> LedgerResult<Amount> {
    let elapsed = now.saturating_sub(start) as u128;
    principal
        .checked_mul(ANNUAL_RATE_BPS)
        .and_then(|v| v.checked_mul(elapsed))
        .map(|v| v / (SECONDS_PER_YEAR * BASIS_POINTS))
        .ok_or_else(|| LedgerError::overflow("interest"))
}
