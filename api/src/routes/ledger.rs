//! Ledger Endpoints
//!
//! 원장 변경 호출. 모든 요청은 호출자(`caller`)를 명시적으로 전달한다.
//! 성공 응답은 커밋이 끝난 뒤에만 나가며, 실패한 호출은 원장 상태를 바꾸지 않는다.
//!
//! 금액은 10진수 문자열로 주고받는다 (`"1000"`).

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use zk_credit_ledger::{Address, Amount, Proof, PublicInputs};

use crate::{error::ApiError, types::{amount_string, HexBytes}, AppState};

// ============ Request/Response Types ============

/// deposit / withdraw / borrow / repay 요청
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub caller: Address,
    #[serde(with = "amount_string")]
    pub amount: Amount,
}

/// ZK 대출 요청
#[derive(Debug, Deserialize)]
pub struct BorrowWithProofRequest {
    pub caller: Address,
    #[serde(with = "amount_string")]
    pub amount: Amount,
    /// Groth16 proof (`0x` hex)
    pub proof: HexBytes,
    /// `{threshold, nullifier_hash, subject}`
    pub public_inputs: PublicInputs,
}

/// 청산 요청
#[derive(Debug, Deserialize)]
pub struct LiquidateRequest {
    pub caller: Address,
    pub borrower: Address,
}

/// 이자 누적 요청 (누구나 호출 가능)
#[derive(Debug, Deserialize)]
pub struct AccrueRequest {
    pub caller: Address,
    pub user: Address,
}

/// deposit / withdraw 응답
#[derive(Debug, Serialize)]
pub struct CollateralResponse {
    pub user: Address,
    #[serde(with = "amount_string")]
    pub amount: Amount,
    /// 호출 후 담보 잔고
    #[serde(with = "amount_string")]
    pub collateral_balance: Amount,
}

#[derive(Debug, Serialize)]
pub struct BorrowResponse {
    pub user: Address,
    #[serde(with = "amount_string")]
    pub principal: Amount,
    #[serde(with = "amount_string")]
    pub collateral_snapshot: Amount,
    pub zk_verified: bool,
}

#[derive(Debug, Serialize)]
pub struct RepayResponse {
    pub user: Address,
    #[serde(with = "amount_string")]
    pub paid: Amount,
    #[serde(with = "amount_string")]
    pub debt: Amount,
    #[serde(with = "amount_string")]
    pub principal: Amount,
    #[serde(with = "amount_string")]
    pub interest: Amount,
    #[serde(with = "amount_string")]
    pub refund: Amount,
}

#[derive(Debug, Serialize)]
pub struct LiquidationResponse {
    pub borrower: Address,
    pub liquidator: Address,
    #[serde(with = "amount_string")]
    pub principal: Amount,
    #[serde(with = "amount_string")]
    pub seized: Amount,
    #[serde(with = "amount_string")]
    pub reward: Amount,
    /// 풀에 귀속된 잔여 담보
    #[serde(with = "amount_string")]
    pub swept_to_pool: Amount,
}

#[derive(Debug, Serialize)]
pub struct AccrueResponse {
    pub user: Address,
    /// 활성 대출이 없으면 false (no-op)
    pub accrued: bool,
    #[serde(with = "amount_string")]
    pub delta: Amount,
    #[serde(with = "amount_string")]
    pub interest_accrued: Amount,
}

// ============ Handlers ============

/// POST /ledger/deposit
pub async fn deposit(
    State(state): State<AppState>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<CollateralResponse>, ApiError> {
    let AmountRequest { caller, amount } = req;
    let collateral_balance = state
        .commit(move |ledger| {
            ledger.deposit(&caller, amount)?;
            Ok(ledger.collateral_balance(&caller))
        })
        .await?;

    Ok(Json(CollateralResponse {
        user: caller,
        amount,
        collateral_balance,
    }))
}

/// POST /ledger/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<CollateralResponse>, ApiError> {
    let AmountRequest { caller, amount } = req;
    let collateral_balance = state
        .commit(move |ledger| {
            ledger.withdraw(&caller, amount)?;
            Ok(ledger.collateral_balance(&caller))
        })
        .await?;

    Ok(Json(CollateralResponse {
        user: caller,
        amount,
        collateral_balance,
    }))
}

/// POST /ledger/borrow
///
/// 표준 대출: 담보의 50%까지
pub async fn borrow(
    State(state): State<AppState>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<BorrowResponse>, ApiError> {
    let AmountRequest { caller, amount } = req;
    let receipt = state
        .commit(move |ledger| ledger.borrow(&caller, amount))
        .await?;

    Ok(Json(BorrowResponse {
        user: caller,
        principal: receipt.principal,
        collateral_snapshot: receipt.collateral_snapshot,
        zk_verified: receipt.zk_verified,
    }))
}

/// POST /ledger/borrow-with-proof
///
/// ZK 대출: 유효한 신용 증명이 있으면 담보의 120%까지
///
/// # Request
///
/// ```json
/// {
///   "caller": "0x…01",
///   "amount": "1100",
///   "proof": "0x…",
///   "public_inputs": {
///     "threshold": 720,
///     "nullifier_hash": "0x…",
///     "subject": "0x…01"
///   }
/// }
/// ```
pub async fn borrow_with_proof(
    State(state): State<AppState>,
    Json(req): Json<BorrowWithProofRequest>,
) -> Result<Json<BorrowResponse>, ApiError> {
    let BorrowWithProofRequest {
        caller,
        amount,
        proof,
        public_inputs,
    } = req;

    let receipt = state
        .commit(move |ledger| {
            ledger.borrow_with_proof(&caller, amount, Proof(proof.into_inner()), public_inputs)
        })
        .await?;

    Ok(Json(BorrowResponse {
        user: caller,
        principal: receipt.principal,
        collateral_snapshot: receipt.collateral_snapshot,
        zk_verified: receipt.zk_verified,
    }))
}

/// POST /ledger/repay
///
/// 전액 상환만 허용. 초과분은 환불된다.
pub async fn repay(
    State(state): State<AppState>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<RepayResponse>, ApiError> {
    let AmountRequest { caller, amount } = req;
    let receipt = state
        .commit(move |ledger| ledger.repay(&caller, amount))
        .await?;

    Ok(Json(RepayResponse {
        user: caller,
        paid: receipt.paid,
        debt: receipt.debt,
        principal: receipt.principal,
        interest: receipt.interest,
        refund: receipt.refund,
    }))
}

/// POST /ledger/liquidate
pub async fn liquidate(
    State(state): State<AppState>,
    Json(req): Json<LiquidateRequest>,
) -> Result<Json<LiquidationResponse>, ApiError> {
    let LiquidateRequest { caller, borrower } = req;
    let receipt = state
        .commit(move |ledger| ledger.liquidate(&caller, &borrower))
        .await?;

    Ok(Json(LiquidationResponse {
        borrower,
        liquidator: caller,
        principal: receipt.principal,
        seized: receipt.seizure.seized,
        reward: receipt.seizure.reward,
        swept_to_pool: receipt.seizure.remainder,
    }))
}

/// POST /ledger/accrue
pub async fn accrue_interest(
    State(state): State<AppState>,
    Json(req): Json<AccrueRequest>,
) -> Result<Json<AccrueResponse>, ApiError> {
    let AccrueRequest { caller, user } = req;
    let accrual = state
        .commit(move |ledger| ledger.accrue_interest(&caller, &user))
        .await?;

    Ok(Json(match accrual {
        Some(accrual) => AccrueResponse {
            user,
            accrued: true,
            delta: accrual.delta,
            interest_accrued: accrual.total,
        },
        None => AccrueResponse {
            user,
            accrued: false,
            delta: 0,
            interest_accrued: 0,
        },
    }))
}
