//! Development Endpoints (non-production only)
//!
//! - `/dev/faucet`: 인메모리 자산 보관소에 잔고 발행
//! - `/dev/credit-proof`: 서버의 개발용 prover로 신용 증명 생성
//!
//! 프로덕션에서는 라우트 자체가 등록되지 않는다.

use axum::{extract::State, Json};
use rand::Rng;
use serde::{Deserialize, Serialize};
use zk_credit_circuits::CircuitError;
use zk_credit_ledger::{Address, Amount, PublicInputs};

use crate::{
    error::ApiError,
    types::{amount_string, HexBytes},
    AppState,
};

// ============ Request/Response Types ============

#[derive(Debug, Deserialize)]
pub struct FaucetRequest {
    pub to: Address,
    #[serde(with = "amount_string")]
    pub amount: Amount,
}

#[derive(Debug, Serialize)]
pub struct FaucetResponse {
    pub to: Address,
    #[serde(with = "amount_string")]
    pub balance: Amount,
}

/// 신용 증명 생성 요청
///
/// `credit_score`와 `secret`은 private witness. 실제 배포에서는 클라이언트에서 생성한다.
#[derive(Debug, Deserialize)]
pub struct CreditProofRequest {
    pub subject: Address,
    pub credit_score: u64,
    /// 기본값: 서버 최소 threshold
    pub threshold: Option<u64>,
    /// 없으면 무작위 (같은 secret → 같은 nullifier)
    pub secret: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CreditProofResponse {
    pub proof: HexBytes,
    pub public_inputs: PublicInputs,
    /// 증명 생성 시간 (ms)
    pub generation_time_ms: u64,
}

// ============ Handlers ============

/// POST /dev/faucet
pub async fn faucet(
    State(state): State<AppState>,
    Json(req): Json<FaucetRequest>,
) -> Result<Json<FaucetResponse>, ApiError> {
    if req.to.is_zero() {
        return Err(ApiError::ValidationError("faucet recipient must not be null".to_string()));
    }
    if req.amount == 0 {
        return Err(ApiError::ValidationError("amount must be positive".to_string()));
    }

    let balance = state
        .asset
        .mint(&req.to, req.amount)
        .ok_or_else(|| ApiError::ValidationError("balance overflow".to_string()))?;

    tracing::debug!(to = %req.to, amount = %req.amount, "faucet mint");
    Ok(Json(FaucetResponse { to: req.to, balance }))
}

/// POST /dev/credit-proof
///
/// Groth16 증명은 CPU 집약적이므로 blocking 스레드에서 생성한다.
pub async fn credit_proof(
    State(state): State<AppState>,
    Json(req): Json<CreditProofRequest>,
) -> Result<Json<CreditProofResponse>, ApiError> {
    let prover = state
        .prover
        .clone()
        .ok_or_else(|| ApiError::ServiceUnavailable("Development prover".to_string()))?;

    let threshold = req.threshold.unwrap_or(state.config.min_credit_threshold);
    let secret = req
        .secret
        .unwrap_or_else(|| rand::thread_rng().gen_range(1..=u64::MAX));
    let subject = req.subject;
    let credit_score = req.credit_score;

    let start = std::time::Instant::now();
    let submission = tokio::task::spawn_blocking(move || {
        prover.prove(credit_score, threshold, secret, &subject, &mut rand::rngs::OsRng)
    })
    .await
    .map_err(|e| {
        tracing::error!("prover task failed: {:?}", e);
        ApiError::InternalError
    })?
    .map_err(|e| match e {
        CircuitError::ScoreBelowThreshold { .. } | CircuitError::InvalidSecret => {
            ApiError::ValidationError(e.to_string())
        }
        other => ApiError::ProofGenerationFailed(other.to_string()),
    })?;
    let generation_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(subject = %subject, threshold, generation_time_ms, "credit proof generated");

    Ok(Json(CreditProofResponse {
        proof: HexBytes(submission.proof.0),
        public_inputs: submission.inputs,
        generation_time_ms,
    }))
}
