//! Proof Gateway Endpoints
//!
//! Batch verification, verifying-key rotation and nullifier lookups.
//! Proofs are generated off-ledger; the server only verifies them (Groth16, BN254).

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use zk_credit_ledger::{Address, Nullifier, Proof, ProofSubmission, PublicInputs, VerifyingKey};

use crate::{
    error::ApiError,
    types::{parse_nullifier, HexBytes},
    AppState,
};

/// 한 번에 검증할 수 있는 최대 proof 수
pub const MAX_BATCH_SIZE: usize = 32;

// ============ Request/Response Types ============

/// (proof, public inputs) 한 쌍
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionDto {
    /// Groth16 proof (`0x` hex, compressed)
    pub proof: HexBytes,
    pub public_inputs: PublicInputs,
}

impl From<SubmissionDto> for ProofSubmission {
    fn from(dto: SubmissionDto) -> Self {
        ProofSubmission::new(Proof(dto.proof.into_inner()), dto.public_inputs)
    }
}

/// 일괄 검증 요청
#[derive(Debug, Deserialize)]
pub struct VerifyBatchRequest {
    pub caller: Address,
    pub submissions: Vec<SubmissionDto>,
}

/// 항목별 결과
#[derive(Debug, Serialize)]
pub struct VerifyResult {
    pub index: usize,
    pub subject: Address,
    pub nullifier: Nullifier,
    pub verified: bool,
    /// 호출 수준이 아닌 항목 수준 실패 (REPLAY 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EntryError>,
}

#[derive(Debug, Serialize)]
pub struct EntryError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyBatchResponse {
    pub results: Vec<VerifyResult>,
    /// verified == true 인 항목 수
    pub verified_count: usize,
}

/// verifying key 교체 요청 (admin 전용)
#[derive(Debug, Deserialize)]
pub struct UpdateVerifyingKeyRequest {
    pub caller: Address,
    /// compressed Groth16 verifying key (`0x` hex)
    pub verifying_key: HexBytes,
}

#[derive(Debug, Serialize)]
pub struct UpdateVerifyingKeyResponse {
    pub admin: Address,
    /// 새 키의 바이트 길이
    pub key_len: usize,
}

#[derive(Debug, Serialize)]
pub struct NullifierResponse {
    pub nullifier: Nullifier,
    pub used: bool,
}

// ============ Handlers ============

/// POST /proof/verify-batch
///
/// 각 항목은 독립적으로 검증된다. 한 항목의 실패가 다른 항목에 영향을 주지 않으며,
/// 통과한 항목의 nullifier는 소비된다 (같은 배치 안의 중복도 두 번째부터 REPLAY).
pub async fn verify_batch(
    State(state): State<AppState>,
    Json(req): Json<VerifyBatchRequest>,
) -> Result<Json<VerifyBatchResponse>, ApiError> {
    if req.submissions.is_empty() {
        return Err(ApiError::ValidationError("submissions must not be empty".to_string()));
    }
    if req.submissions.len() > MAX_BATCH_SIZE {
        return Err(ApiError::ValidationError(format!(
            "at most {} submissions per batch",
            MAX_BATCH_SIZE
        )));
    }

    let caller = req.caller;
    let submissions: Vec<ProofSubmission> = req.submissions.into_iter().map(Into::into).collect();
    let keys: Vec<(Address, Nullifier)> = submissions
        .iter()
        .map(|s| (s.inputs.subject, s.inputs.nullifier_hash))
        .collect();

    let outcomes = state
        .commit(move |ledger| ledger.batch_verify(&caller, &submissions))
        .await?;

    let results: Vec<VerifyResult> = keys
        .into_iter()
        .zip(outcomes)
        .enumerate()
        .map(|(index, ((subject, nullifier), outcome))| match outcome {
            Ok(verified) => VerifyResult {
                index,
                subject,
                nullifier,
                verified,
                error: None,
            },
            Err(err) => VerifyResult {
                index,
                subject,
                nullifier,
                verified: false,
                error: Some(EntryError {
                    code: err.code().to_string(),
                    message: err.to_string(),
                }),
            },
        })
        .collect();

    let verified_count = results.iter().filter(|r| r.verified).count();
    tracing::info!(caller = %caller, total = results.len(), verified_count, "batch verification");

    Ok(Json(VerifyBatchResponse {
        results,
        verified_count,
    }))
}

/// PUT /proof/verifying-key
pub async fn update_verifying_key(
    State(state): State<AppState>,
    Json(req): Json<UpdateVerifyingKeyRequest>,
) -> Result<Json<UpdateVerifyingKeyResponse>, ApiError> {
    let caller = req.caller;
    let key = VerifyingKey(req.verifying_key.into_inner());
    let key_len = key.0.len();

    state
        .commit(move |ledger| ledger.update_verifying_key(&caller, key))
        .await?;

    Ok(Json(UpdateVerifyingKeyResponse {
        admin: caller,
        key_len,
    }))
}

/// GET /proof/nullifier/:hash
pub async fn get_nullifier(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<NullifierResponse>, ApiError> {
    let nullifier = parse_nullifier(&hash)?;
    let used = state.view(move |ledger| ledger.is_nullifier_used(&nullifier)).await;

    Ok(Json(NullifierResponse { nullifier, used }))
}
