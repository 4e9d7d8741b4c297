//! Health Check Endpoint
//!
//! # Interview Q&A
//!
//! Q: Health check 엔드포인트는 왜 필요한가?
//! A: 3가지 용도
//!    1. 로드밸런서 헬스체크 (ALB, nginx)
//!    2. Kubernetes liveness/readiness check
//!    3. 모니터링 시스템 연동 (Prometheus, Datadog)
//!
//! Q: 이벤트 인덱스 상태도 체크하는 이유는?
//! A: "깊은 헬스체크"(deep health check) 패턴
//!    - 원장은 프로세스 메모리에 있어 항상 응답 가능
//!    - 인덱스(DB)가 끊기면 히스토리 조회만 불가 → "degraded"

use axum::{extract::State, Json};
use serde::Serialize;
use zk_credit_ledger::Address;

use crate::AppState;

/// Health check 응답
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ledger: LedgerStatus,
    pub event_index: IndexStatus,
    pub ws_connections: usize,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct LedgerStatus {
    pub pool_account: Address,
    pub gateway_admin: Address,
    pub min_credit_threshold: u64,
    /// 개발용 prover 사용 가능 여부
    pub prover_available: bool,
}

#[derive(Serialize)]
pub struct IndexStatus {
    pub enabled: bool,
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// GET /health
///
/// 서버 및 의존성 상태 확인
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let prover_available = state.prover.is_some();
    let ledger = state
        .view(move |ledger| LedgerStatus {
            pool_account: ledger.pool_account(),
            gateway_admin: ledger.gateway_admin(),
            min_credit_threshold: ledger.min_threshold(),
            prover_available,
        })
        .await;

    // 인덱스 연결 테스트
    let event_index = match &state.events {
        Some(index) => {
            let start = std::time::Instant::now();
            match index.health_check().await {
                Ok(_) => IndexStatus {
                    enabled: true,
                    connected: true,
                    latency_ms: Some(start.elapsed().as_millis() as u64),
                },
                Err(_) => IndexStatus {
                    enabled: true,
                    connected: false,
                    latency_ms: None,
                },
            }
        }
        None => IndexStatus {
            enabled: false,
            connected: false,
            latency_ms: None,
        },
    };

    let healthy = !event_index.enabled || event_index.connected;

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ledger,
        event_index,
        ws_connections: state.ws_hub.active_connections().await,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
