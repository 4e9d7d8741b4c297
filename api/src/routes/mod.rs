//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - 서버 상태 확인
//!
//! POST /ledger/deposit                - 담보 예치
//! POST /ledger/withdraw               - 담보 출금
//! POST /ledger/borrow                 - 표준 대출 (LTV 50%)
//! POST /ledger/borrow-with-proof      - ZK 대출 (LTV 120%)
//! POST /ledger/repay                  - 전액 상환
//! POST /ledger/liquidate              - 청산
//! POST /ledger/accrue                 - 이자 누적
//!
//! GET  /account/:address              - 계정 조회
//! GET  /account/:address/history      - 이벤트 히스토리 (DB 필요)
//! GET  /pool                          - 유동성 풀 상태
//!
//! POST /proof/verify-batch            - 일괄 검증
//! PUT  /proof/verifying-key           - VK 교체 (admin, Bearer ADMIN_TOKEN)
//! GET  /proof/nullifier/:hash         - nullifier 사용 여부
//!
//! POST /dev/faucet                    - 테스트 자산 발행 (non-production)
//! POST /dev/credit-proof              - 개발용 proof 생성 (non-production)
//!
//! GET  /ws                            - WebSocket 실시간 이벤트
//! ```

pub mod account;
pub mod dev;
pub mod health;
pub mod ledger;
pub mod proof;
pub mod ws;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_http::validate_request::ValidateRequestHeaderLayer;

use crate::AppState;

/// 라우터 생성
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    let mut app = Router::new()
        // Health check
        .route("/health", get(health::health_check))

        // Ledger calls
        .route("/ledger/deposit", post(ledger::deposit))
        .route("/ledger/withdraw", post(ledger::withdraw))
        .route("/ledger/borrow", post(ledger::borrow))
        .route("/ledger/borrow-with-proof", post(ledger::borrow_with_proof))
        .route("/ledger/repay", post(ledger::repay))
        .route("/ledger/liquidate", post(ledger::liquidate))
        .route("/ledger/accrue", post(ledger::accrue_interest))

        // Views
        .route("/account/:address", get(account::get_account))
        .route("/account/:address/history", get(account::get_account_history))
        .route("/pool", get(account::get_pool))

        // Proof gateway
        .route("/proof/verify-batch", post(proof::verify_batch))
        .route("/proof/nullifier/:hash", get(proof::get_nullifier))

        // WebSocket
        .route("/ws", get(ws::ws_handler));

    // 관리자 라우트: ADMIN_TOKEN이 설정되면 Bearer 검증 (프로덕션은 항상 설정됨)
    let mut admin = Router::new().route("/proof/verifying-key", put(proof::update_verifying_key));
    if let Some(token) = &state.config.admin_token {
        admin = admin.route_layer(ValidateRequestHeaderLayer::bearer(token));
    }
    app = app.merge(admin);

    if !state.config.is_production() {
        app = app
            .route("/dev/faucet", post(dev::faucet))
            .route("/dev/credit-proof", post(dev::credit_proof));
    }

    app
        // 미들웨어
        .layer(TraceLayer::new_for_http())
        .layer(cors)

        // 상태 주입
        .with_state(state)
}

/// CORS 설정
///
/// 프로덕션: ALLOWED_ORIGINS만 허용
/// 개발: localhost 허용
fn cors_layer(state: &AppState) -> CorsLayer {
    if state.config.is_production() {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:5173"), // Vite dev server
                HeaderValue::from_static("http://localhost:3000"), // Alternative
                HeaderValue::from_static("http://127.0.0.1:5173"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
