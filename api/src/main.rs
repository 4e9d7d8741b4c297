//! ZK Credit Lending API Server
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client (Frontend)                     │
//! │            proof 생성은 클라이언트 (또는 /dev/credit-proof)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum Web Server                         │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                      Routes Layer                        ││
//! │  │  /health  /ledger/*  /account/*  /pool  /proof/*  /ws   ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Ledger (in-process)                   ││
//! │  │  LendingPool = CollateralManager + LoanLedger            ││
//! │  │              + ProofGateway + BorrowPolicyEngine         ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │              Event Index (optional PostgreSQL)           ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zk_credit_api::{routes, AppState, Config, Database, EventRepository, ZkKeys};
use zk_credit_circuits::Groth16Verifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=debug,sqlx=warn 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "zk_credit_api=debug,zk_credit_ledger=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting ZK Credit Lending API Server");

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!(environment = ?config.environment, "📋 Configuration loaded");

    // 이벤트 인덱스 (옵션)
    let events: Option<Arc<dyn EventRepository>> = match &config.database_url {
        Some(url) => {
            let db = Database::connect(url).await?;
            tracing::info!("🗄️  Database connected");

            db.run_migrations().await?;
            tracing::info!("📦 Migrations completed");

            Some(Arc::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, account history disabled");
            None
        }
    };

    // ZK 키 (trusted setup은 CPU 집약적)
    let key_config = config.clone();
    let keys = tokio::task::spawn_blocking(move || ZkKeys::load(&key_config)).await??;
    tracing::info!(prover = keys.prover.is_some(), "🔐 Verifying key ready");

    // 앱 상태 구성
    let port = config.port;
    let state = AppState::new(config, Arc::new(Groth16Verifier::new()), keys, events)?;
    state.seed_liquidity().await?;

    // 라우터 구성
    let app = routes::router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🌐 Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
