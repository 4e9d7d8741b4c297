//! ZK Credit Lending API Library
//!
//! # Overview
//!
//! `zk-credit-ledger`의 `LendingPool`을 HTTP/WebSocket으로 노출하는 백엔드.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                          API                              │
//! │                                                           │
//! │  ┌─────────┐  ┌──────────┐  ┌─────────┐  ┌─────────┐     │
//! │  │ Routes  │  │ Services │  │   DB    │  │  Types  │     │
//! │  └────┬────┘  └────┬─────┘  └────┬────┘  └─────────┘     │
//! │       │            │             │ (optional index)       │
//! │       ▼            ▼             │                        │
//! │  AppState::commit ─┬─▶ WsHub     │                        │
//! │       │            └─────────────┘                        │
//! └───────┼───────────────────────────────────────────────────┘
//!         ▼
//!  Mutex<LendingPool> ──▶ InMemoryAsset / Groth16Verifier
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 HTTP 매핑
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 자산 보관소, ZK 키, WebSocket hub
//! - `db`: 이벤트 인덱스 (옵션)
//! - `types`: 공통 타입 정의
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zk_credit_api::{config::Config, services::ZkKeys, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let keys = ZkKeys::load(&config)?;
//!     let state = AppState::new(config, Arc::new(Groth16Verifier), keys, None)?;
//!     let app = zk_credit_api::routes::router(state);
//!     // ... 서버 시작
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use zk_credit_circuits::EligibilityProver;
use zk_credit_ledger::{
    EventRecord, GatewayConfig, LedgerConfig, LedgerResult, LendingPool, PairingVerifier,
    SystemClock,
};

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod types;


// Re-exports for convenience
pub use config::Config;
pub use db::{Database, EventRepository};
pub use error::ApiError;
pub use services::{InMemoryAsset, WsHub, ZkKeys};

/// 서버가 운영하는 원장 타입
pub type Ledger = LendingPool<Arc<InMemoryAsset>, SystemClock>;

/// 애플리케이션 전역 상태
///
/// `LendingPool`은 단일 스레드 원장(`!Sync`)이므로 `tokio::sync::Mutex`로 감싼다.
/// 핸들러는 락을 잡은 동안 원장 호출만 동기적으로 수행하고, 다른 `.await` 전에 놓는다.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<Ledger>>,
    pub asset: Arc<InMemoryAsset>,
    pub events: Option<Arc<dyn EventRepository>>,
    pub ws_hub: Arc<WsHub>,
    /// 개발용 prover (`/dev/credit-proof`)
    pub prover: Option<Arc<EligibilityProver>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        verifier: Arc<dyn PairingVerifier>,
        keys: ZkKeys,
        events: Option<Arc<dyn EventRepository>>,
    ) -> anyhow::Result<Self> {
        let asset = Arc::new(InMemoryAsset::new(config.pool_account));

        let gateway = GatewayConfig {
            admin: config.admin_address,
            verifying_key: keys.verifying_key,
            min_threshold: config.min_credit_threshold,
        };
        let ledger = LendingPool::new(
            LedgerConfig {
                pool_account: config.pool_account,
                gateway,
            },
            asset.clone(),
            SystemClock,
            verifier,
        )
        .context("failed to initialize lending pool")?;

        Ok(Self {
            ledger: Arc::new(Mutex::new(ledger)),
            asset,
            events,
            ws_hub: Arc::new(WsHub::new()),
            prover: keys.prover,
            config: Arc::new(config),
        })
    }

    /// INITIAL_LIQUIDITY를 관리자 명의로 발행 후 예치
    pub async fn seed_liquidity(&self) -> anyhow::Result<()> {
        let amount = self.config.initial_liquidity;
        if amount == 0 {
            return Ok(());
        }

        let admin = self.config.admin_address;
        self.asset
            .mint(&admin, amount)
            .context("initial liquidity overflows admin balance")?;
        self.commit(move |ledger| ledger.deposit(&admin, amount))
            .await
            .map_err(|e| anyhow::anyhow!("failed to seed initial liquidity: {}", e))?;

        tracing::info!(admin = %admin, amount = %amount, "💧 Initial liquidity seeded");
        Ok(())
    }

    /// 원장 변경 호출
    ///
    /// 락 안에서 `op`를 실행하고 커밋된 이벤트를 꺼낸 뒤 락을 놓는다.
    /// 이후 이벤트를 WebSocket으로 발행하고 인덱스에 기록한다 (실패는 로그만).
    pub async fn commit<R, F>(&self, op: F) -> Result<R, ApiError>
    where
        F: FnOnce(&Ledger) -> LedgerResult<R> + Send,
        R: Send,
    {
        let (result, records, pool, now) = {
            let ledger = self.ledger.lock().await;
            let result = op(&ledger);
            (result, ledger.take_events(), ledger.pool_status(), ledger.now())
        };

        if !records.is_empty() {
            self.publish(&records).await;
            self.ws_hub
                .broadcast_pool_status(services::PoolStatusUpdate { pool, timestamp: now });
        }

        result.map_err(ApiError::from)
    }

    /// 읽기 전용 조회 (이벤트 없음)
    pub async fn view<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&Ledger) -> R + Send,
        R: Send,
    {
        let ledger = self.ledger.lock().await;
        f(&ledger)
    }

    async fn publish(&self, records: &[EventRecord]) {
        for record in records {
            self.ws_hub.publish_event(record);

            if let Some(index) = &self.events {
                if let Err(e) = index.record(record).await {
                    tracing::warn!(seq = record.seq, kind = record.event.kind(), "event index write failed: {:?}", e);
                }
            }
        }
    }
}
