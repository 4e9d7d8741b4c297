//! Database Module (optional event index)
//!
//! # Interview Q&A
//!
//! Q: 원장이 메모리에 있는데 DB는 왜 필요한가?
//! A: 계정별 히스토리 조회용 인덱스
//!
//!    1. 원장 상태 자체는 DB에 의존하지 않음 (DATABASE_URL 없이 기동 가능)
//!    2. 커밋된 이벤트만 기록 → 롤백된 호출은 흔적이 없음
//!    3. JSONB payload: WebSocket으로 나간 이벤트와 동일한 형태 보존
//!    4. 인덱싱: (address, id) 기준 최신순 조회
//!
//! Q: 인덱스 저장이 실패하면?
//! A: 원장 호출은 이미 커밋됨 → 경고 로그만 남기고 응답은 성공
//!    - 인덱스는 파생 데이터, 원장이 source of truth
//!
//! Q: 커넥션 풀은 어떻게 관리하는가?
//! A: SQLx의 PgPool 사용
//!    - 최소/최대 커넥션 수 설정
//!    - 커넥션 재사용 (오버헤드 감소)
//!    - 타임아웃 처리

mod models;
mod repository;

pub use models::*;
pub use repository::EventRepository;
#[cfg(test)]
pub use repository::MemoryEventRepository;

use std::collections::BTreeSet;

use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;
use zk_credit_ledger::{Address, EventRecord};

/// 데이터베이스 연결 및 쿼리 담당
pub struct Database {
    pool: PgPool,
    /// 이번 프로세스의 원장 식별자 (seq는 재시작마다 0부터)
    run_id: Uuid,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 10 (트래픽에 따라 조정)
    /// - min_connections: 1 (idle 시 최소 유지)
    /// - acquire_timeout: 3초 (커넥션 획득 대기)
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(database_url)
            .await?;

        let run_id = Uuid::new_v4();
        tracing::info!(run_id = %run_id, "event index run registered");

        Ok(Self { pool, run_id })
    }

    /// 마이그레이션 실행
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// 이벤트 저장 (관련 계정마다 한 행)
    ///
    /// 같은 (run_id, seq, address)는 한 번만 기록된다.
    pub async fn insert_event(&self, record: &EventRecord) -> Result<()> {
        let row = EventRow::from_record(record)?;
        let accounts: BTreeSet<Address> = record.event.accounts().into_iter().collect();

        let mut tx = self.pool.begin().await?;
        for account in accounts {
            sqlx::query(
                r#"
                INSERT INTO ledger_events (
                    run_id, seq, address, event_type, amount, payload, ledger_time
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (run_id, seq, address) DO NOTHING
                "#
            )
            .bind(self.run_id)
            .bind(row.seq)
            .bind(account.to_string())
            .bind(&row.event_type)
            .bind(&row.amount)
            .bind(&row.payload)
            .bind(row.ledger_time)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    /// 계정 히스토리 조회 (페이지네이션, 최신순, 이전 실행 포함)
    ///
    /// `page`는 1부터 시작한다.
    pub async fn get_history(
        &self,
        address: &Address,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<EventRow>, i64)> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);

        // 이벤트 조회
        let events = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT
                seq,
                event_type,
                amount,
                payload,
                ledger_time,
                recorded_at
            FROM ledger_events
            WHERE address = $1
            ORDER BY id DESC
            LIMIT $2 OFFSET $3
            "#
        )
        .bind(address.to_string())
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        // 전체 개수
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM ledger_events WHERE address = $1"
        )
        .bind(address.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok((events, count.0))
    }
}
