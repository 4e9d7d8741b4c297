//! Repository Pattern Implementation
//!
//! # Interview Q&A
//!
//! Q: Repository 패턴이란?
//! A: 데이터 접근 로직을 추상화하는 패턴
//!
//!    장점:
//!    - 비즈니스 로직과 데이터 접근 분리
//!    - 테스트 시 Mock 구현 쉬움 (DB 없이 히스토리 라우트 테스트)
//!    - DB 교체 시 영향 최소화
//!
//!    ```text
//!    AppState.events: Option<Arc<dyn EventRepository>>
//!        ├── Database               (PostgreSQL, DATABASE_URL 설정 시)
//!        └── MemoryEventRepository  (테스트)
//!    ```

use async_trait::async_trait;
use anyhow::Result;
use zk_credit_ledger::{Address, EventRecord};

use super::models::EventRow;
use super::Database;

/// Event index 인터페이스
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// 커밋된 이벤트 기록
    async fn record(&self, record: &EventRecord) -> Result<()>;

    /// 계정 히스토리 (1-based page, 최신순) + 전체 개수
    async fn history(&self, address: &Address, page: u32, limit: u32) -> Result<(Vec<EventRow>, i64)>;

    async fn health_check(&self) -> Result<()>;
}

#[async_trait]
impl EventRepository for Database {
    async fn record(&self, record: &EventRecord) -> Result<()> {
        self.insert_event(record).await
    }

    async fn history(&self, address: &Address, page: u32, limit: u32) -> Result<(Vec<EventRow>, i64)> {
        self.get_history(address, page, limit).await
    }

    async fn health_check(&self) -> Result<()> {
        Database::health_check(self).await
    }
}

/// 테스트용 인메모리 구현
#[cfg(test)]
#[derive(Default)]
pub struct MemoryEventRepository {
    rows: tokio::sync::RwLock<Vec<(Address, EventRow)>>,
}

#[cfg(test)]
#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn record(&self, record: &EventRecord) -> Result<()> {
        let row = EventRow::from_record(record)?;
        let mut rows = self.rows.write().await;
        let mut accounts = record.event.accounts();
        accounts.dedup();
        for account in accounts {
            rows.push((account, row.clone()));
        }
        Ok(())
    }

    async fn history(&self, address: &Address, page: u32, limit: u32) -> Result<(Vec<EventRow>, i64)> {
        let rows = self.rows.read().await;
        let matching: Vec<&EventRow> = rows
            .iter()
            .rev()
            .filter(|(account, _)| account == address)
            .map(|(_, row)| row)
            .collect();

        let offset = (page.saturating_sub(1) as usize) * limit as usize;
        let page_rows = matching
            .iter()
            .skip(offset)
            .take(limit as usize)
            .map(|row| (*row).clone())
            .collect();

        Ok((page_rows, matching.len() as i64))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
