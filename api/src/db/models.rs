//! Database Models
//!
//! Indexed ledger events for account history queries.
//! Amounts stay decimal strings end to end; the JSON payload is the serialized
//! `LedgerEvent` exactly as it was published over WebSocket.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use zk_credit_ledger::EventRecord;

/// 인덱싱된 이벤트 한 행
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    /// 원장 이벤트 순번
    pub seq: i64,

    /// 이벤트 타입
    /// - deposit / withdraw / borrow / repay / accrue / liquidate
    /// - proof_verified / verifying_key_updated
    pub event_type: String,

    /// 대표 금액 (10진수 문자열)
    pub amount: Option<String>,

    /// `{"type": ..., "data": {...}}`
    pub payload: Json<serde_json::Value>,

    /// 원장 시각 (unix seconds)
    pub ledger_time: i64,

    /// 인덱싱 시각
    pub recorded_at: DateTime<Utc>,
}

impl EventRow {
    /// 원장 레코드 → 행 (계정 컬럼은 저장 시 채움)
    pub fn from_record(record: &EventRecord) -> anyhow::Result<Self> {
        Ok(Self {
            seq: i64::try_from(record.seq)?,
            event_type: record.event.kind().to_string(),
            amount: record.event.amount().map(|amount| amount.to_string()),
            payload: Json(serde_json::to_value(&record.event)?),
            ledger_time: i64::try_from(record.timestamp)?,
            recorded_at: Utc::now(),
        })
    }
}

/// 히스토리 API 응답 항목
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub seq: i64,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    pub event: serde_json::Value,
    pub timestamp: i64,
    pub recorded_at: String,
}

impl From<EventRow> for HistoryEntry {
    fn from(row: EventRow) -> Self {
        Self {
            seq: row.seq,
            event_type: row.event_type,
            amount: row.amount,
            event: row.payload.0,
            timestamp: row.ledger_time,
            recorded_at: row.recorded_at.to_rfc3339(),
        }
    }
}
