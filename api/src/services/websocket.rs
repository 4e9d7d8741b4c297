//! WebSocket Service
//!
//! Real-time ledger streaming via WebSocket.
//!
//! # Features
//! - Committed ledger events (all, or per account)
//! - Pool status after every commit
//!
//! Rolled-back calls never reach the hub; only records taken from the ledger after a
//! successful commit are published.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use zk_credit_ledger::{Address, EventRecord, LiquidityPool, Timestamp};

/// 브로드캐스트 버퍼 크기 (느린 클라이언트는 Lagged로 건너뜀)
const CHANNEL_CAPACITY: usize = 1000;

/// WebSocket 메시지 타입 (송신)
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    /// 커밋된 원장 이벤트
    Event(EventRecord),
    /// Pool 상태 업데이트
    PoolStatus(PoolStatusUpdate),
    /// 에러
    Error(WsError),
    /// 구독 확인
    Subscribed(SubscriptionConfirm),
    /// Heartbeat
    Pong,
}

/// Pool 상태 업데이트
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatusUpdate {
    #[serde(flatten)]
    pub pool: LiquidityPool,
    pub timestamp: Timestamp,
}

/// WebSocket 에러
#[derive(Debug, Clone, Serialize)]
pub struct WsError {
    pub code: i32,
    pub message: String,
}

/// 구독 확인
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionConfirm {
    pub channel: String,
    pub subscribed: bool,
}

/// 구독 채널
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Channel {
    /// 전체 Pool 상태
    PoolStatus,
    /// 특정 계정의 이벤트
    Account(Address),
    /// 모든 이벤트
    AllEvents,
}

impl Channel {
    /// `pool_status` | `all_events` | `account:0x…`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pool_status" => Some(Channel::PoolStatus),
            "all_events" => Some(Channel::AllEvents),
            _ => raw
                .strip_prefix("account:")
                .and_then(|addr| addr.parse().ok())
                .map(Channel::Account),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::PoolStatus => write!(f, "pool_status"),
            Channel::Account(addr) => write!(f, "account:{}", addr),
            Channel::AllEvents => write!(f, "all_events"),
        }
    }
}

/// 연결별 구독 집합
#[derive(Debug, Clone)]
pub struct Subscriptions(HashSet<Channel>);

impl Subscriptions {
    pub fn new(channels: impl IntoIterator<Item = Channel>) -> Self {
        Self(channels.into_iter().collect())
    }

    /// 새 연결 기본값: 모든 이벤트 + Pool 상태
    pub fn all() -> Self {
        Self::new([Channel::AllEvents, Channel::PoolStatus])
    }

    pub fn insert(&mut self, channel: Channel) -> bool {
        self.0.insert(channel)
    }

    pub fn remove(&mut self, channel: &Channel) -> bool {
        self.0.remove(channel)
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.0.iter().copied().collect()
    }

    /// 이 연결에 전달할 메시지인지
    pub fn accepts(&self, message: &WsMessage) -> bool {
        match message {
            WsMessage::Event(record) => {
                self.0.contains(&Channel::AllEvents)
                    || record
                        .event
                        .accounts()
                        .into_iter()
                        .any(|account| self.0.contains(&Channel::Account(account)))
            }
            WsMessage::PoolStatus(_) => self.0.contains(&Channel::PoolStatus),
            _ => true,
        }
    }
}

/// 연결 상태
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub id: String,
    pub connected_at: u64,
    pub subscriptions: Vec<Channel>,
    pub last_activity: u64,
}

/// WebSocket Hub
///
/// 모든 WebSocket 연결과 메시지 브로드캐스팅을 관리
///
/// # Architecture
/// ```text
/// ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
/// │ LendingPool  │────▶│              │────▶│  Client 1   │ (all_events)
/// │ take_events  │     │   WsHub      │     ├─────────────┤
/// ├──────────────┤     │  (broadcast) │────▶│  Client 2   │ (account:0x…)
/// │ pool_status  │────▶│              │     ├─────────────┤
/// └──────────────┘     └──────────────┘────▶│  Client 3   │ (pool_status)
///                                           └─────────────┘
/// ```
///
/// 필터링은 연결 쪽 `Subscriptions`에서 수행한다.
pub struct WsHub {
    tx: broadcast::Sender<WsMessage>,
    /// 연결 정보
    connections: Arc<RwLock<HashMap<String, ConnectionInfo>>>,
}

impl WsHub {
    /// 새 WsHub 생성
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self {
            tx,
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 커밋된 이벤트 발행
    pub fn publish_event(&self, record: &EventRecord) {
        // 구독자가 없으면 send가 Err를 돌려준다 (무시)
        let _ = self.tx.send(WsMessage::Event(record.clone()));
    }

    /// Pool 상태 브로드캐스트
    pub fn broadcast_pool_status(&self, update: PoolStatusUpdate) {
        let _ = self.tx.send(WsMessage::PoolStatus(update));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.tx.subscribe()
    }

    /// 연결 등록
    pub async fn register_connection(&self, info: ConnectionInfo) {
        let mut conns = self.connections.write().await;
        conns.insert(info.id.clone(), info);
    }

    /// 구독 목록 갱신
    pub async fn update_subscriptions(&self, id: &str, subscriptions: &Subscriptions, now: u64) {
        let mut conns = self.connections.write().await;
        if let Some(info) = conns.get_mut(id) {
            info.subscriptions = subscriptions.channels();
            info.last_activity = now;
        }
    }

    /// 연결 해제
    pub async fn unregister_connection(&self, id: &str) {
        let mut conns = self.connections.write().await;
        conns.remove(id);
    }

    /// 활성 연결 수
    pub async fn active_connections(&self) -> usize {
        let conns = self.connections.read().await;
        conns.len()
    }
}

impl Default for WsHub {
    fn default() -> Self {
        Self::new()
    }
}

/// WebSocket 클라이언트 메시지 (수신)
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action")]
pub enum ClientMessage {
    /// 채널 구독
    Subscribe { channel: String },
    /// 구독 취소
    Unsubscribe { channel: String },
    /// Ping (keepalive)
    Ping,
}

/// 클라이언트 메시지 파싱
pub fn parse_client_message(data: &str) -> Result<ClientMessage> {
    serde_json::from_str(data).map_err(Into::into)
}

/// 서버 메시지 직렬화
pub fn serialize_message(msg: &WsMessage) -> Result<String> {
    serde_json::to_string(msg).map_err(Into::into)
}
