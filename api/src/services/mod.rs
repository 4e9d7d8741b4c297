//! Services Module
//!
//! 원장 주변 서비스 레이어
//!
//! # Services
//! - `InMemoryAsset`: 풀이 사용하는 자산 보관소 (`AssetTransfer`)
//! - `ZkKeys`: Groth16 키 로드/생성
//! - `WsHub`: WebSocket 실시간 이벤트

mod asset;
mod zk_keys;
pub mod websocket;

pub use asset::InMemoryAsset;
pub use zk_keys::ZkKeys;
pub use websocket::{Channel, ConnectionInfo, PoolStatusUpdate, Subscriptions, WsHub, WsMessage};
