//! Common Types Module
//!
//! 애플리케이션 전반에서 사용되는 공통 타입 정의
//!
//! - 금액: 10진수 문자열 (`"1000"`), u128 정밀도 유지
//! - 주소/nullifier: `0x` hex (ledger 타입 그대로 사용)
//! - proof/verifying key: `0x` hex 바이트열

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zk_credit_ledger::{Address, Nullifier};

use crate::error::ApiError;

pub use zk_credit_ledger::types::amount_string;

/// 페이지당 기본 항목 수
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// 페이지당 최대 항목 수
pub const MAX_PAGE_LIMIT: u32 = 100;

/// `0x` hex로 주고받는 바이트열 (proof, verifying key)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HexBytes(pub Vec<u8>);

impl HexBytes {
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Serialize for HexBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("0x{}", hex::encode(&self.0)))
    }
}

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(raw)
            .map(HexBytes)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {}", e)))
    }
}

/// 히스토리 페이지네이션 쿼리 (`?page=1&limit=20`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// (page ≥ 1, 1 ≤ limit ≤ 100)
    pub fn resolve(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        (page, limit)
    }
}

/// Path 파라미터 → Address
pub fn parse_address(raw: &str) -> Result<Address, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::ValidationError(format!("Invalid address: {}", raw)))
}

/// Path 파라미터 → Nullifier
pub fn parse_nullifier(raw: &str) -> Result<Nullifier, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::ValidationError(format!("Invalid nullifier hash: {}", raw)))
}
