//! Common Types Module
//!
//! 원장 전반에서 사용되는 공통 타입 정의
//!
//! Identities and hashes travel as `0x`-prefixed lowercase hex on the wire and as
//! fixed-size byte arrays inside the ledger.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LedgerError;

/// 금액 (smallest asset unit)
pub type Amount = u128;

/// Unix timestamp (seconds)
pub type Timestamp = u64;

/// 사용자/컨트랙트 식별자 (20 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// Null identity. Never a valid user, admin or authority.
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Address whose last byte is `n`. Handy for fixtures.
    pub const fn from_low_u8(n: u8) -> Self {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<20>(s)
            .map(Self)
            .ok_or_else(|| LedgerError::Validation(format!("invalid address: {}", s)))
    }
}

/// Nullifier hash (32 bytes) = Hash(secret, subject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nullifier([u8; 32]);

impl Nullifier {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Nullifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Nullifier {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<32>(s)
            .map(Self)
            .ok_or_else(|| LedgerError::Validation(format!("invalid nullifier: {}", s)))
    }
}

fn decode_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    if raw.len() != N * 2 {
        return None;
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(raw, &mut out).ok()?;
    Some(out)
}

macro_rules! hex_string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

hex_string_serde!(Address);
hex_string_serde!(Nullifier);

/// `Amount` as a decimal string (`"1000"`).
///
/// u128 values do not survive JSON number handling in most clients.
pub mod amount_string {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Opaque proof bytes produced by the off-protocol prover
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Proof(pub Vec<u8>);

/// Opaque verifying key bytes for the pairing predicate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerifyingKey(pub Vec<u8>);

impl VerifyingKey {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Eligibility proof의 public inputs
///
/// The private witness `(credit_score, secret)` never reaches the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    /// 최소 신용 점수 (credit_score >= threshold)
    pub threshold: u64,
    /// 단일 사용 태그
    pub nullifier_hash: Nullifier,
    /// 증명 대상 사용자
    pub subject: Address,
}

/// (proof, public inputs) 한 쌍
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofSubmission {
    pub proof: Proof,
    pub inputs: PublicInputs,
}

impl ProofSubmission {
    pub fn new(proof: Proof, inputs: PublicInputs) -> Self {
        Self { proof, inputs }
    }
}
