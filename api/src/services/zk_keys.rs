//! ZK Key Material
//!
//! # Interview Q&A
//!
//! Q: 서버는 어떤 키를 들고 있는가?
//! A: 검증에는 Groth16 verifying key만 필요
//!    - ProofGateway에 VK 바이트를 넘기고, 검증은 `Groth16Verifier`가 담당
//!    - Proving key는 개발용 `/dev/credit-proof`에서만 사용
//!
//! Q: 키는 어디서 오는가?
//! A: 우선순위
//!    1. `PROVING_KEY_PATH`: PK 로드 → VK 유도 (prover 사용 가능)
//!    2. `VERIFYING_KEY_PATH`: VK만 로드 (prover 없음)
//!    3. 개발 환경: 인메모리 trusted setup (재시작하면 키가 바뀜)
//!
//! 프로덕션에서 3번은 허용되지 않는다 (`Config::from_env`에서 거부).

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rand::rngs::OsRng;
use zk_credit_circuits::EligibilityProver;
use zk_credit_ledger::VerifyingKey;

use crate::config::Config;

/// Gateway용 VK + (옵션) 개발용 prover
pub struct ZkKeys {
    pub verifying_key: VerifyingKey,
    pub prover: Option<Arc<EligibilityProver>>,
}

impl ZkKeys {
    /// 설정에 따라 키 로드 또는 생성
    pub fn load(config: &Config) -> Result<Self> {
        if let Some(path) = &config.proving_key_path {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read proving key: {}", path))?;
            let prover = EligibilityProver::from_proving_key_bytes(&bytes)
                .context("invalid proving key")?;
            tracing::info!(path = %path, "🔐 Proving key loaded");
            return Self::from_prover(prover);
        }

        if let Some(path) = &config.verifying_key_path {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read verifying key: {}", path))?;
            if bytes.is_empty() {
                bail!("verifying key file is empty: {}", path);
            }
            tracing::info!(path = %path, "🔐 Verifying key loaded (no prover)");
            return Ok(Self {
                verifying_key: VerifyingKey(bytes),
                prover: None,
            });
        }

        if config.is_production() {
            bail!("refusing in-memory trusted setup in production");
        }

        tracing::warn!("No key files configured, running in-memory trusted setup (development only)");
        let prover = EligibilityProver::setup(&mut OsRng).context("trusted setup failed")?;
        Self::from_prover(prover)
    }

    pub fn from_prover(prover: EligibilityProver) -> Result<Self> {
        let verifying_key = prover
            .verifying_key()
            .context("failed to serialize verifying key")?;
        Ok(Self {
            verifying_key,
            prover: Some(Arc::new(prover)),
        })
    }
}
