//! Account & Pool Endpoints
//!
//! Read-only views over the ledger, plus paginated history from the event index.
//! Views never mutate ledger state and never emit events.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use zk_credit_ledger::{Address, Amount, Loan, LoanState};

use crate::{
    db::HistoryEntry,
    error::ApiError,
    types::{amount_string, parse_address, PageQuery},
    AppState,
};

// ============ Response Types ============

/// 계정 조회 응답
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub address: Address,
    /// 원장에 예치된 담보
    #[serde(with = "amount_string")]
    pub collateral_balance: Amount,
    /// 자산 보관소 잔고 (지갑)
    #[serde(with = "amount_string")]
    pub wallet_balance: Amount,
    /// 표준 tier 최대 대출 (50%)
    #[serde(with = "amount_string")]
    pub max_borrow_standard: Amount,
    /// ZK tier 최대 대출 (120%)
    #[serde(with = "amount_string")]
    pub max_borrow_zk: Amount,
    pub loan_state: LoanState,
    /// 최근 대출 기록 (활성 또는 종료)
    pub loan: Option<Loan>,
    /// 원금 + 현재 시점까지의 이자
    #[serde(with = "amount_string")]
    pub total_debt: Amount,
    /// 한 번이라도 ZK 검증을 통과했는지
    pub zk_verified: bool,
}

/// 히스토리 응답
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub address: Address,
    pub events: Vec<HistoryEntry>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub has_next: bool,
}

/// 유동성 풀 응답
#[derive(Debug, Serialize)]
pub struct PoolResponse {
    pub pool_account: Address,
    #[serde(with = "amount_string")]
    pub total_deposits: Amount,
    #[serde(with = "amount_string")]
    pub total_liquidity: Amount,
    #[serde(with = "amount_string")]
    pub interest_collected: Amount,
    #[serde(with = "amount_string")]
    pub liquidation_swept: Amount,
    /// 풀 계정이 자산 보관소에 실제로 들고 있는 잔고
    #[serde(with = "amount_string")]
    pub vault_balance: Amount,
    pub min_credit_threshold: u64,
}

// ============ Handlers ============

/// GET /account/:address
///
/// # Response
///
/// ```json
/// {
///   "address": "0x…01",
///   "collateral_balance": "1000",
///   "max_borrow_standard": "500",
///   "max_borrow_zk": "1200",
///   "loan_state": "Active",
///   "loan": { "principal": "500", ... },
///   "total_debt": "503",
///   "zk_verified": false
/// }
/// ```
pub async fn get_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let address = parse_address(&address)?;
    let wallet_balance = state.asset.balance_of(&address);

    let response = state
        .view(move |ledger| -> Result<AccountResponse, ApiError> {
            Ok(AccountResponse {
                address,
                collateral_balance: ledger.collateral_balance(&address),
                wallet_balance,
                max_borrow_standard: ledger.max_borrow(&address, false)?,
                max_borrow_zk: ledger.max_borrow(&address, true)?,
                loan_state: ledger.loan_state(&address),
                loan: ledger.loan_details(&address),
                total_debt: ledger.total_debt(&address)?,
                zk_verified: ledger.is_verified(&address),
            })
        })
        .await?;

    Ok(Json(response))
}

/// GET /account/:address/history?page=1&limit=20
///
/// 이벤트 인덱스(DB)가 없으면 503
pub async fn get_account_history(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let address = parse_address(&address)?;
    let index = state
        .events
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("Event index".to_string()))?;

    let (page, limit) = query.resolve();
    let (rows, total) = index.history(&address, page, limit).await?;

    let total = total.max(0) as u64;
    let has_next = u64::from(page) * u64::from(limit) < total;

    Ok(Json(HistoryResponse {
        address,
        events: rows.into_iter().map(HistoryEntry::from).collect(),
        pagination: Pagination {
            page,
            limit,
            total,
            has_next,
        },
    }))
}

/// GET /pool
pub async fn get_pool(State(state): State<AppState>) -> Json<PoolResponse> {
    let vault_balance = state.asset.pool_balance();
    let (pool, pool_account, min_credit_threshold) = state
        .view(|ledger| (ledger.pool_status(), ledger.pool_account(), ledger.min_threshold()))
        .await;

    Json(PoolResponse {
        pool_account,
        total_deposits: pool.total_deposits,
        total_liquidity: pool.total_liquidity,
        interest_collected: pool.interest_collected,
        liquidation_swept: pool.liquidation_swept,
        vault_balance,
        min_credit_threshold,
    })
}
