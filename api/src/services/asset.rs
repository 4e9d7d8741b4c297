//! In-memory Asset Vault
//!
//! 서버 프로세스 안에서 fungible asset 잔고를 관리하는 `AssetTransfer` 구현.
//! 실제 토큰 연동 대신 개발/데모 환경에서 사용하며, 잔고는 `/dev/faucet`으로 발행한다.
//!
//! 잔고 부족이나 overflow는 `false`로 응답하고, 원장은 이를 `TransferFailure`로
//! 처리하여 호출 전체를 되돌린다.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use zk_credit_ledger::{Address, Amount, AssetTransfer};

pub struct InMemoryAsset {
    /// 풀 자산 보관 계정
    pool_account: Address,
    balances: Mutex<HashMap<Address, Amount>>,
}

impl InMemoryAsset {
    pub fn new(pool_account: Address) -> Self {
        Self {
            pool_account,
            balances: Mutex::new(HashMap::new()),
        }
    }

    pub fn pool_account(&self) -> Address {
        self.pool_account
    }

    /// 잔고 발행 (faucet, 초기 유동성)
    pub fn mint(&self, to: &Address, amount: Amount) -> Option<Amount> {
        let mut balances = self.lock();
        let balance = balances.entry(*to).or_insert(0);
        *balance = balance.checked_add(amount)?;
        Some(*balance)
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.lock().get(account).copied().unwrap_or(0)
    }

    /// 풀 계정이 실제로 보유한 자산
    pub fn pool_balance(&self) -> Amount {
        self.balance_of(&self.pool_account)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Address, Amount>> {
        // 잔고 갱신은 검증 후 한 번에 쓰므로 poison 상태에서도 일관성이 유지된다
        self.balances
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn move_funds(&self, from: &Address, to: &Address, amount: Amount) -> bool {
        if to.is_zero() {
            return false;
        }

        let mut balances = self.lock();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            tracing::debug!(from = %from, available = %available, amount = %amount, "asset transfer refused: balance");
            return false;
        }
        if from == to {
            return true;
        }

        let credited = match balances.get(to).copied().unwrap_or(0).checked_add(amount) {
            Some(value) => value,
            None => return false,
        };
        balances.insert(*from, available - amount);
        balances.insert(*to, credited);
        true
    }
}

impl AssetTransfer for InMemoryAsset {
    fn transfer(&self, to: &Address, amount: Amount) -> bool {
        self.move_funds(&self.pool_account, to, amount)
    }

    fn transfer_from(&self, from: &Address, to: &Address, amount: Amount) -> bool {
        self.move_funds(from, to, amount)
    }
}
