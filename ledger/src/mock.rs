//! Test doubles: manual clock, recording asset, verifier stubs.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::asset::AssetTransfer;
use crate::clock::Clock;
use crate::gateway::PairingVerifier;
use crate::types::{Address, Amount, Nullifier, Proof, PublicInputs, Timestamp, VerifyingKey};

// ============ Clock ============

/// Clock advanced by hand; clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn at(now: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

// ============ Asset ============

/// Executed transfer as seen by the asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCall {
    Transfer { to: Address, amount: Amount },
    TransferFrom { from: Address, to: Address, amount: Amount },
}

/// In-memory token book bound to one pool account.
///
/// Every successful call moves balances and is recorded. `fail_next` makes the next
/// call report failure; `on_transfer` runs after every successful call, before it
/// returns to the ledger.
pub struct MockAsset {
    pool_account: Address,
    balances: RefCell<HashMap<Address, Amount>>,
    calls: RefCell<Vec<AssetCall>>,
    fail_next: Cell<bool>,
    on_transfer: RefCell<Option<Box<dyn Fn()>>>,
}

impl MockAsset {
    pub fn new(pool_account: Address) -> Rc<Self> {
        Rc::new(Self {
            pool_account,
            balances: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            fail_next: Cell::new(false),
            on_transfer: RefCell::new(None),
        })
    }

    pub fn mint(&self, to: &Address, amount: Amount) {
        *self.balances.borrow_mut().entry(*to).or_insert(0) += amount;
    }

    pub fn balance_of(&self, who: &Address) -> Amount {
        self.balances.borrow().get(who).copied().unwrap_or(0)
    }

    pub fn pool_balance(&self) -> Amount {
        self.balance_of(&self.pool_account)
    }

    pub fn calls(&self) -> Vec<AssetCall> {
        self.calls.borrow().clone()
    }

    pub fn fail_next(&self) {
        self.fail_next.set(true);
    }

    pub fn set_on_transfer(&self, hook: impl Fn() + 'static) {
        *self.on_transfer.borrow_mut() = Some(Box::new(hook));
    }

    fn move_funds(&self, from: &Address, to: &Address, amount: Amount, call: AssetCall) -> bool {
        if self.fail_next.replace(false) {
            return false;
        }
        {
            let mut balances = self.balances.borrow_mut();
            let available = balances.get(from).copied().unwrap_or(0);
            if available < amount {
                return false;
            }
            balances.insert(*from, available - amount);
            *balances.entry(*to).or_insert(0) += amount;
        }
        self.calls.borrow_mut().push(call);

        if let Some(hook) = self.on_transfer.borrow().as_ref() {
            hook();
        }
        true
    }
}

impl AssetTransfer for MockAsset {
    fn transfer(&self, to: &Address, amount: Amount) -> bool {
        let from = self.pool_account;
        self.move_funds(&from, to, amount, AssetCall::Transfer { to: *to, amount })
    }

    fn transfer_from(&self, from: &Address, to: &Address, amount: Amount) -> bool {
        self.move_funds(
            from,
            to,
            amount,
            AssetCall::TransferFrom {
                from: *from,
                to: *to,
                amount,
            },
        )
    }
}

// ============ Verifier ============

pub const VALID_PROOF: &[u8] = b"valid-credit-proof";

pub fn valid_proof() -> Proof {
    Proof(VALID_PROOF.to_vec())
}

pub fn invalid_proof() -> Proof {
    Proof(b"forged".to_vec())
}

pub fn dev_key() -> VerifyingKey {
    VerifyingKey(b"dev-vk".to_vec())
}

pub fn inputs_for(subject: Address, threshold: u64, nullifier: u8) -> PublicInputs {
    PublicInputs {
        threshold,
        nullifier_hash: Nullifier::new([nullifier; 32]),
        subject,
    }
}

/// Accepts exactly [`VALID_PROOF`] and counts pairing calls.
#[derive(Debug, Default)]
pub struct MockVerifier {
    calls: AtomicUsize,
}

impl MockVerifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PairingVerifier for MockVerifier {
    fn verify_pairing(&self, _key: &VerifyingKey, proof: &Proof, _inputs: &PublicInputs) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        proof.0 == VALID_PROOF
    }
}
