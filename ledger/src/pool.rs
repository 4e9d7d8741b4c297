//! Lending Pool facade
//!
//! The single public surface of the ledger. Owns the three stateful components, the
//! policy engine, the asset capability and the clock.
//!
//! # Transaction
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  guard.enter()            ── nested entry → State(Reentrant)    │
//! │  now = clock.now()        ── read once                          │
//! │  working = state.clone()                                        │
//! │  op(working) → (transfer?, events) ── Err → discard working     │
//! │  state = working          ── commit                             │
//! │  transfer.execute()       ── at most one per call               │
//! │       false → state = previous, Err(TransferFailure)            │
//! │  events.extend(...)                                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! State is committed before the transfer runs, so a transfer callback that reads the
//! pool sees post-mutation state. Views never take the guard.
//!
//! Every call settles with at most one asset movement (repay pulls exactly the debt),
//! so a failed transfer leaves nothing half-applied on the asset side.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use crate::asset::{AssetTransfer, Transfer};
use crate::clock::Clock;
use crate::collateral::{CollateralManager, LiquidityPool};
use crate::error::{LedgerError, LedgerResult};
use crate::events::{EventRecord, LedgerEvent};
use crate::gateway::{GatewayConfig, PairingVerifier, ProofGateway};
use crate::guard::ReentrancyGuard;
use crate::loan::{InterestAccrual, Loan, LoanLedger, LoanState};
use crate::policy::{BorrowPolicyEngine, BorrowReceipt, LiquidationReceipt, RepayReceipt};
use crate::types::{Address, Amount, Nullifier, Proof, ProofSubmission, PublicInputs, Timestamp, VerifyingKey};

/// Construction parameters
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Account holding pooled funds; also the LoanLedger authority
    pub pool_account: Address,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone)]
struct LedgerState {
    collateral: CollateralManager,
    loans: LoanLedger,
    gateway: ProofGateway,
}

/// Working context handed to an operation
struct Tx<'a> {
    state: &'a mut LedgerState,
    engine: &'a BorrowPolicyEngine,
    now: Timestamp,
    transfer: Option<Transfer>,
    events: Vec<LedgerEvent>,
}

impl Tx<'_> {
    fn settle(&mut self, transfer: Transfer) {
        debug_assert!(self.transfer.is_none(), "one asset movement per call");
        self.transfer = Some(transfer);
    }
}

pub struct LendingPool<A, C> {
    state: RefCell<LedgerState>,
    engine: BorrowPolicyEngine,
    asset: A,
    clock: C,
    guard: ReentrancyGuard,
    pool_account: Address,
    events: RefCell<Vec<EventRecord>>,
    next_seq: Cell<u64>,
}

impl<A: AssetTransfer, C: Clock> LendingPool<A, C> {
    pub fn new(
        config: LedgerConfig,
        asset: A,
        clock: C,
        verifier: Arc<dyn PairingVerifier>,
    ) -> LedgerResult<Self> {
        if config.pool_account.is_zero() {
            return Err(LedgerError::Validation("null pool account".to_string()));
        }

        let gateway = ProofGateway::new(config.gateway, verifier)?;
        let mut loans = LoanLedger::new();
        let authority = loans.bind(config.pool_account)?;

        tracing::info!(
            pool_account = %config.pool_account,
            admin = %gateway.admin(),
            min_threshold = gateway.min_threshold(),
            "lending pool initialized"
        );

        Ok(Self {
            state: RefCell::new(LedgerState {
                collateral: CollateralManager::new(),
                loans,
                gateway,
            }),
            engine: BorrowPolicyEngine::new(authority),
            asset,
            clock,
            guard: ReentrancyGuard::new(),
            pool_account: config.pool_account,
            events: RefCell::new(Vec::new()),
            next_seq: Cell::new(0),
        })
    }

    // ============ Mutating entry points ============

    /// 담보 예치: pulls `amount` from `caller` into the pool.
    pub fn deposit(&self, caller: &Address, amount: Amount) -> LedgerResult<()> {
        self.transact("deposit", caller, |tx| {
            tx.state.collateral.deposit(caller, amount)?;
            tx.settle(Transfer::In { from: *caller, amount });
            tx.events.push(LedgerEvent::Deposited { user: *caller, amount });
            Ok(())
        })
    }

    /// 담보 출금
    pub fn withdraw(&self, caller: &Address, amount: Amount) -> LedgerResult<()> {
        self.transact("withdraw", caller, |tx| {
            let min_collateral = tx.engine.required_collateral(&tx.state.loans, caller)?;
            tx.state.collateral.withdraw(caller, amount, min_collateral)?;
            tx.settle(Transfer::Out { to: *caller, amount });
            tx.events.push(LedgerEvent::Withdrawn { user: *caller, amount });
            Ok(())
        })
    }

    /// Standard-tier borrow (50% LTV). Never touches the proof gateway.
    pub fn borrow(&self, caller: &Address, amount: Amount) -> LedgerResult<BorrowReceipt> {
        self.transact("borrow", caller, |tx| Self::borrow_in(tx, caller, amount, None))
    }

    /// ZK-tier borrow (120% LTV) backed by a credit-eligibility proof for `caller`.
    pub fn borrow_with_proof(
        &self,
        caller: &Address,
        amount: Amount,
        proof: Proof,
        inputs: PublicInputs,
    ) -> LedgerResult<BorrowReceipt> {
        let submission = ProofSubmission::new(proof, inputs);
        self.transact("borrow_with_proof", caller, |tx| {
            Self::borrow_in(tx, caller, amount, Some(&submission))
        })
    }

    fn borrow_in(
        tx: &mut Tx<'_>,
        caller: &Address,
        amount: Amount,
        proof: Option<&ProofSubmission>,
    ) -> LedgerResult<BorrowReceipt> {
        let LedgerState { collateral, loans, gateway } = &mut *tx.state;
        let receipt = tx
            .engine
            .borrow(collateral, loans, gateway, caller, amount, proof, tx.now)?;

        if let Some(submission) = proof {
            tx.events.push(LedgerEvent::ProofVerified {
                subject: submission.inputs.subject,
                nullifier: submission.inputs.nullifier_hash,
            });
        }
        tx.settle(receipt.transfer);
        tx.events.push(LedgerEvent::Borrowed {
            user: *caller,
            principal: receipt.principal,
            collateral_snapshot: receipt.collateral_snapshot,
            zk_verified: receipt.zk_verified,
        });
        Ok(receipt)
    }

    /// 전액 상환. Accepts any `amount >= debt` but pulls exactly the debt.
    pub fn repay(&self, caller: &Address, amount: Amount) -> LedgerResult<RepayReceipt> {
        self.transact("repay", caller, |tx| {
            let receipt =
                tx.engine
                    .repay(&mut tx.state.collateral, &mut tx.state.loans, caller, amount, tx.now)?;
            tx.settle(receipt.transfer);
            tx.events.push(LedgerEvent::Repaid {
                user: *caller,
                paid: receipt.paid,
                principal: receipt.principal,
                interest: receipt.interest,
                refund: receipt.refund,
            });
            Ok(receipt)
        })
    }

    pub fn liquidate(&self, caller: &Address, borrower: &Address) -> LedgerResult<LiquidationReceipt> {
        self.transact("liquidate", caller, |tx| {
            let receipt = tx.engine.liquidate(
                &mut tx.state.collateral,
                &mut tx.state.loans,
                caller,
                borrower,
                tx.now,
            )?;
            if let Some(transfer) = receipt.transfer {
                tx.settle(transfer);
            }
            tx.events.push(LedgerEvent::Liquidated {
                borrower: *borrower,
                liquidator: *caller,
                principal: receipt.principal,
                reward: receipt.seizure.reward,
                seized: receipt.seizure.seized,
                swept_to_pool: receipt.seizure.remainder,
            });
            Ok(receipt)
        })
    }

    /// Permissionless interest "poke" for `user`'s active loan.
    pub fn accrue_interest(&self, caller: &Address, user: &Address) -> LedgerResult<Option<InterestAccrual>> {
        self.transact("accrue_interest", caller, |tx| {
            let accrual = tx.engine.accrue_interest(&mut tx.state.loans, user, tx.now)?;
            if let Some(InterestAccrual { delta, total }) = accrual {
                tx.events.push(LedgerEvent::InterestAccrued { user: *user, delta, total });
            }
            Ok(accrual)
        })
    }

    /// Per-entry verification. The outer error is reserved for call-level failures
    /// (re-entrancy); each entry carries its own result.
    pub fn batch_verify(
        &self,
        caller: &Address,
        submissions: &[ProofSubmission],
    ) -> LedgerResult<Vec<LedgerResult<bool>>> {
        self.transact("batch_verify", caller, |tx| {
            let results = tx.state.gateway.batch_verify(submissions);
            for (submission, result) in submissions.iter().zip(&results) {
                if let Ok(true) = result {
                    tx.events.push(LedgerEvent::ProofVerified {
                        subject: submission.inputs.subject,
                        nullifier: submission.inputs.nullifier_hash,
                    });
                }
            }
            Ok(results)
        })
    }

    pub fn update_verifying_key(&self, caller: &Address, key: VerifyingKey) -> LedgerResult<()> {
        self.transact("update_verifying_key", caller, |tx| {
            tx.state.gateway.update_verifying_key(caller, key)?;
            tx.events.push(LedgerEvent::VerifyingKeyUpdated { admin: *caller });
            Ok(())
        })
    }

    // ============ Views ============

    pub fn collateral_balance(&self, user: &Address) -> Amount {
        self.state.borrow().collateral.balance_of(user)
    }

    pub fn max_borrow(&self, user: &Address, zk_verified: bool) -> LedgerResult<Amount> {
        self.engine
            .max_borrow(&self.state.borrow().collateral, user, zk_verified)
    }

    /// Latest loan record, active or closed.
    pub fn loan_details(&self, user: &Address) -> Option<Loan> {
        self.state.borrow().loans.loan(user).copied()
    }

    pub fn loan_state(&self, user: &Address) -> LoanState {
        self.state.borrow().loans.state(user)
    }

    pub fn total_debt(&self, user: &Address) -> LedgerResult<Amount> {
        self.state.borrow().loans.total_debt(user, self.clock.now())
    }

    pub fn has_active_loan(&self, user: &Address) -> bool {
        self.state.borrow().loans.has_active_loan(user)
    }

    pub fn is_verified(&self, user: &Address) -> bool {
        self.state.borrow().gateway.is_verified(user)
    }

    pub fn is_nullifier_used(&self, nullifier: &Nullifier) -> bool {
        self.state.borrow().gateway.is_nullifier_used(nullifier)
    }

    pub fn pool_status(&self) -> LiquidityPool {
        self.state.borrow().collateral.pool().clone()
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.state.borrow().gateway.verifying_key().clone()
    }

    pub fn min_threshold(&self) -> u64 {
        self.state.borrow().gateway.min_threshold()
    }

    pub fn gateway_admin(&self) -> Address {
        self.state.borrow().gateway.admin()
    }

    pub fn pool_account(&self) -> Address {
        self.pool_account
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Drains committed events in commit order.
    pub fn take_events(&self) -> Vec<EventRecord> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    // ============ Transaction boundary ============

    fn transact<R>(
        &self,
        operation: &'static str,
        caller: &Address,
        op: impl FnOnce(&mut Tx<'_>) -> LedgerResult<R>,
    ) -> LedgerResult<R> {
        let _entered = match self.guard.enter() {
            Ok(entered) => entered,
            Err(err) => {
                tracing::warn!(operation, caller = %caller, error = %err, "re-entrant call rejected");
                return Err(err);
            }
        };

        let now = self.clock.now();
        let mut working = self.state.borrow().clone();
        let mut tx = Tx {
            state: &mut working,
            engine: &self.engine,
            now,
            transfer: None,
            events: Vec::new(),
        };

        let result = op(&mut tx);
        let Tx { transfer, events, .. } = tx;
        let value = match result {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(operation, caller = %caller, error = %err, "ledger call rejected");
                return Err(err);
            }
        };

        let previous = self.state.replace(working);

        if let Some(transfer) = transfer.filter(|t| t.amount() > 0) {
            if let Err(err) = transfer.execute(&self.asset, &self.pool_account) {
                self.state.replace(previous);
                tracing::warn!(operation, caller = %caller, error = %err, "transfer failed, state rolled back");
                return Err(err);
            }
        }

        tracing::info!(
            operation,
            caller = %caller,
            transfer = ?transfer,
            events = events.len(),
            "ledger call committed"
        );
        self.record(now, events);
        Ok(value)
    }

    fn record(&self, timestamp: Timestamp, events: Vec<LedgerEvent>) {
        let mut log = self.events.borrow_mut();
        for event in events {
            let seq = self.next_seq.get();
            self.next_seq.set(seq + 1);
            log.push(EventRecord { seq, timestamp, event });
        }
    }
}
