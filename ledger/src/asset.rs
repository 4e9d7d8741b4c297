//! Asset transfer capability
//!
//! The fungible asset itself lives outside the ledger. The ledger only asks it to move
//! funds and treats a `false` answer as [`LedgerError::TransferFailure`].

use std::rc::Rc;
use std::sync::Arc;

use crate::error::LedgerError;
use crate::types::{Address, Amount};

/// Abstract fungible-asset capability bound to the pool's holding account
pub trait AssetTransfer {
    /// pool account → `to`
    fn transfer(&self, to: &Address, amount: Amount) -> bool;

    /// `from` → `to` (allowance is the asset's concern)
    fn transfer_from(&self, from: &Address, to: &Address, amount: Amount) -> bool;
}

impl<T: AssetTransfer + ?Sized> AssetTransfer for Arc<T> {
    fn transfer(&self, to: &Address, amount: Amount) -> bool {
        (**self).transfer(to, amount)
    }

    fn transfer_from(&self, from: &Address, to: &Address, amount: Amount) -> bool {
        (**self).transfer_from(from, to, amount)
    }
}

impl<T: AssetTransfer + ?Sized> AssetTransfer for Rc<T> {
    fn transfer(&self, to: &Address, amount: Amount) -> bool {
        (**self).transfer(to, amount)
    }

    fn transfer_from(&self, from: &Address, to: &Address, amount: Amount) -> bool {
        (**self).transfer_from(from, to, amount)
    }
}

/// Asset movement scheduled by a ledger call, executed after state is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// pool → user
    Out { to: Address, amount: Amount },
    /// user → pool
    In { from: Address, amount: Amount },
}

impl Transfer {
    pub fn amount(&self) -> Amount {
        match self {
            Transfer::Out { amount, .. } | Transfer::In { amount, .. } => *amount,
        }
    }

    /// Runs the transfer against `asset` on behalf of `pool_account`.
    pub(crate) fn execute<A: AssetTransfer + ?Sized>(
        &self,
        asset: &A,
        pool_account: &Address,
    ) -> Result<(), LedgerError> {
        let ok = match self {
            Transfer::Out { to, amount } => asset.transfer(to, *amount),
            Transfer::In { from, amount } => asset.transfer_from(from, pool_account, *amount),
        };
        if ok {
            Ok(())
        } else {
            Err(LedgerError::TransferFailure(format!("{:?}", self)))
        }
    }
}
