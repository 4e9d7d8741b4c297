//! Re-entrancy guard
//!
//! One flag per ledger. A top-level call holds it until every transfer has returned;
//! any nested call into a mutating entry point meanwhile fails with
//! `StateError::Reentrant`.

use std::cell::Cell;

use crate::error::{LedgerResult, StateError};

#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> LedgerResult<Entered<'_>> {
        if self.entered.replace(true) {
            return Err(StateError::Reentrant.into());
        }
        Ok(Entered { guard: self })
    }

    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

/// Releases the guard on drop, including early returns.
#[derive(Debug)]
pub struct Entered<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.guard.entered.set(false);
    }
}
