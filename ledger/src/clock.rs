//! Time source
//!
//! Read once per ledger call. The clock is trusted as given.

use chrono::Utc;

use crate::types::Timestamp;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock (UTC seconds)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp().max(0) as Timestamp
    }
}
