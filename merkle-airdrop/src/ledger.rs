//! Cumulative per-recipient claim accounting.
//!
//! The ledger is keyed by recipient only, never by root: a claim against a
//! new root pays `entitlement - already_claimed`.

use crate::error::{ClaimError, ClaimResult};
use alloy_primitives::{Address, U256};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ClaimLedger {
    claimed: HashMap<Address, U256>,
    total_paid: U256,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cumulative amount already paid to `recipient`.
    pub fn claimed(&self, recipient: Address) -> U256 {
        self.claimed.get(&recipient).copied().unwrap_or_default()
    }

    pub fn total_paid(&self) -> U256 {
        self.total_paid
    }

    pub fn recipients(&self) -> usize {
        self.claimed.len()
    }

    /// Incremental payout for a recipient entitled to `entitlement` in total.
    pub fn payout_for(&self, recipient: Address, entitlement: U256) -> ClaimResult<U256> {
        let claimed = self.claimed(recipient);
        if entitlement <= claimed {
            return Err(ClaimError::AlreadyClaimed {
                claimed,
                requested: entitlement,
            });
        }
        Ok(entitlement - claimed)
    }

    /// Moves `recipient` from `expected` to `new_total`. Rejected unless the
    /// stored amount still equals `expected` and `new_total` exceeds it.
    pub fn compare_and_set(
        &mut self,
        recipient: Address,
        expected: U256,
        new_total: U256,
    ) -> ClaimResult<U256> {
        let current = self.claimed(recipient);
        if current != expected || new_total <= current {
            return Err(ClaimError::AlreadyClaimed {
                claimed: current,
                requested: new_total,
            });
        }

        let payout = new_total - current;
        self.claimed.insert(recipient, new_total);
        self.total_paid += payout;
        Ok(payout)
    }
}
