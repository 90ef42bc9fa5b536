//! Pool accountant for inbound revenue
//!
//! Tracks the value the token holds, cumulative inflow, the amount
//! attributed to each checkpoint, and the outstanding liability owed to
//! unclaimed checkpoints. The claimable percentage of inflow is earmarked
//! from the moment it arrives: redemptions may only draw on the residual,
//! so the pool balance always covers the claim liability, including the
//! share of the current inflow window that the next checkpoint will
//! attribute.

use serde::{Deserialize, Serialize};
use sluice_core::{Amount, CheckpointId, LedgerError, Result};

/// Held value and its attribution bookkeeping
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevenuePool {
    /// Percentage of inflow attributed to claims, fixed at construction
    claimable_percent: u8,

    /// Value currently held
    balance: Amount,

    /// Cumulative inflow over the pool's lifetime
    total_received: Amount,

    /// Cumulative inflow when the last checkpoint was attributed
    received_at_attribution: Amount,

    /// Amount attributed to each checkpoint, indexed by `id - 1`
    attributed: Vec<Amount>,

    /// Attributed but not yet claimed
    outstanding: Amount,
}

impl RevenuePool {
    /// Create a pool that attributes `claimable_percent` of each inflow
    /// window to claims
    pub fn new(claimable_percent: u8) -> Self {
        debug_assert!(claimable_percent <= 100);
        Self {
            claimable_percent,
            balance: 0,
            total_received: 0,
            received_at_attribution: 0,
            attributed: Vec::new(),
            outstanding: 0,
        }
    }

    pub fn claimable_percent(&self) -> u8 {
        self.claimable_percent
    }

    /// Credit an inbound receipt
    pub fn record_receipt(&mut self, amount: Amount) {
        self.balance += amount;
        self.total_received += amount;
    }

    /// Inflow accrued since the last attribution
    pub fn unattributed_inflow(&self) -> Amount {
        self.total_received - self.received_at_attribution
    }

    /// Claimable share of the current inflow window, already earmarked for
    /// the next checkpoint
    pub fn pending_attribution(&self) -> Amount {
        self.unattributed_inflow() * self.claimable_percent as Amount / 100
    }

    /// Close the current inflow window against checkpoint `id`: its
    /// claimable share becomes that checkpoint's attributed amount.
    ///
    /// Checkpoints are attributed exactly once, in creation order, at
    /// creation time. The residual share of the window is permanently left
    /// to burn redemption.
    pub fn attribute(&mut self, id: CheckpointId) -> Amount {
        debug_assert_eq!(id as usize, self.attributed.len() + 1);

        let amount = self.pending_attribution();
        self.attributed.push(amount);
        self.outstanding += amount;
        self.received_at_attribution = self.total_received;

        tracing::debug!(
            checkpoint = id,
            amount = amount as u64,
            outstanding = self.outstanding as u64,
            "revenue attributed"
        );
        amount
    }

    /// Amount attributed to checkpoint `id`
    pub fn attributed_to(&self, id: CheckpointId) -> Result<Amount> {
        if id == 0 {
            return Err(LedgerError::UnknownCheckpoint(id));
        }
        self.attributed
            .get(id as usize - 1)
            .copied()
            .ok_or(LedgerError::UnknownCheckpoint(id))
    }

    /// Value currently held
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Cumulative inflow
    pub fn total_received(&self) -> Amount {
        self.total_received
    }

    /// Attributed but not yet claimed
    pub fn outstanding(&self) -> Amount {
        self.outstanding
    }

    /// Value a redemption may draw on: the held balance minus the settled
    /// claim liability and the earmarked share of the current window
    pub fn available_for_redemption(&self) -> Amount {
        self.balance
            .saturating_sub(self.outstanding)
            .saturating_sub(self.pending_attribution())
    }

    /// Debit a settled claim payout, releasing its share of the liability
    pub fn pay_claim(&mut self, amount: Amount) -> Result<()> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientPoolFunds {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.outstanding = self.outstanding.saturating_sub(amount);
        Ok(())
    }

    /// Debit a burn-redemption payout from the residual share
    pub fn pay_redemption(&mut self, amount: Amount) -> Result<()> {
        let available = self.available_for_redemption();
        if amount > available {
            return Err(LedgerError::InsufficientPoolFunds {
                needed: amount,
                available,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}
