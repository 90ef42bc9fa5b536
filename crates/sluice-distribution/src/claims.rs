//! Claim settlement bookkeeping
//!
//! One flag per (account, checkpoint): false until the account settles its
//! share, never unset afterwards. The pro-rata share math lives here so
//! both token variants distribute identically.

use serde::{Deserialize, Serialize};
use sluice_core::{AccountId, Amount, CheckpointId, LedgerError, Result};
use std::collections::HashSet;

/// Per-account, per-checkpoint settlement flags
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClaimBook {
    claimed: HashSet<(AccountId, CheckpointId)>,
}

impl ClaimBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Has `account` already settled checkpoint `id`?
    pub fn is_claimed(&self, account: &AccountId, id: CheckpointId) -> bool {
        self.claimed.contains(&(*account, id))
    }

    /// Mark (account, id) settled. Fails if the flag is already set.
    pub fn settle(&mut self, account: &AccountId, id: CheckpointId) -> Result<()> {
        if !self.claimed.insert((*account, id)) {
            return Err(LedgerError::AlreadyClaimed(id));
        }
        Ok(())
    }

    /// Number of settlements recorded
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// Pro-rata share of an attributed amount: `attributed * balance / supply`
/// with floor division.
///
/// Fractional remainders are not distributed; the dust stays in the pool
/// permanently.
pub fn pro_rata_share(attributed: Amount, balance: Amount, supply: Amount) -> Amount {
    if supply == 0 || balance == 0 {
        return 0;
    }
    attributed * balance / supply
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: u8) -> AccountId {
        AccountId::new([id; 32])
    }

    #[test]
    fn test_settle_once() {
        let mut book = ClaimBook::new();

        assert!(!book.is_claimed(&account(1), 1));
        book.settle(&account(1), 1).unwrap();
        assert!(book.is_claimed(&account(1), 1));

        assert!(matches!(
            book.settle(&account(1), 1),
            Err(LedgerError::AlreadyClaimed(1))
        ));
    }

    #[test]
    fn test_flags_are_per_account_and_checkpoint() {
        let mut book = ClaimBook::new();
        book.settle(&account(1), 1).unwrap();

        // Same account, different checkpoint
        book.settle(&account(1), 2).unwrap();
        // Different account, same checkpoint
        book.settle(&account(2), 1).unwrap();

        assert_eq!(book.len(), 3);
    }

    #[test]
    fn test_pro_rata_splits_whole_pool() {
        // 60/40 holders over a supply of 1,000,000
        let supply = 1_000_000;
        let share_a = pro_rata_share(1_000_000_000, 600_000, supply);
        let share_b = pro_rata_share(1_000_000_000, 400_000, supply);

        assert_eq!(share_a, 600_000_000);
        assert_eq!(share_b, 400_000_000);
        assert_eq!(share_a + share_b, 1_000_000_000);
    }

    #[test]
    fn test_pro_rata_floor_leaves_dust() {
        // Three equal holders of a 10-unit attribution: 3+3+3, 1 unit dust
        let share = pro_rata_share(10, 1, 3);
        assert_eq!(share, 3);
        assert!(share * 3 < 10);
    }

    #[test]
    fn test_pro_rata_zero_cases() {
        assert_eq!(pro_rata_share(100, 0, 10), 0);
        assert_eq!(pro_rata_share(100, 10, 0), 0);
        assert_eq!(pro_rata_share(0, 10, 10), 0);
    }
}
