//! Checkpoint store with historical balance lookup
//!
//! An append-only sequence of checkpoints over a mutable ledger. Total
//! supply is recorded eagerly when a checkpoint is created; per-account
//! balances are recorded lazily, as an append-only change log: the first
//! mutation of an account's balance after a checkpoint writes one mark with
//! the pre-mutation value. Historical queries binary-search the marks, so
//! past checkpoints stay stable no matter how the live ledger keeps moving.
//!
//! ```text
//!  checkpoints:  #1 ──── #2 ──── #3 ──── #4          (ids never reused)
//!  account A:        [mark id=2, bal=100]  [mark id=4, bal=60]
//!                     ▲ first write after #1/#2       ▲ first write after #3/#4
//!  balance_at(A, 1) = 100     balance_at(A, 3) = 60     balance_at(A, 4) = 60
//! ```

use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use crate::types::{AccountId, Amount, BlockHeight, CheckpointId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single immutable checkpoint record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Sequential id, starting at 1
    pub id: CheckpointId,

    /// Total supply at the moment of creation
    pub total_supply: Amount,

    /// Block height at the moment of creation
    pub height: BlockHeight,

    /// Creation timestamp (metadata only; ordering is by id)
    pub created_at: i64,
}

/// Balance an account held when checkpoint `id` was taken
///
/// One mark covers every checkpoint back to (but excluding) the account's
/// previous mark.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct BalanceMark {
    id: CheckpointId,
    balance: Amount,
}

/// Append-only checkpoint store
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CheckpointStore {
    /// All checkpoints, indexed by `id - 1`
    checkpoints: Vec<Checkpoint>,

    /// Per-account balance change log, ascending by checkpoint id
    marks: HashMap<AccountId, Vec<BalanceMark>>,
}

impl CheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest allocated checkpoint id (0 when none exists)
    pub fn last_id(&self) -> CheckpointId {
        self.checkpoints.len() as CheckpointId
    }

    /// Block height of the most recent checkpoint
    pub fn last_height(&self) -> Option<BlockHeight> {
        self.checkpoints.last().map(|cp| cp.height)
    }

    /// Look up a checkpoint record
    pub fn get(&self, id: CheckpointId) -> Result<&Checkpoint> {
        if id == 0 {
            return Err(LedgerError::UnknownCheckpoint(id));
        }
        self.checkpoints
            .get(id as usize - 1)
            .ok_or(LedgerError::UnknownCheckpoint(id))
    }

    /// Allocate the next checkpoint id and freeze the ledger's current
    /// state behind it
    pub fn create(&mut self, ledger: &Ledger, height: BlockHeight) -> CheckpointId {
        let id = self.last_id() + 1;
        self.checkpoints.push(Checkpoint {
            id,
            total_supply: ledger.total_supply(),
            height,
            created_at: chrono::Utc::now().timestamp(),
        });

        tracing::debug!(
            checkpoint = id,
            total_supply = ledger.total_supply() as u64,
            height,
            "checkpoint created"
        );
        id
    }

    /// Record `account`'s current balance against the latest checkpoint.
    ///
    /// Must be called before every mutation of the account's balance. No-op
    /// when no checkpoint exists yet or the account is already marked for
    /// the latest checkpoint; calling it without a following mutation is
    /// harmless (the mark carries the value a later mutation would have
    /// recorded anyway).
    pub fn touch(&mut self, ledger: &Ledger, account: &AccountId) {
        let last = self.last_id();
        if last == 0 {
            return;
        }

        let marks = self.marks.entry(*account).or_default();
        if marks.last().map_or(0, |mark| mark.id) < last {
            marks.push(BalanceMark {
                id: last,
                balance: ledger.balance_of(account),
            });
        }
    }

    /// Balance of `account` as of checkpoint `id`
    pub fn balance_at(
        &self,
        ledger: &Ledger,
        account: &AccountId,
        id: CheckpointId,
    ) -> Result<Amount> {
        self.get(id)?;

        let Some(marks) = self.marks.get(account) else {
            // Never mutated since the checkpoint was taken
            return Ok(ledger.balance_of(account));
        };

        // The first mark at or after `id` carries the balance held when
        // checkpoint `id` was taken.
        match marks.binary_search_by(|mark| mark.id.cmp(&id)) {
            Ok(i) => Ok(marks[i].balance),
            Err(i) if i < marks.len() => Ok(marks[i].balance),
            Err(_) => Ok(ledger.balance_of(account)),
        }
    }

    /// Total supply as of checkpoint `id`
    pub fn total_supply_at(&self, id: CheckpointId) -> Result<Amount> {
        Ok(self.get(id)?.total_supply)
    }

    /// Iterate over all checkpoints in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: u8) -> AccountId {
        AccountId::new([id; 32])
    }

    /// Ledger+store pair with supply minted to account 1
    fn setup(supply: Amount) -> (Ledger, CheckpointStore) {
        let mut ledger = Ledger::new();
        ledger.mint(&account(1), supply);
        (ledger, CheckpointStore::new())
    }

    /// Transfer that keeps the store's change log consistent
    fn transfer(
        ledger: &mut Ledger,
        store: &mut CheckpointStore,
        from: u8,
        to: u8,
        amount: Amount,
    ) {
        store.touch(ledger, &account(from));
        store.touch(ledger, &account(to));
        ledger.transfer(&account(from), &account(to), amount).unwrap();
    }

    #[test]
    fn test_ids_start_at_one() {
        let (ledger, mut store) = setup(1000);

        assert_eq!(store.last_id(), 0);
        assert_eq!(store.create(&ledger, 10), 1);
        assert_eq!(store.create(&ledger, 11), 2);
        assert_eq!(store.last_id(), 2);
        assert_eq!(store.last_height(), Some(11));
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let (ledger, mut store) = setup(1000);
        store.create(&ledger, 1);

        assert!(matches!(
            store.get(0),
            Err(LedgerError::UnknownCheckpoint(0))
        ));
        assert!(matches!(
            store.get(2),
            Err(LedgerError::UnknownCheckpoint(2))
        ));
        assert!(store
            .balance_at(&ledger, &account(1), 0)
            .is_err());
        assert!(store.total_supply_at(99).is_err());
    }

    #[test]
    fn test_balance_frozen_at_creation() {
        let (mut ledger, mut store) = setup(1_000_000);

        let cp1 = store.create(&ledger, 1);
        transfer(&mut ledger, &mut store, 1, 2, 400_000);
        let cp2 = store.create(&ledger, 2);

        // Checkpoint 1 predates the transfer, checkpoint 2 follows it
        assert_eq!(store.balance_at(&ledger, &account(1), cp1).unwrap(), 1_000_000);
        assert_eq!(store.balance_at(&ledger, &account(2), cp1).unwrap(), 0);
        assert_eq!(store.balance_at(&ledger, &account(1), cp2).unwrap(), 600_000);
        assert_eq!(store.balance_at(&ledger, &account(2), cp2).unwrap(), 400_000);
    }

    #[test]
    fn test_past_checkpoints_immune_to_later_transfers() {
        let (mut ledger, mut store) = setup(1000);

        let cp1 = store.create(&ledger, 1);
        let before = store.balance_at(&ledger, &account(1), cp1).unwrap();

        transfer(&mut ledger, &mut store, 1, 2, 999);
        transfer(&mut ledger, &mut store, 2, 3, 500);
        store.create(&ledger, 2);
        transfer(&mut ledger, &mut store, 3, 1, 250);

        assert_eq!(store.balance_at(&ledger, &account(1), cp1).unwrap(), before);
        assert_eq!(store.balance_at(&ledger, &account(2), cp1).unwrap(), 0);
        assert_eq!(store.balance_at(&ledger, &account(3), cp1).unwrap(), 0);
    }

    #[test]
    fn test_unmarked_account_reads_live_balance() {
        let (mut ledger, mut store) = setup(1000);
        ledger.mint(&account(9), 50);

        let cp1 = store.create(&ledger, 1);
        // Account 1 never moves after the checkpoint
        assert_eq!(store.balance_at(&ledger, &account(1), cp1).unwrap(), 1000);

        // Mutations of other accounts do not disturb it
        transfer(&mut ledger, &mut store, 9, 2, 50);
        assert_eq!(store.balance_at(&ledger, &account(1), cp1).unwrap(), 1000);
    }

    #[test]
    fn test_mark_covers_run_of_checkpoints() {
        let (mut ledger, mut store) = setup(100);

        let cp1 = store.create(&ledger, 1);
        let cp2 = store.create(&ledger, 2);
        let cp3 = store.create(&ledger, 3);
        // Single mutation after three untouched checkpoints
        transfer(&mut ledger, &mut store, 1, 2, 40);

        for cp in [cp1, cp2, cp3] {
            assert_eq!(store.balance_at(&ledger, &account(1), cp).unwrap(), 100);
            assert_eq!(store.balance_at(&ledger, &account(2), cp).unwrap(), 0);
        }
    }

    #[test]
    fn test_total_supply_tracks_burns() {
        let (mut ledger, mut store) = setup(1000);

        let cp1 = store.create(&ledger, 1);
        store.touch(&ledger, &account(1));
        ledger.burn(&account(1), 300).unwrap();
        let cp2 = store.create(&ledger, 2);

        assert_eq!(store.total_supply_at(cp1).unwrap(), 1000);
        assert_eq!(store.total_supply_at(cp2).unwrap(), 700);
    }

    #[test]
    fn test_touch_without_mutation_is_neutral() {
        let (mut ledger, mut store) = setup(500);

        let cp1 = store.create(&ledger, 1);
        // Touched but never mutated, e.g. by a transfer that failed its
        // balance check
        store.touch(&ledger, &account(1));

        assert_eq!(store.balance_at(&ledger, &account(1), cp1).unwrap(), 500);

        transfer(&mut ledger, &mut store, 1, 2, 100);
        assert_eq!(store.balance_at(&ledger, &account(1), cp1).unwrap(), 500);
    }
}
