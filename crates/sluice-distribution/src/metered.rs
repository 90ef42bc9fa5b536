//! Cooldown-gated revenue sharing token with burn redemption
//!
//! Inbound value accumulates in the pool without opening checkpoints.
//! Anyone may call `snapshot()` once the block cooldown has elapsed; the
//! snapshot opens a checkpoint and attributes the claimable percentage of
//! the value received since the previous checkpoint. The complementary
//! percentage stays in the pool, redeemable at any time by burning tokens
//! pro-rata against the live pool balance.

use crate::book::ShareBook;
use crate::redemption::redeemable_on_burn;
use serde::{Deserialize, Serialize};
use sluice_core::{
    AccountId, Amount, BlockClock, BlockHeight, CheckpointId, Event, EventRecord, LedgerError,
    Result, TokenMetadata,
};

/// Revenue-sharing token with explicit, rate-limited snapshots
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeteredShareToken {
    metadata: TokenMetadata,
    clock: BlockClock,
    book: ShareBook,

    /// Percentage of accrued inflow attributed to claims at each snapshot
    claimable_percent: u8,

    /// Minimum blocks between snapshots, measured from the last
    /// checkpoint's height (deployment height before the first one)
    cooldown_blocks: u64,
}

impl MeteredShareToken {
    /// Deploy a token, minting the full supply to `owner`.
    ///
    /// `claimable_percent` must lie in [0, 100]; the remainder
    /// `100 - claimable_percent` is the burn-redemption share.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_supply: Amount,
        claimable_percent: u8,
        cooldown_blocks: u64,
        owner: &AccountId,
    ) -> Result<Self> {
        if claimable_percent > 100 {
            return Err(LedgerError::InvalidSharePercent(claimable_percent));
        }

        Ok(Self {
            metadata: TokenMetadata::new(name, symbol),
            clock: BlockClock::default(),
            book: ShareBook::new(owner, initial_supply, claimable_percent)?,
            claimable_percent,
            cooldown_blocks,
        })
    }

    // === Metadata ===

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn claimable_percent(&self) -> u8 {
        self.claimable_percent
    }

    pub fn cooldown_blocks(&self) -> u64 {
        self.cooldown_blocks
    }

    // === Ledger reads ===

    pub fn total_supply(&self) -> Amount {
        self.book.total_supply()
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.book.balance_of(account)
    }

    pub fn pool_balance(&self) -> Amount {
        self.book.pool.balance()
    }

    /// Attributed but not yet claimed value, ring-fenced from redemption
    pub fn outstanding_claims(&self) -> Amount {
        self.book.pool.outstanding()
    }

    /// Highest checkpoint id so far (0 before the first snapshot)
    pub fn checkpoint_count(&self) -> CheckpointId {
        self.book.checkpoints.last_id()
    }

    pub fn payouts_to(&self, account: &AccountId) -> Amount {
        self.book.payouts_to(account)
    }

    pub fn events(&self) -> &[EventRecord] {
        self.book.events.records()
    }

    // === Chain clock ===

    pub fn block_height(&self) -> BlockHeight {
        self.clock.height()
    }

    pub fn advance_blocks(&mut self, blocks: u64) -> BlockHeight {
        self.clock.advance(blocks)
    }

    /// Blocks until `snapshot()` becomes callable (0 when it already is)
    pub fn snapshot_cooldown_remaining(&self) -> u64 {
        let since = self.blocks_since_last_checkpoint();
        self.cooldown_blocks.saturating_sub(since)
    }

    // === Mutations ===

    /// Receive inbound value; attribution waits for the next snapshot
    pub fn deposit(&mut self, amount: Amount) {
        self.book.pool.record_receipt(amount);
        self.book.events.emit(Event::PoolCredited { amount });
        tracing::debug!(amount = amount as u64, "pool credited");
    }

    /// Open a checkpoint, attributing the claimable share of the inflow
    /// accrued since the previous one. Callable by anyone once the block
    /// cooldown has elapsed.
    pub fn snapshot(&mut self) -> Result<CheckpointId> {
        let remaining = self.snapshot_cooldown_remaining();
        if remaining > 0 {
            return Err(LedgerError::SnapshotTooSoon { remaining });
        }

        let inflow = self.book.pool.unattributed_inflow();
        let id = self
            .book
            .checkpoints
            .create(&self.book.ledger, self.clock.height());
        let attributed = self.book.pool.attribute(id);

        self.book.events.emit(Event::Snapshot { checkpoint: id });
        if inflow > 0 {
            self.book.events.emit(Event::Deposit {
                checkpoint: id,
                amount: attributed,
            });
        }
        tracing::info!(
            checkpoint = id,
            attributed = attributed as u64,
            "snapshot taken"
        );
        Ok(id)
    }

    /// Move tokens between accounts
    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()> {
        self.book.transfer(from, to, amount)
    }

    /// Revenue share of checkpoint `id` still claimable by `account`
    pub fn claimable_revenue(&self, account: &AccountId, id: CheckpointId) -> Result<Amount> {
        self.book.claimable(account, id)
    }

    /// Settle `account`'s share of checkpoint `id` and pay it out
    pub fn claim(&mut self, account: &AccountId, id: CheckpointId) -> Result<Amount> {
        self.book.claim(account, id)
    }

    /// Value that burning `amount` tokens would redeem right now.
    ///
    /// Reads live pool balance and supply; checkpoints play no part.
    pub fn redeemable_on_burn(&self, amount: Amount) -> Amount {
        redeemable_on_burn(
            self.book.pool.balance(),
            amount,
            100 - self.claimable_percent,
            self.book.total_supply(),
        )
    }

    /// Destroy `amount` tokens and pay out their redemption share
    pub fn burn(&mut self, account: &AccountId, amount: Amount) -> Result<Amount> {
        // Computed against pre-burn supply and pool balance
        let redeemed = self.redeemable_on_burn(amount);
        self.book.burn(account, amount, redeemed)?;
        Ok(redeemed)
    }

    fn blocks_since_last_checkpoint(&self) -> u64 {
        let mark = self
            .book
            .checkpoints
            .last_height()
            .unwrap_or_else(|| self.clock.genesis());
        self.clock.blocks_since(mark)
    }
}
