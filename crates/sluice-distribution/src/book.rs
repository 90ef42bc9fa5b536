//! Shared ledger aggregate
//!
//! One owned bundle of the ledger, checkpoint store, revenue pool, claim
//! book, payout record, and event log. Both token variants embed a
//! `ShareBook` and differ only in how checkpoints open: per deposit, or by
//! an explicit cooldown-gated snapshot.
//!
//! Settlement discipline: the claimed flag is set and the pool debited
//! before any value is credited out, so a claim can never pay twice even if
//! the outbound transfer re-entered the book.

use crate::claims::{pro_rata_share, ClaimBook};
use crate::pool::RevenuePool;
use serde::{Deserialize, Serialize};
use sluice_core::{
    AccountId, Amount, CheckpointId, CheckpointStore, Event, EventLog, Ledger, LedgerError,
    Result,
};
use std::collections::HashMap;

/// Ledger + checkpoints + pool + claims, owned as one unit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShareBook {
    pub(crate) ledger: Ledger,
    pub(crate) checkpoints: CheckpointStore,
    pub(crate) pool: RevenuePool,
    pub(crate) claims: ClaimBook,
    /// Cumulative value paid out to each recipient
    pub(crate) payouts: HashMap<AccountId, Amount>,
    pub(crate) events: EventLog,
}

impl ShareBook {
    /// Create a book with the full initial supply minted to `owner`.
    ///
    /// `claimable_percent` of every inflow window is earmarked for claims;
    /// the residual is redeemable by burning.
    pub fn new(owner: &AccountId, initial_supply: Amount, claimable_percent: u8) -> Result<Self> {
        if initial_supply == 0 {
            return Err(LedgerError::ZeroSupply);
        }

        let mut ledger = Ledger::new();
        ledger.mint(owner, initial_supply);

        Ok(Self {
            ledger,
            checkpoints: CheckpointStore::new(),
            pool: RevenuePool::new(claimable_percent),
            claims: ClaimBook::new(),
            payouts: HashMap::new(),
            events: EventLog::new(),
        })
    }

    /// Current balance of an account
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.ledger.balance_of(account)
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    /// Cumulative value paid out to `account` by claims and redemptions
    pub fn payouts_to(&self, account: &AccountId) -> Amount {
        self.payouts.get(account).copied().unwrap_or(0)
    }

    /// Move tokens between accounts, keeping checkpoint history intact
    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()> {
        self.ledger.require_balance(from, amount)?;

        // Record pre-transfer balances against the latest checkpoint before
        // the ledger moves.
        self.checkpoints.touch(&self.ledger, from);
        self.checkpoints.touch(&self.ledger, to);
        self.ledger.transfer(from, to, amount)?;

        self.events.emit(Event::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    /// Share of checkpoint `id` still claimable by `account`.
    ///
    /// Pure read: errors on an unknown checkpoint, returns 0 once claimed.
    pub fn claimable(&self, account: &AccountId, id: CheckpointId) -> Result<Amount> {
        let attributed = self.pool.attributed_to(id)?;
        if self.claims.is_claimed(account, id) {
            return Ok(0);
        }

        let balance = self.checkpoints.balance_at(&self.ledger, account, id)?;
        let supply = self.checkpoints.total_supply_at(id)?;
        Ok(pro_rata_share(attributed, balance, supply))
    }

    /// Settle `account`'s share of checkpoint `id` and pay it out
    pub fn claim(&mut self, account: &AccountId, id: CheckpointId) -> Result<Amount> {
        let attributed = self.pool.attributed_to(id)?;
        if self.claims.is_claimed(account, id) {
            return Err(LedgerError::AlreadyClaimed(id));
        }

        let balance = self.checkpoints.balance_at(&self.ledger, account, id)?;
        let supply = self.checkpoints.total_supply_at(id)?;
        let amount = pro_rata_share(attributed, balance, supply);
        if amount == 0 {
            return Err(LedgerError::NothingToClaim(id));
        }

        // Flag, then pool debit, then value credit.
        self.claims.settle(account, id)?;
        self.pool.pay_claim(amount)?;
        *self.payouts.entry(*account).or_insert(0) += amount;

        self.events.emit(Event::Claimed {
            account: *account,
            checkpoint: id,
            amount,
        });
        tracing::info!(
            account = %account,
            checkpoint = id,
            amount = amount as u64,
            "claim settled"
        );
        Ok(amount)
    }

    /// Destroy `amount` tokens from `account` and pay out `redeemed` from
    /// the pool's residual share.
    ///
    /// Both preconditions are checked before either side mutates, so the
    /// call is all-or-nothing.
    pub fn burn(&mut self, account: &AccountId, amount: Amount, redeemed: Amount) -> Result<()> {
        self.ledger.require_balance(account, amount)?;
        let available = self.pool.available_for_redemption();
        if redeemed > available {
            return Err(LedgerError::InsufficientPoolFunds {
                needed: redeemed,
                available,
            });
        }

        self.checkpoints.touch(&self.ledger, account);
        self.ledger.burn(account, amount)?;
        if redeemed > 0 {
            self.pool.pay_redemption(redeemed)?;
            *self.payouts.entry(*account).or_insert(0) += redeemed;
        }

        self.events.emit(Event::Burned {
            account: *account,
            amount,
            redeemed,
        });
        tracing::info!(
            account = %account,
            amount = amount as u64,
            redeemed = redeemed as u64,
            "tokens burned"
        );
        Ok(())
    }
}
