//! Account balance ledger
//!
//! Conservation-preserving transfer/mint/burn primitives over a balances
//! map. The sum of all balances equals the total supply after every
//! operation; transfer keeps supply constant, burn shrinks one balance and
//! the supply together, mint runs at construction time only.

use crate::error::{LedgerError, Result};
use crate::types::{AccountId, Amount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Balances and total supply for a single fungible token
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Account balances
    balances: HashMap<AccountId, Amount>,

    /// Current total supply
    total_supply: Amount,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit newly created tokens to `account`, growing the supply.
    ///
    /// Construction-time only; there is no public mint after deployment.
    pub fn mint(&mut self, account: &AccountId, amount: Amount) {
        self.credit(account, amount);
        self.total_supply += amount;
    }

    /// Move `amount` from `from` to `to`. Supply is unchanged.
    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()> {
        self.debit(from, amount)?;
        self.credit(to, amount);
        Ok(())
    }

    /// Destroy `amount` from `account`, shrinking balance and supply
    /// together.
    pub fn burn(&mut self, account: &AccountId, amount: Amount) -> Result<()> {
        self.debit(account, amount)?;
        self.total_supply -= amount;
        Ok(())
    }

    /// Current balance of an account (zero if never seen)
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Check that `account` can cover a debit of `amount`
    pub fn require_balance(&self, account: &AccountId, amount: Amount) -> Result<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Iterate over all accounts with a recorded balance
    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, Amount)> {
        self.balances.iter().map(|(account, bal)| (account, *bal))
    }

    // === Internal helpers ===

    fn credit(&mut self, account: &AccountId, amount: Amount) {
        *self.balances.entry(*account).or_insert(0) += amount;
    }

    fn debit(&mut self, account: &AccountId, amount: Amount) -> Result<()> {
        self.require_balance(account, amount)?;
        *self.balances.get_mut(account).expect("balance checked") -= amount;
        Ok(())
    }
}
