//! Deposit-triggered revenue sharing token
//!
//! Every inbound value transfer opens exactly one checkpoint and attributes
//! the full amount to it; holders claim their pro-rata share against the
//! balances frozen at that instant. There is no cooldown and no burn
//! redemption: the whole receipt is claim-attributed.
//!
//! Construction fixes the display metadata, the initial supply (minted to
//! the deployer), and an opaque content URI whose BLAKE3 hash becomes the
//! token's permanent content id.

use crate::book::ShareBook;
use serde::{Deserialize, Serialize};
use sluice_core::{
    AccountId, Amount, BlockClock, BlockHeight, CheckpointId, ContentId, Event, EventRecord,
    Result, TokenMetadata,
};

/// Revenue-sharing token with per-deposit checkpoints
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DepositShareToken {
    metadata: TokenMetadata,
    content_id: ContentId,
    clock: BlockClock,
    book: ShareBook,
}

impl DepositShareToken {
    /// Deploy a token, minting the full supply to `owner`
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_supply: Amount,
        content_uri: &str,
        owner: &AccountId,
    ) -> Result<Self> {
        Ok(Self {
            metadata: TokenMetadata::new(name, symbol),
            content_id: ContentId::from_uri(content_uri),
            clock: BlockClock::default(),
            // Deposits are fully claim-attributed
            book: ShareBook::new(owner, initial_supply, 100)?,
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

    /// Fixed identifier derived from the construction-time content URI
    pub fn content_id(&self) -> ContentId {
        self.content_id
    }

    // === Ledger reads ===

    pub fn total_supply(&self) -> Amount {
        self.book.total_supply()
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.book.balance_of(account)
    }

    /// Value the token currently holds for distribution
    pub fn pool_balance(&self) -> Amount {
        self.book.pool.balance()
    }

    /// Highest checkpoint id so far (0 before the first deposit)
    pub fn checkpoint_count(&self) -> CheckpointId {
        self.book.checkpoints.last_id()
    }

    /// Cumulative value paid out to `account`
    pub fn payouts_to(&self, account: &AccountId) -> Amount {
        self.book.payouts_to(account)
    }

    /// Audit log of observable events
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

    // === Mutations ===

    /// Receive inbound value: opens a checkpoint and attributes the whole
    /// amount to it
    pub fn deposit(&mut self, amount: Amount) -> Result<CheckpointId> {
        self.book.pool.record_receipt(amount);
        let id = self
            .book
            .checkpoints
            .create(&self.book.ledger, self.clock.height());
        self.book.pool.attribute(id);

        self.book.events.emit(Event::Deposit {
            checkpoint: id,
            amount,
        });
        tracing::info!(checkpoint = id, amount = amount as u64, "deposit received");
        Ok(id)
    }

    /// Move tokens between accounts
    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()> {
        self.book.transfer(from, to, amount)
    }

    /// Share of checkpoint `id` still claimable by `account`
    pub fn claimable(&self, account: &AccountId, id: CheckpointId) -> Result<Amount> {
        self.book.claimable(account, id)
    }

    /// Settle `account`'s share of checkpoint `id` and pay it out
    pub fn claim(&mut self, account: &AccountId, id: CheckpointId) -> Result<Amount> {
        self.book.claim(account, id)
    }

    /// Destroy tokens. Deposits are fully claim-attributed, so burning
    /// redeems nothing from the pool.
    pub fn burn(&mut self, account: &AccountId, amount: Amount) -> Result<()> {
        self.book.burn(account, amount, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::LedgerError;

    fn account(id: u8) -> AccountId {
        AccountId::new([id; 32])
    }

    fn deploy() -> DepositShareToken {
        DepositShareToken::new("Harbor Share", "HBR", 1_000_000, "ipfs://mock", &account(0))
            .unwrap()
    }

    #[test]
    fn test_deployment() {
        let token = deploy();

        assert_eq!(token.name(), "Harbor Share");
        assert_eq!(token.symbol(), "HBR");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.total_supply(), 1_000_000);
        assert_eq!(token.balance_of(&account(0)), 1_000_000);
        assert_eq!(token.checkpoint_count(), 0);
    }

    #[test]
    fn test_content_id_fixed_by_uri() {
        let token = deploy();
        let again = deploy();
        let other =
            DepositShareToken::new("Other", "OTH", 1, "ipfs://other", &account(0)).unwrap();

        assert_eq!(token.content_id(), ContentId::from_uri("ipfs://mock"));
        assert_eq!(token.content_id(), again.content_id());
        assert_ne!(token.content_id(), other.content_id());
    }

    #[test]
    fn test_each_deposit_opens_a_checkpoint() {
        let mut token = deploy();

        assert_eq!(token.deposit(100).unwrap(), 1);
        assert_eq!(token.deposit(250).unwrap(), 2);

        assert_eq!(token.checkpoint_count(), 2);
        assert_eq!(token.pool_balance(), 350);
        assert_eq!(
            token.events()[0].event,
            Event::Deposit {
                checkpoint: 1,
                amount: 100
            }
        );
    }

    #[test]
    fn test_sole_holder_claims_full_deposit() {
        let mut token = deploy();
        let id = token.deposit(1_000).unwrap();

        assert_eq!(token.claimable(&account(0), id).unwrap(), 1_000);
        assert_eq!(token.claim(&account(0), id).unwrap(), 1_000);
        assert_eq!(token.pool_balance(), 0);
        assert_eq!(token.payouts_to(&account(0)), 1_000);
    }

    #[test]
    fn test_claims_follow_checkpoint_balances() {
        let mut token = deploy();

        let cp1 = token.deposit(1_000).unwrap();
        token.transfer(&account(0), &account(2), 400_000).unwrap();
        let cp2 = token.deposit(1_000).unwrap();

        // Checkpoint 1: deployer held everything
        assert_eq!(token.claimable(&account(0), cp1).unwrap(), 1_000);
        assert_eq!(token.claimable(&account(2), cp1).unwrap(), 0);
        // Checkpoint 2: 60/40 split
        assert_eq!(token.claimable(&account(0), cp2).unwrap(), 600);
        assert_eq!(token.claimable(&account(2), cp2).unwrap(), 400);

        token.claim(&account(0), cp1).unwrap();
        token.claim(&account(0), cp2).unwrap();
        token.claim(&account(2), cp2).unwrap();

        assert_eq!(token.pool_balance(), 0);
        assert_eq!(token.payouts_to(&account(0)), 1_600);
        assert_eq!(token.payouts_to(&account(2)), 400);
    }

    #[test]
    fn test_claim_error_taxonomy() {
        let mut token = deploy();

        // No checkpoint yet
        assert!(matches!(
            token.claim(&account(0), 1),
            Err(LedgerError::UnknownCheckpoint(1))
        ));

        let id = token.deposit(1_000).unwrap();
        token.claim(&account(0), id).unwrap();

        assert!(matches!(
            token.claim(&account(0), id),
            Err(LedgerError::AlreadyClaimed(1))
        ));
        assert!(matches!(
            token.claim(&account(2), id),
            Err(LedgerError::NothingToClaim(1))
        ));
    }

    #[test]
    fn test_burn_redeems_nothing() {
        let mut token = deploy();
        token.deposit(1_000).unwrap();

        token.burn(&account(0), 500_000).unwrap();

        assert_eq!(token.total_supply(), 500_000);
        assert_eq!(token.pool_balance(), 1_000);
        assert_eq!(token.payouts_to(&account(0)), 0);
    }
}
