//! Error types for Sluice ledger operations

use crate::types::{Amount, CheckpointId};
use thiserror::Error;

/// Result type alias for Sluice operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur in Sluice ledger and distribution operations
///
/// Every failure is atomic: when an operation returns an error, no balance,
/// checkpoint, pool, or claim state has been modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // === Ledger Operations ===
    /// Debit larger than the account's balance
    #[error("Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// Token constructed with an empty supply
    #[error("Initial supply must be greater than zero")]
    ZeroSupply,

    // === Checkpoints ===
    /// Checkpoint id is 0, out of range, or was never created
    #[error("Unknown checkpoint id: {0}")]
    UnknownCheckpoint(CheckpointId),

    /// Snapshot requested before the block cooldown elapsed
    #[error("Snapshot too soon: {remaining} more blocks required")]
    SnapshotTooSoon { remaining: u64 },

    // === Claims ===
    /// The caller already settled this checkpoint
    #[error("Checkpoint {0} already claimed by this account")]
    AlreadyClaimed(CheckpointId),

    /// The caller's pro-rata share of this checkpoint is zero
    #[error("Nothing to claim for checkpoint {0}")]
    NothingToClaim(CheckpointId),

    // === Pool ===
    /// Payout would exceed the value the pool actually holds
    #[error("Insufficient pool funds: need {needed}, have {available}")]
    InsufficientPoolFunds { needed: Amount, available: Amount },

    // === Construction ===
    /// Claimable percentage outside [0, 100]
    #[error("Claimable percentage must be within 0-100, got {0}")]
    InvalidSharePercent(u8),
}

impl LedgerError {
    /// Get the error code for API responses
    pub fn code(&self) -> u32 {
        match self {
            Self::InsufficientBalance { .. } => 2001,
            Self::ZeroSupply => 2002,
            Self::UnknownCheckpoint(_) => 2101,
            Self::SnapshotTooSoon { .. } => 2102,
            Self::AlreadyClaimed(_) => 2201,
            Self::NothingToClaim(_) => 2202,
            Self::InsufficientPoolFunds { .. } => 2301,
            Self::InvalidSharePercent(_) => 2401,
        }
    }

    /// Check if the operation can simply be retried later
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SnapshotTooSoon { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = LedgerError::InsufficientBalance {
            needed: 100,
            available: 40,
        };
        assert_eq!(err.code(), 2001);

        let err = LedgerError::UnknownCheckpoint(7);
        assert_eq!(err.code(), 2101);
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::SnapshotTooSoon { remaining: 12 };
        let msg = format!("{}", err);

        assert!(msg.contains("12 more blocks"));
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(LedgerError::SnapshotTooSoon { remaining: 1 }.is_recoverable());
        assert!(!LedgerError::AlreadyClaimed(1).is_recoverable());
        assert!(!LedgerError::InsufficientBalance {
            needed: 1,
            available: 0
        }
        .is_recoverable());
    }
}
