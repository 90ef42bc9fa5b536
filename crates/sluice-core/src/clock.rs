//! Block-height clock for checkpoint cooldowns
//!
//! Snapshot rate limiting is measured in elapsed block height, not
//! wall-clock time. The clock is a monotonically increasing counter with a
//! recorded genesis height; it never rolls back.

use crate::types::BlockHeight;
use serde::{Deserialize, Serialize};

/// Monotonic chain clock
///
/// The surrounding runtime advances the clock as blocks are produced;
/// ledger operations only ever read it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockClock {
    /// Height at which the token was deployed
    genesis: BlockHeight,

    /// Current height
    height: BlockHeight,
}

impl BlockClock {
    /// Create a clock starting at the given deployment height
    pub fn new(genesis: BlockHeight) -> Self {
        Self {
            genesis,
            height: genesis,
        }
    }

    /// Deployment height
    pub fn genesis(&self) -> BlockHeight {
        self.genesis
    }

    /// Current height
    pub fn height(&self) -> BlockHeight {
        self.height
    }

    /// Advance by `blocks` and return the new height
    pub fn advance(&mut self, blocks: u64) -> BlockHeight {
        self.height += blocks;
        self.height
    }

    /// Advance by a single block
    pub fn tick(&mut self) -> BlockHeight {
        self.advance(1)
    }

    /// Blocks elapsed since `mark` (zero if `mark` is in the future)
    pub fn blocks_since(&self, mark: BlockHeight) -> u64 {
        self.height.saturating_sub(mark)
    }
}

impl Default for BlockClock {
    fn default() -> Self {
        Self::new(0)
    }
}
