//! # Sluice Distribution
//!
//! Checkpoint-gated pro-rata revenue distribution over the Sluice core
//! ledger.
//!
//! Value flowing into a token is shared with its holders along two
//! policies:
//!
//! | Token                | Checkpoints            | Claim share     | Burn redemption      |
//! |----------------------|------------------------|-----------------|----------------------|
//! | `DepositShareToken`  | one per deposit        | 100% of deposit | none                 |
//! | `MeteredShareToken`  | explicit, cooldown-gated | configured %  | residual % of pool   |
//!
//! ## Flow
//!
//! ```text
//!   value in ──► RevenuePool ──► checkpoint attribution ──► claims (pro-rata
//!                    │              (exactly once per id)     at checkpoint
//!                    │                                        balances)
//!                    └─────► unattributed remainder ──► burn redemption
//!                                                       (live balances)
//! ```
//!
//! Claims settle at most once per (account, checkpoint); the claimed flag
//! is set and the pool debited before value is credited out. The pool never
//! pays more than it holds, and burn redemption can never dip into
//! attributed-but-unclaimed value.

pub mod book;
pub mod claims;
pub mod instant;
pub mod metered;
pub mod pool;
pub mod redemption;

pub use book::ShareBook;
pub use claims::{pro_rata_share, ClaimBook};
pub use instant::DepositShareToken;
pub use metered::MeteredShareToken;
pub use pool::RevenuePool;
pub use redemption::redeemable_on_burn;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::instant::DepositShareToken;
    pub use crate::metered::MeteredShareToken;
    pub use sluice_core::prelude::*;
}
