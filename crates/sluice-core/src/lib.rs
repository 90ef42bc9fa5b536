//! # Sluice Core
//!
//! Core state machines for the Sluice revenue-sharing ledger.
//!
//! This crate provides the fundamental building blocks:
//! - `Ledger` - account balances and total supply with conservation-preserving primitives
//! - `CheckpointStore` - append-only checkpoints with historical balance lookup
//! - `BlockClock` - monotonic block-height clock for checkpoint cooldowns
//! - `EventLog` - ordered audit log of observable state transitions
//!
//! ## Architecture
//!
//! The live ledger keeps moving while every created checkpoint stays
//! readable exactly as it was taken:
//!
//! ```text
//!          ┌──────────────────────────────────────────────┐
//!          │                 LIVE LEDGER                  │
//!          │   balances: Account → Amount                 │
//!          │   total_supply                               │
//!          └───────┬──────────────────────────────────────┘
//!                  │ touch() before every mutation
//!          ┌───────▼──────────────────────────────────────┐
//!          │              CHECKPOINT STORE                │
//!          │   #1 ──► #2 ──► #3 ──► …   (append-only)     │
//!          │   per-account balance marks, binary-searched │
//!          └──────────────────────────────────────────────┘
//! ```
//!
//! Checkpoints answer `balance_at(account, id)` and `total_supply_at(id)`
//! for any past id; later transfers never rewrite them.

pub mod checkpoint;
pub mod clock;
pub mod error;
pub mod event;
pub mod ledger;
pub mod types;

pub use checkpoint::*;
pub use clock::*;
pub use error::*;
pub use event::*;
pub use ledger::*;
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::checkpoint::{Checkpoint, CheckpointStore};
    pub use crate::clock::BlockClock;
    pub use crate::error::{LedgerError, Result};
    pub use crate::event::{Event, EventLog};
    pub use crate::ledger::Ledger;
    pub use crate::types::*;
}
