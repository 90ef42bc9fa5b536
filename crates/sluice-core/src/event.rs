//! Observable event log
//!
//! Every externally visible state transition appends one record to an
//! in-order audit log. Records are never rewritten or removed.

use crate::types::{AccountId, Amount, CheckpointId};
use serde::{Deserialize, Serialize};

/// Externally observable ledger events
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Inbound value attributed to a checkpoint for distribution
    Deposit {
        checkpoint: CheckpointId,
        amount: Amount,
    },

    /// Explicit snapshot opened a checkpoint
    Snapshot { checkpoint: CheckpointId },

    /// Inbound value credited to the pool, attribution deferred
    PoolCredited { amount: Amount },

    /// Token balance moved between accounts
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },

    /// An account settled its share of a checkpoint
    Claimed {
        account: AccountId,
        checkpoint: CheckpointId,
        amount: Amount,
    },

    /// Tokens destroyed, with the value redeemed from the pool
    Burned {
        account: AccountId,
        amount: Amount,
        redeemed: Amount,
    },
}

/// A logged event with its emission timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: Event,
    pub timestamp: i64,
}

/// Append-only event log
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn emit(&mut self, event: Event) {
        tracing::debug!(?event, "ledger event");
        self.records.push(EventRecord {
            event,
            timestamp: chrono::Utc::now().timestamp(),
        });
    }

    /// All records in emission order
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Iterate over the bare events in emission order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.records.iter().map(|record| &record.event)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_kept_in_order() {
        let mut log = EventLog::new();
        log.emit(Event::PoolCredited { amount: 10 });
        log.emit(Event::Snapshot { checkpoint: 1 });

        assert_eq!(log.len(), 2);
        let events: Vec<_> = log.events().collect();
        assert_eq!(events[0], &Event::PoolCredited { amount: 10 });
        assert_eq!(events[1], &Event::Snapshot { checkpoint: 1 });
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = Event::Deposit {
            checkpoint: 1,
            amount: 500,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"deposit\""));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
