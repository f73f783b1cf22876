use alloc::vec::Vec;

use crate::history::{Origin, Position};
use crate::operation::{Operation, Timestamp, TransactionId};
use crate::registry::{DataItem, Transaction};
use crate::scheduler::{Scheduler, State};

/// A pending queue entry together with its position relative to the cursor.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub operation: Operation,
    pub origin: Origin,
    pub superseded: bool,
    pub position: Position,
}

/// An owned copy of everything a front end displays after a step.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state: State,
    pub steps_taken: u64,
    /// Last timestamp handed out.
    pub clock: Timestamp,
    pub accepted: Vec<Operation>,
    pub pending: Vec<QueueEntry>,
    /// Live transactions ordered by id.
    pub transactions: Vec<Transaction>,
    /// Data items ordered by name.
    pub items: Vec<DataItem>,
    /// One entry per abort, in order.
    pub aborted: Vec<TransactionId>,
}

impl From<&Scheduler> for Snapshot {
    fn from(scheduler: &Scheduler) -> Self {
        Self {
            state: scheduler.state(),
            steps_taken: scheduler.steps_taken(),
            clock: scheduler.transactions().clock(),
            accepted: scheduler.accepted().as_slice().to_vec(),
            pending: scheduler
                .pending()
                .iter_with_position()
                .map(|(position, entry)| QueueEntry {
                    operation: entry.operation.clone(),
                    origin: entry.origin,
                    superseded: entry.superseded,
                    position,
                })
                .collect(),
            transactions: scheduler
                .transactions()
                .iter()
                .into_iter()
                .cloned()
                .collect(),
            items: scheduler.items().iter().cloned().collect(),
            aborted: scheduler.aborted_ids().to_vec(),
        }
    }
}
