use core::fmt::{Display, Formatter, Result};

use crate::operation::{Operation, Timestamp, TransactionId};
use crate::registry::DataItem;
use crate::scheduler::checker::Violation;

/// Something observable that happened during a step.
///
/// A front end renders these; the scheduler never formats output itself.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A new incarnation was registered.
    TransactionStarted {
        transaction: TransactionId,
        timestamp: Timestamp,
    },
    /// A read or write passed the ordering check.
    Accepted {
        operation: Operation,
        timestamp: Timestamp,
        /// The item after the update.
        item: DataItem,
        /// Whether the relevant RTS/WTS moved.
        changed: bool,
    },
    Committed {
        transaction: TransactionId,
        timestamp: Timestamp,
    },
    /// `operation` violated the ordering; its transaction was purged and
    /// requeued.
    Aborted {
        transaction: TransactionId,
        timestamp: Timestamp,
        operation: Operation,
        violation: Violation,
        purged: usize,
        requeued: usize,
    },
    /// A commit for a transaction that is not active. Nothing changed.
    SkippedCommit { operation: Operation },
    /// A pending entry whose transaction was aborted after it was enqueued.
    SkippedStale { operation: Operation },
    /// The pending queue is empty.
    Completed,
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::TransactionStarted {
                transaction,
                timestamp,
            } => write!(f, "new transaction {transaction} with TS={timestamp}"),
            Self::Accepted {
                operation,
                item,
                changed,
                ..
            } => {
                let kept = if *changed { "" } else { " (unchanged)" };
                write!(f, "executed {operation}: {item}{kept}")
            }
            Self::Committed {
                transaction,
                timestamp,
            } => write!(f, "commit {transaction}(TS={timestamp})"),
            Self::Aborted {
                transaction,
                timestamp,
                operation,
                violation,
                purged,
                requeued,
            } => write!(
                f,
                "abort {transaction}(TS={timestamp}) at {operation}: {violation}; \
                 purged {purged}, requeued {requeued}"
            ),
            Self::SkippedCommit { operation } => write!(
                f,
                "skipped {operation}: T{} is not active",
                operation.transaction().0
            ),
            Self::SkippedStale { operation } => write!(
                f,
                "skipped {operation}: T{} was restarted",
                operation.transaction().0
            ),
            Self::Completed => f.write_str("all operations processed"),
        }
    }
}
