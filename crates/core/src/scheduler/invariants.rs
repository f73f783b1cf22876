//! Consistency checks over a scheduler's state.
//!
//! These hold after every step of a correct run; front ends and tests call
//! [`Scheduler::verify_invariants`] to catch regressions early.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter, Result};

use hashbrown::HashMap;

use crate::operation::{Operation, Timestamp, TransactionId};
use crate::scheduler::Scheduler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Two live transactions share a timestamp.
    DuplicateTimestamp {
        timestamp: Timestamp,
        transactions: [TransactionId; 2],
    },
    /// A live transaction carries a timestamp the clock never handed out.
    TimestampOutOfRange {
        transaction: TransactionId,
        timestamp: Timestamp,
        clock: Timestamp,
    },
    /// An item's RTS/WTS differ from the maxima over the accepted log.
    ItemTimestamps {
        item: String,
        expected: (Timestamp, Timestamp),
        actual: (Timestamp, Timestamp),
    },
    /// The accepted log holds an operation of a transaction that is not
    /// live, i.e. of a purged incarnation.
    OrphanOperation { operation: Operation },
    /// A live transaction's own list disagrees with the accepted log.
    OperationListMismatch { transaction: TransactionId },
}

impl Display for InvariantViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::DuplicateTimestamp {
                timestamp,
                transactions: [a, b],
            } => write!(f, "{a} and {b} share timestamp {timestamp}"),
            Self::TimestampOutOfRange {
                transaction,
                timestamp,
                clock,
            } => write!(f, "{transaction} has TS={timestamp} outside 1..={clock}"),
            Self::ItemTimestamps {
                item,
                expected,
                actual,
            } => write!(
                f,
                "{item} has RTS/WTS {actual:?}, accepted log implies {expected:?}"
            ),
            Self::OrphanOperation { operation } => {
                write!(f, "{operation} belongs to no live transaction")
            }
            Self::OperationListMismatch { transaction } => {
                write!(f, "{transaction} operation list disagrees with the accepted log")
            }
        }
    }
}

impl core::error::Error for InvariantViolation {}

impl Scheduler {
    /// Check the run invariants against the current state:
    ///
    /// - live timestamps are unique and never ahead of the clock;
    /// - every accepted operation belongs to a live transaction;
    /// - each live transaction's operation list is exactly its entries in
    ///   the accepted log;
    /// - every item's RTS/WTS equal the maxima over the accepted log.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn verify_invariants(&self) -> core::result::Result<(), InvariantViolation> {
        let clock = self.transactions().clock();
        let mut owners: HashMap<Timestamp, TransactionId> = HashMap::new();
        for transaction in self.transactions().iter() {
            if transaction.timestamp == 0 || transaction.timestamp > clock {
                return Err(InvariantViolation::TimestampOutOfRange {
                    transaction: transaction.id,
                    timestamp: transaction.timestamp,
                    clock,
                });
            }
            if let Some(other) = owners.insert(transaction.timestamp, transaction.id) {
                return Err(InvariantViolation::DuplicateTimestamp {
                    timestamp: transaction.timestamp,
                    transactions: [other, transaction.id],
                });
            }
        }

        let mut expected: HashMap<&str, (Timestamp, Timestamp)> = HashMap::new();
        for operation in self.accepted() {
            let Some(transaction) = self.transactions().get(operation.transaction()) else {
                return Err(InvariantViolation::OrphanOperation {
                    operation: operation.clone(),
                });
            };
            match operation {
                Operation::Read { item, .. } => {
                    let entry = expected.entry(item.as_str()).or_default();
                    entry.0 = entry.0.max(transaction.timestamp);
                }
                Operation::Write { item, .. } => {
                    let entry = expected.entry(item.as_str()).or_default();
                    entry.1 = entry.1.max(transaction.timestamp);
                }
                Operation::Commit { .. } => {}
            }
        }

        for transaction in self.transactions().iter() {
            let logged: Vec<&Operation> = self
                .accepted()
                .iter()
                .filter(|operation| operation.transaction() == transaction.id)
                .collect();
            if !logged.iter().copied().eq(transaction.operations.iter()) {
                return Err(InvariantViolation::OperationListMismatch {
                    transaction: transaction.id,
                });
            }
        }

        for item in self.items().iter() {
            let expected = expected.get(item.name.as_str()).copied().unwrap_or_default();
            if expected != (item.rts, item.wts) {
                return Err(InvariantViolation::ItemTimestamps {
                    item: item.name.clone(),
                    expected,
                    actual: (item.rts, item.wts),
                });
            }
        }

        Ok(())
    }
}
