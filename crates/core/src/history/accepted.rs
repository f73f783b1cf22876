use alloc::vec::Vec;
use core::fmt::{Display, Formatter, Result};

use crate::history::display::format_history;
use crate::operation::{Operation, TransactionId};

/// Operations that passed the conflict check, in execution order.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AcceptedLog(Vec<Operation>);

impl AcceptedLog {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, operation: Operation) {
        self.0.push(operation);
    }

    /// Remove every entry of `transaction`, keeping the relative order of
    /// everything else. Returns the number of removed entries.
    pub fn purge(&mut self, transaction: TransactionId) -> usize {
        let before = self.0.len();
        self.0.retain(|operation| operation.transaction() != transaction);
        before - self.0.len()
    }

    #[must_use]
    pub fn contains_transaction(&self, transaction: TransactionId) -> bool {
        self.0
            .iter()
            .any(|operation| operation.transaction() == transaction)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Operation] {
        &self.0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for AcceptedLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&format_history(&self.0))
    }
}

impl<'a> IntoIterator for &'a AcceptedLog {
    type Item = &'a Operation;
    type IntoIter = core::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(operations: &[Operation]) -> AcceptedLog {
        let mut log = AcceptedLog::new();
        for operation in operations {
            log.push(operation.clone());
        }
        log
    }

    #[test]
    fn test_purge_keeps_order_of_survivors() {
        let mut log = log(&[
            Operation::read(1, "x"),
            Operation::read(2, "x"),
            Operation::write(1, "y"),
            Operation::write(3, "x"),
            Operation::commit(2),
        ]);
        assert_eq!(log.purge(TransactionId(1)), 2);
        assert_eq!(log.to_string(), "r2(x) w3(x) c2");
        assert!(!log.contains_transaction(TransactionId(1)));
    }

    #[test]
    fn test_purge_absent_transaction() {
        let mut log = log(&[Operation::read(1, "x")]);
        assert_eq!(log.purge(TransactionId(9)), 0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_empty_display() {
        assert_eq!(AcceptedLog::new().to_string(), "");
        assert!(AcceptedLog::new().is_empty());
    }
}
