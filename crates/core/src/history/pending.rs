use alloc::vec::Vec;

use crate::operation::{Operation, TransactionId};

/// Where a pending entry came from.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Part of the history given to `load`.
    Original,
    /// Appended when its transaction was aborted and restarted.
    Requeued,
}

/// Position of an entry relative to the queue cursor.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Already taken by a previous step.
    Consumed,
    /// Taken by the next step.
    Next,
    /// Not reached yet.
    Upcoming,
}

#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub operation: Operation,
    pub origin: Origin,
    /// Set when the owning transaction was aborted before this entry was
    /// reached. The restarted incarnation runs from the requeued copy, so
    /// this entry is skipped.
    pub superseded: bool,
}

impl PendingEntry {
    const fn new(operation: Operation, origin: Origin) -> Self {
        Self {
            operation,
            origin,
            superseded: false,
        }
    }
}

/// The initial history followed by every requeued restart.
///
/// Entries are never removed; a cursor separates consumed entries from the
/// ones still waiting, so a front end can show both.
#[derive(Debug, Default, Clone)]
pub struct PendingQueue {
    entries: Vec<PendingEntry>,
    cursor: usize,
}

impl PendingQueue {
    #[must_use]
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            entries: operations
                .into_iter()
                .map(|operation| PendingEntry::new(operation, Origin::Original))
                .collect(),
            cursor: 0,
        }
    }

    /// Take the entry under the cursor and move past it.
    pub fn advance(&mut self) -> Option<PendingEntry> {
        let entry = self.entries.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(entry)
    }

    #[must_use]
    pub fn peek(&self) -> Option<&PendingEntry> {
        self.entries.get(self.cursor)
    }

    /// Mark every not-yet-reached entry of `transaction` as superseded.
    /// Returns how many entries were marked.
    pub fn supersede(&mut self, transaction: TransactionId) -> usize {
        let mut marked = 0;
        for entry in &mut self.entries[self.cursor..] {
            if entry.operation.transaction() == transaction && !entry.superseded {
                entry.superseded = true;
                marked += 1;
            }
        }
        marked
    }

    /// Append operations to the tail. Returns how many were appended.
    pub fn requeue<I>(&mut self, operations: I) -> usize
    where
        I: IntoIterator<Item = Operation>,
    {
        let before = self.entries.len();
        self.entries.extend(
            operations
                .into_iter()
                .map(|operation| PendingEntry::new(operation, Origin::Requeued)),
        );
        self.entries.len() - before
    }

    /// Every entry ever enqueued, consumed ones included.
    #[must_use]
    pub fn entries(&self) -> &[PendingEntry] {
        &self.entries
    }

    /// Entries not taken yet.
    #[must_use]
    pub fn upcoming(&self) -> &[PendingEntry] {
        &self.entries[self.cursor..]
    }

    #[must_use]
    pub fn position(&self, index: usize) -> Position {
        match index.cmp(&self.cursor) {
            core::cmp::Ordering::Less => Position::Consumed,
            core::cmp::Ordering::Equal => Position::Next,
            core::cmp::Ordering::Greater => Position::Upcoming,
        }
    }

    pub fn iter_with_position(&self) -> impl Iterator<Item = (Position, &PendingEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (self.position(index), entry))
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.cursor >= self.entries.len()
    }
}
