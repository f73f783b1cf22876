use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter, Result};

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use crate::operation::{Operation, Timestamp, TransactionId};

#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Committed,
    Aborted,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match self {
            Self::Active => "ACTIVE",
            Self::Committed => "COMMITTED",
            Self::Aborted => "ABORTED",
        })
    }
}

/// One incarnation of a logical transaction.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub timestamp: Timestamp,
    pub status: Status,
    /// Operations of this incarnation that made it into the accepted log.
    pub operations: Vec<Operation>,
}

impl Transaction {
    #[must_use]
    pub const fn new(id: TransactionId, timestamp: Timestamp) -> Self {
        Self {
            id,
            timestamp,
            status: Status::Active,
            operations: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}(TS={})", self.id, self.timestamp)
    }
}

/// Transactions currently alive in a run, plus the logical clock.
///
/// The clock is incremented exactly once per created incarnation, so an
/// aborted transaction that comes back always gets a larger timestamp than
/// any it had before.
#[derive(Debug, Default, Clone)]
pub struct TransactionRegistry {
    live: HashMap<TransactionId, Transaction>,
    clock: Timestamp,
    aborted: Vec<TransactionId>,
}

impl TransactionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live incarnation of `id`, creating it with the next
    /// timestamp if there is none. The flag is `true` when it was created.
    pub fn get_or_create(&mut self, id: TransactionId) -> (&mut Transaction, bool) {
        match self.live.entry(id) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => {
                self.clock += 1;
                (entry.insert(Transaction::new(id, self.clock)), true)
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.live.get(&id)
    }

    pub fn get_mut(&mut self, id: TransactionId) -> Option<&mut Transaction> {
        self.live.get_mut(&id)
    }

    /// Move an active transaction to `Committed`.
    ///
    /// Returns `None`, changing nothing, when `id` is not live or not active.
    pub fn mark_committed(&mut self, id: TransactionId) -> Option<&mut Transaction> {
        let transaction = self.live.get_mut(&id).filter(|t| t.is_active())?;
        transaction.status = Status::Committed;
        Some(transaction)
    }

    /// Deregister `id` and return its final record with status `Aborted`.
    ///
    /// The id is appended to the aborted-ids list, which is kept for
    /// reporting only.
    pub fn mark_aborted(&mut self, id: TransactionId) -> Option<Transaction> {
        let mut transaction = self.live.remove(&id)?;
        transaction.status = Status::Aborted;
        transaction.operations.clear();
        self.aborted.push(id);
        Some(transaction)
    }

    /// Live transactions ordered by id.
    #[must_use]
    pub fn iter(&self) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self.live.values().collect();
        transactions.sort_unstable_by_key(|transaction| transaction.id);
        transactions
    }

    /// Every abort so far, in order; an id appears once per abort.
    #[must_use]
    pub fn aborted_ids(&self) -> &[TransactionId] {
        &self.aborted
    }

    #[must_use]
    pub fn abort_counts(&self) -> BTreeMap<TransactionId, usize> {
        let mut counts = BTreeMap::new();
        for id in &self.aborted {
            *counts.entry(*id).or_insert(0) += 1;
        }
        counts
    }

    /// The last timestamp handed out; `0` before any transaction exists.
    #[must_use]
    pub const fn clock(&self) -> Timestamp {
        self.clock
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
