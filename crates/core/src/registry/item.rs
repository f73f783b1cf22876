use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt::{Display, Formatter, Result};

use crate::history::AcceptedLog;
use crate::operation::{Operation, Timestamp};
use crate::registry::transaction::TransactionRegistry;

/// A data item and the timestamps guarding it.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataItem {
    pub name: String,
    /// Largest timestamp among accepted reads of this item.
    pub rts: Timestamp,
    /// Largest timestamp among accepted writes of this item.
    pub wts: Timestamp,
}

impl DataItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rts: 0,
            wts: 0,
        }
    }
}

impl Display for DataItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}[RTS={}, WTS={}]", self.name, self.rts, self.wts)
    }
}

/// Every data item touched during a run. Items are never removed.
#[derive(Debug, Default, Clone)]
pub struct ItemRegistry {
    items: BTreeMap<String, DataItem>,
}

impl ItemRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    pub fn get_or_create(&mut self, name: &str) -> &mut DataItem {
        self.items
            .entry(String::from(name))
            .or_insert_with(|| DataItem::new(name))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataItem> {
        self.items.get(name)
    }

    /// Items ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &DataItem> {
        self.items.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rebuild every RTS/WTS from scratch by replaying `log`.
    ///
    /// All items restart at `(0, 0)`; each surviving read or write raises
    /// the item's RTS or WTS to its transaction's timestamp. Entries whose
    /// transaction is no longer registered contribute nothing.
    pub fn recompute(&mut self, log: &AcceptedLog, transactions: &TransactionRegistry) {
        for item in self.items.values_mut() {
            item.rts = 0;
            item.wts = 0;
        }
        for operation in log {
            let Some(timestamp) = transactions
                .get(operation.transaction())
                .map(|transaction| transaction.timestamp)
            else {
                tracing::error!(%operation, "accepted operation has no live transaction");
                continue;
            };
            match operation {
                Operation::Read { item, .. } => {
                    let item = self.get_or_create(item);
                    item.rts = item.rts.max(timestamp);
                }
                Operation::Write { item, .. } => {
                    let item = self.get_or_create(item);
                    item.wts = item.wts.max(timestamp);
                }
                Operation::Commit { .. } => {}
            }
        }
    }
}
