//! Live transactions and data items of a run.

pub mod item;
pub mod transaction;

pub use item::{DataItem, ItemRegistry};
pub use transaction::{Status, Transaction, TransactionRegistry};
