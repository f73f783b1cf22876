//! Step-by-step simulation of Basic Timestamp Ordering (BTO).
//!
//! `bto_core` replays a fixed history of read, write and commit operations
//! issued by several logical transactions and decides, one operation at a
//! time, whether each operation may run under the basic timestamp ordering
//! protocol:
//!
//! 1. Every transaction incarnation receives a unique, strictly increasing
//!    logical timestamp the first time one of its operations is scheduled.
//! 2. Every data item records the largest timestamp that read it (RTS) and
//!    the largest timestamp that wrote it (WTS).
//! 3. A read older than the item's WTS, or a write older than its RTS or WTS,
//!    aborts the transaction. Its accepted operations are purged, item
//!    timestamps are recomputed from what survives, and its whole original
//!    operation list is requeued to run again under a fresh timestamp.
//!
//! Obsolete writes always abort; the Thomas Write Rule is not applied.
//!
//! # Entry point
//!
//! The main entry point is [`Scheduler`]. Load a history with
//! [`Scheduler::load`], then call [`Scheduler::step`] until it reports
//! completion. Every step returns the structured [`Event`]s it produced so a
//! front end can render progress without reaching into the scheduler.
//!
//! ```rust
//! use bto_core::{Scheduler, Step};
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.load(["r1(y)", "r2(y)", "w1(y)", "c2", "c1"]).unwrap();
//! while let Step::Advanced(report) = scheduler.step() {
//!     for event in &report.events {
//!         println!("{event}");
//!     }
//! }
//! assert_eq!(
//!     scheduler.accepted().to_string(),
//!     "r2(y) c2 r1(y) w1(y) c1"
//! );
//! ```
//!
//! # Crate features
//!
//! - **`serde`** -- enables `Serialize`/`Deserialize` derives on operations,
//!   events, registry records and snapshots.
//! - **`schemars`** -- additionally derives `JsonSchema` for the same types.
//!
//! This crate is `no_std` compatible (requires `alloc`).

#![cfg_attr(not(any(test, feature = "schemars")), no_std)]
extern crate alloc;

pub mod history;
pub mod operation;
pub mod registry;
pub mod scheduler;

pub use history::scenario::Scenario;
pub use operation::{parse_operation, MalformedOperation, Operation, Timestamp, TransactionId};
pub use scheduler::error::Error;
pub use scheduler::event::Event;
pub use scheduler::{Scheduler, State, Step, StepReport};
