//! The two operation sequences a run works on: the pending queue (initial
//! history plus requeued restarts) and the accepted log (final history).

pub mod accepted;
pub mod display;
pub mod pending;
pub mod scenario;

pub use accepted::AcceptedLog;
pub use pending::{Origin, PendingEntry, PendingQueue, Position};
