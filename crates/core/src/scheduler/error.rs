use core::fmt::{Display, Formatter, Result};

use derive_more::From;

use crate::operation::MalformedOperation;

/// Error returned by the scheduler API.
///
/// Aborts and skipped operations are not errors; they are reported as
/// [`Event`](crate::Event)s.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Error {
    /// A token of the history does not match the operation grammar. The
    /// scheduler was left untouched.
    #[from]
    MalformedOperation(MalformedOperation),
    /// [`Scheduler::run`](crate::Scheduler::run) hit its step limit before
    /// the pending queue emptied. The scheduler is still valid and can be
    /// stepped further.
    StepLimitExceeded { limit: u64 },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::MalformedOperation(err) => write!(f, "{err}"),
            Self::StepLimitExceeded { limit } => {
                write!(f, "history did not complete within {limit} steps")
            }
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::MalformedOperation(err) => Some(err),
            Self::StepLimitExceeded { .. } => None,
        }
    }
}
