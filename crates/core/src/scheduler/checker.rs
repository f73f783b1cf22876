//! The basic timestamp ordering decision procedure.
//!
//! For a transaction with timestamp `ts` accessing item `X`:
//!
//! | access | rejected when              | on accept                      |
//! |--------|----------------------------|--------------------------------|
//! | read   | `ts < WTS(X)`              | `RTS(X) = max(RTS(X), ts)`     |
//! | write  | `ts < RTS(X)` or `ts < WTS(X)` | `WTS(X) = ts`              |
//!
//! A write older than `WTS(X)` is rejected rather than skipped: the Thomas
//! Write Rule is not applied. A rejected access leaves the item untouched.

use core::fmt::{self, Display, Formatter};

use crate::operation::Timestamp;
use crate::registry::DataItem;

/// The kind of data access being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// The ordering condition an access violated.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A read older than the latest write: `TS < WTS`.
    ReadTooLate { timestamp: Timestamp, wts: Timestamp },
    /// A write older than a read that already happened: `TS < RTS`.
    WriteTooLateForRead { timestamp: Timestamp, rts: Timestamp },
    /// A write older than a write that already happened: `TS < WTS`.
    WriteTooLateForWrite { timestamp: Timestamp, wts: Timestamp },
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadTooLate { timestamp, wts } => {
                write!(f, "TS({timestamp}) < WTS({wts}), read too late")
            }
            Self::WriteTooLateForRead { timestamp, rts } => {
                write!(f, "TS({timestamp}) < RTS({rts}), write too late")
            }
            Self::WriteTooLateForWrite { timestamp, wts } => {
                write!(f, "TS({timestamp}) < WTS({wts}), write too late")
            }
        }
    }
}

/// Check a read at `timestamp` against `item`, updating RTS on success.
///
/// Returns whether RTS moved.
///
/// # Errors
///
/// Returns [`Violation::ReadTooLate`] if `timestamp < item.wts`.
pub fn check_read(timestamp: Timestamp, item: &mut DataItem) -> Result<bool, Violation> {
    if timestamp < item.wts {
        return Err(Violation::ReadTooLate {
            timestamp,
            wts: item.wts,
        });
    }
    if timestamp > item.rts {
        item.rts = timestamp;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Check a write at `timestamp` against `item`, setting WTS on success.
///
/// Returns whether WTS moved.
///
/// # Errors
///
/// Returns [`Violation::WriteTooLateForRead`] if `timestamp < item.rts`,
/// otherwise [`Violation::WriteTooLateForWrite`] if `timestamp < item.wts`.
pub fn check_write(timestamp: Timestamp, item: &mut DataItem) -> Result<bool, Violation> {
    if timestamp < item.rts {
        return Err(Violation::WriteTooLateForRead {
            timestamp,
            rts: item.rts,
        });
    }
    if timestamp < item.wts {
        return Err(Violation::WriteTooLateForWrite {
            timestamp,
            wts: item.wts,
        });
    }
    let moved = timestamp != item.wts;
    item.wts = timestamp;
    Ok(moved)
}

/// Dispatch to [`check_read`] or [`check_write`].
///
/// # Errors
///
/// Returns the [`Violation`] reported by the underlying check.
pub fn check(
    access: Access,
    timestamp: Timestamp,
    item: &mut DataItem,
) -> Result<bool, Violation> {
    match access {
        Access::Read => check_read(timestamp, item),
        Access::Write => check_write(timestamp, item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(rts: Timestamp, wts: Timestamp) -> DataItem {
        DataItem {
            name: "x".into(),
            rts,
            wts,
        }
    }

    #[test]
    fn test_read_raises_rts() {
        let mut x = item(1, 0);
        assert_eq!(check_read(2, &mut x), Ok(true));
        assert_eq!((x.rts, x.wts), (2, 0));
    }

    #[test]
    fn test_older_read_keeps_rts() {
        let mut x = item(5, 1);
        assert_eq!(check_read(3, &mut x), Ok(false));
        assert_eq!(x.rts, 5);
    }

    #[test]
    fn test_read_at_wts_is_allowed() {
        let mut x = item(0, 3);
        assert_eq!(check_read(3, &mut x), Ok(true));
    }

    #[test]
    fn test_read_before_wts_is_rejected() {
        let mut x = item(0, 3);
        assert_eq!(
            check_read(2, &mut x),
            Err(Violation::ReadTooLate {
                timestamp: 2,
                wts: 3
            })
        );
        assert_eq!((x.rts, x.wts), (0, 3));
    }

    #[test]
    fn test_write_sets_wts() {
        let mut x = item(2, 1);
        assert_eq!(check_write(2, &mut x), Ok(true));
        assert_eq!((x.rts, x.wts), (2, 2));
        assert_eq!(check_write(2, &mut x), Ok(false));
    }

    #[test]
    fn test_write_before_rts_is_rejected_first() {
        let mut x = item(4, 5);
        assert_eq!(
            check_write(3, &mut x),
            Err(Violation::WriteTooLateForRead {
                timestamp: 3,
                rts: 4
            })
        );
    }

    #[test]
    fn test_obsolete_write_aborts_instead_of_being_ignored() {
        let mut x = item(1, 3);
        assert_eq!(
            check_write(2, &mut x),
            Err(Violation::WriteTooLateForWrite {
                timestamp: 2,
                wts: 3
            })
        );
        assert_eq!((x.rts, x.wts), (1, 3));
    }

    #[test]
    fn test_check_dispatch() {
        let mut x = item(0, 0);
        assert_eq!(check(Access::Read, 1, &mut x), Ok(true));
        assert_eq!(check(Access::Write, 1, &mut x), Ok(true));
        assert_eq!((x.rts, x.wts), (1, 1));
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::WriteTooLateForRead {
            timestamp: 1,
            rts: 2,
        };
        assert_eq!(violation.to_string(), "TS(1) < RTS(2), write too late");
    }
}
