use alloc::string::String;
use core::fmt::{Display, Formatter, Result};
use core::str::FromStr;

mod parse;

pub use parse::{parse_operation, MalformedOperation};

/// Logical timestamp handed out by the transaction registry.
///
/// `0` is never assigned to a transaction; it is the initial RTS/WTS of
/// every data item.
pub type Timestamp = u64;

/// Identifier of a logical transaction, stable across restarts.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u64);

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "T{}", self.0)
    }
}

impl From<u64> for TransactionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single scheduled operation.
///
/// The [`Display`] form is the canonical, lower-case token accepted by
/// [`parse_operation`], e.g. `r1(x)`, `w12(item)` or `c3`.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Read {
        transaction: TransactionId,
        item: String,
    },
    Write {
        transaction: TransactionId,
        item: String,
    },
    Commit {
        transaction: TransactionId,
    },
}

/// Item names are case-insensitive and stored lower-case.
fn lowercase(item: impl Into<String>) -> String {
    let mut item = item.into();
    item.make_ascii_lowercase();
    item
}

impl Operation {
    pub fn read(transaction: impl Into<TransactionId>, item: impl Into<String>) -> Self {
        Self::Read {
            transaction: transaction.into(),
            item: lowercase(item),
        }
    }

    pub fn write(transaction: impl Into<TransactionId>, item: impl Into<String>) -> Self {
        Self::Write {
            transaction: transaction.into(),
            item: lowercase(item),
        }
    }

    pub fn commit(transaction: impl Into<TransactionId>) -> Self {
        Self::Commit {
            transaction: transaction.into(),
        }
    }

    #[must_use]
    pub const fn transaction(&self) -> TransactionId {
        match self {
            Self::Read { transaction, .. }
            | Self::Write { transaction, .. }
            | Self::Commit { transaction } => *transaction,
        }
    }

    /// The data item touched by a read or write; `None` for commits.
    #[must_use]
    pub fn item(&self) -> Option<&str> {
        match self {
            Self::Read { item, .. } | Self::Write { item, .. } => Some(item),
            Self::Commit { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_commit(&self) -> bool {
        matches!(self, Self::Commit { .. })
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Read { transaction, item } => write!(f, "r{}({item})", transaction.0),
            Self::Write { transaction, item } => write!(f, "w{}({item})", transaction.0),
            Self::Commit { transaction } => write!(f, "c{}", transaction.0),
        }
    }
}

impl FromStr for Operation {
    type Err = MalformedOperation;

    fn from_str(token: &str) -> core::result::Result<Self, Self::Err> {
        parse_operation(token)
    }
}
