//! Winnow-based parser for single operation tokens.
//!
//! Grammar (matched after trimming and lower-casing the token):
//! ```text
//! operation = commit | access
//! commit    = "c" DIGITS
//! access    = ("r" | "w") DIGITS "(" LETTERS ")"
//! ```

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use core::fmt::{Display, Formatter};

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};
use winnow::ModalResult;

use super::{Operation, TransactionId};

/// A token that does not match the operation grammar.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedOperation {
    /// The offending token as it was given.
    pub token: String,
    /// Position of the token within a loaded history, when known.
    pub position: Option<usize>,
}

impl MalformedOperation {
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_owned(),
            position: None,
        }
    }

    /// Attach the position of the token within its history.
    #[must_use]
    pub const fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl Display for MalformedOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "malformed operation `{}`", self.token)?;
        if let Some(position) = self.position {
            write!(f, " at position {position}")?;
        }
        write!(f, ": expected `c<digits>` or `r|w<digits>(<letters>)`")
    }
}

impl core::error::Error for MalformedOperation {}

/// Parse one operation token such as `r1(x)`, `W2(Y)` or ` c3 `.
///
/// Parsing is case-insensitive and ignores surrounding whitespace. Item
/// names are normalised to lower case.
///
/// # Errors
///
/// Returns [`MalformedOperation`] if the token does not match the grammar.
pub fn parse_operation(token: &str) -> Result<Operation, MalformedOperation> {
    let normalized = token.trim().to_ascii_lowercase();
    operation
        .parse(normalized.as_str())
        .map_err(|_| MalformedOperation::new(token))
}

fn transaction_id(input: &mut &str) -> ModalResult<TransactionId> {
    digit1
        .try_map(str::parse::<u64>)
        .map(TransactionId)
        .parse_next(input)
}

fn item(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| c.is_ascii_lowercase())
        .map(ToString::to_string)
        .parse_next(input)
}

/// `"c" DIGITS`
fn commit(input: &mut &str) -> ModalResult<Operation> {
    'c'.parse_next(input)?;
    let transaction = transaction_id.parse_next(input)?;
    Ok(Operation::Commit { transaction })
}

/// `("r" | "w") DIGITS "(" LETTERS ")"`
fn access(input: &mut &str) -> ModalResult<Operation> {
    let kind = one_of(['r', 'w']).parse_next(input)?;
    let transaction = transaction_id.parse_next(input)?;
    let item = delimited('(', item, ')').parse_next(input)?;
    if kind == 'r' {
        Ok(Operation::Read { transaction, item })
    } else {
        Ok(Operation::Write { transaction, item })
    }
}

fn operation(input: &mut &str) -> ModalResult<Operation> {
    alt((commit, access)).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commit() {
        assert_eq!(parse_operation("c1"), Ok(Operation::commit(1)));
        assert_eq!(parse_operation("C42"), Ok(Operation::commit(42)));
    }

    #[test]
    fn test_parse_read_write() {
        assert_eq!(parse_operation("r1(x)"), Ok(Operation::read(1, "x")));
        assert_eq!(parse_operation("w12(item)"), Ok(Operation::write(12, "item")));
    }

    #[test]
    fn test_case_and_whitespace_are_normalised() {
        assert_eq!(parse_operation("  R3(XyZ)\t"), Ok(Operation::read(3, "xyz")));
        assert_eq!(parse_operation("\nW1(A) "), Ok(Operation::write(1, "a")));
    }

    #[test]
    fn test_leading_zeros_are_digits() {
        assert_eq!(parse_operation("r01(x)"), Ok(Operation::read(1, "x")));
    }

    #[test]
    fn test_malformed_tokens() {
        for token in [
            "", "x9(z)", "c", "r(x)", "r1", "r1()", "r1(x", "r1x)", "r1(x1)", "c1(x)", "w1(x)y",
            "r 1(x)", "rr1(x)", "c-1", "r1(_)",
        ] {
            let err = parse_operation(token).expect_err(token);
            assert_eq!(err.token, token);
            assert_eq!(err.position, None);
        }
    }

    #[test]
    fn test_overflowing_id_is_malformed() {
        assert!(parse_operation("c99999999999999999999999").is_err());
    }

    #[test]
    fn test_malformed_display() {
        let err = MalformedOperation::new("x9(z)").at(4);
        let msg = err.to_string();
        assert!(msg.contains("`x9(z)`"), "{msg}");
        assert!(msg.contains("position 4"), "{msg}");
    }
}
