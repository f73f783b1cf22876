//! Logos-based lexer for free-text operation lists.
//!
//! Operations are separated by commas, whitespace or newlines; `//` starts a
//! comment running to the end of the line. Anything else that is not a
//! well-formed operation is lexed as a [`TokenKind::Word`] so it can be
//! reported.
//!
//! # Example input
//!
//! ```text
//! // read conflict
//! r1(y), r2(y), w1(y)
//! c2 c1
//! ```

use core::ops::Range;

use bto_core::{parse_operation, Operation};

use crate::error::ParseError;

/// All token kinds produced by the operation-list lexer.
#[derive(::logos::Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A line comment starting with `//` and running to end of line.
    #[regex(r"//[^\n]*", priority = 10, allow_greedy = true)]
    Comment,

    /// `c` followed by a transaction id, e.g. `c3`.
    #[regex(r"[cC][0-9]+", priority = 5)]
    Commit,

    /// A read or write with its item, e.g. `r1(x)` or `W2(Y)`.
    #[regex(r"[rRwW][0-9]+\([a-zA-Z]+\)", priority = 5)]
    Access,

    #[token(",")]
    Comma,

    #[token("\n")]
    Newline,

    /// Spaces, tabs and carriage returns.
    #[regex(r"[ \t\r]+")]
    Whitespace,

    /// Any other run of non-separator characters.
    #[regex(r"[^\s,]+", priority = 1)]
    Word,
}

/// A single token with its kind and the byte-offset span in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range `start..end` into the original input string.
    pub span: Range<usize>,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    /// Return the source text for this token given the original input.
    #[must_use]
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.span.clone()]
    }
}

/// Tokenize `input`. Characters the lexer cannot recognise become
/// [`TokenKind::Word`] tokens.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    use logos::Logos as _;
    TokenKind::lexer(input)
        .spanned()
        .map(|(result, span)| Token::new(result.unwrap_or(TokenKind::Word), span))
        .collect()
}

/// Tokenize `input` and return tokens paired with their source text slices.
#[must_use]
pub fn tokenize_with_text(input: &str) -> Vec<(Token, &str)> {
    tokenize(input)
        .into_iter()
        .map(|token| {
            let text = token.text(input);
            (token, text)
        })
        .collect()
}

/// Parse a free-text operation list into operations, in order.
///
/// # Errors
///
/// Returns a [`ParseError`] located at the first invalid word, whose message
/// lists every invalid word in the input.
pub fn parse_operations(input: &str) -> Result<Vec<Operation>, ParseError> {
    let mut operations = Vec::new();
    let mut invalid: Vec<(usize, &str)> = Vec::new();

    for (token, text) in tokenize_with_text(input) {
        match token.kind {
            TokenKind::Commit | TokenKind::Access | TokenKind::Word => {
                match parse_operation(text) {
                    Ok(operation) => operations.push(operation),
                    Err(_) => invalid.push((token.span.start, text)),
                }
            }
            TokenKind::Comment | TokenKind::Comma | TokenKind::Newline | TokenKind::Whitespace => {}
        }
    }

    let Some(&(offset, _)) = invalid.first() else {
        return Ok(operations);
    };
    let words = invalid
        .iter()
        .map(|(_, text)| format!("`{text}`"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(ParseError::at_offset(
        input,
        offset,
        format!("invalid operations: {words}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_list() {
        assert_eq!(
            kinds("r1(x), w1(x)\nc1"),
            vec![
                TokenKind::Access,
                TokenKind::Comma,
                TokenKind::Whitespace,
                TokenKind::Access,
                TokenKind::Newline,
                TokenKind::Commit,
            ]
        );
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        let ks = kinds("// r1(x) ignored\nc1");
        assert_eq!(ks, vec![TokenKind::Comment, TokenKind::Newline, TokenKind::Commit]);
    }

    #[test]
    fn test_near_misses_are_words() {
        assert_eq!(kinds("c1x"), vec![TokenKind::Word]);
        assert_eq!(kinds("r1(x"), vec![TokenKind::Word]);
        assert_eq!(kinds("x9(z)"), vec![TokenKind::Word]);
    }

    #[test]
    fn test_token_text() {
        let tokens = tokenize_with_text("  W2(Y)");
        assert_eq!(tokens[1].1, "W2(Y)");
        assert_eq!(tokens[1].0.span, 2..7);
    }

    #[test]
    fn test_parse_operations() {
        let ops = parse_operations("r1(y), r2(y) W1(Y)\n// done\nc2,c1\n").unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::read(1, "y"),
                Operation::read(2, "y"),
                Operation::write(1, "y"),
                Operation::commit(2),
                Operation::commit(1),
            ]
        );
    }

    #[test]
    fn test_parse_operations_empty() {
        assert_eq!(parse_operations(" ,\n// nothing\n"), Ok(Vec::new()));
    }

    #[test]
    fn test_parse_operations_reports_every_invalid_word() {
        let err = parse_operations("r1(x)\n  x9(z), c1, foo").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
        assert_eq!(err.message, "invalid operations: `x9(z)`, `foo`");
    }

    #[test]
    fn test_parse_operations_rejects_overflowing_id() {
        let err = parse_operations("c99999999999999999999999").unwrap_err();
        assert_eq!((err.line, err.column), (1, 1));
    }
}
