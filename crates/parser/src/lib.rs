//! Text front ends for `bto_core` histories.
//!
//! - [`parse_operations`] turns a free-text operation list such as
//!   `"r1(x), w1(x) c1"` into operations, reporting every invalid word at once.
//! - [`parse_scenarios`] reads a catalog file of named scenarios, one per line:
//!
//! ```text
//! // comment
//! serial "Simple serial execution" = r1(x) w1(x) c1 r2(x) c2
//! conflict = r1(y), r2(y), w1(y), c2, c1
//! ```

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::ParseError;
pub use lexer::{parse_operations, tokenize, tokenize_with_text, Token, TokenKind};
pub use parser::parse_scenarios;
