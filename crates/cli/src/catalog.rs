//! Histories shipped with the binary.

use bto_core::Scenario;
use bto_parser::{parse_scenarios, ParseError};

pub const BUILTIN: &str = "\
// Built-in histories, in catalog file syntax.
serial \"Simple serial execution\" = r1(x) w1(x) c1 r2(x) c2
read_conflict \"Read/write conflict, T1 restarts\" = r1(y) r2(y) w1(y) c2 c1
write_conflict \"Write conflict, T2 restarts\" = w1(z) r2(z) w3(z) w2(z) w2(z) c1 c3 c2
complex_conflict \"Complex conflict, T1 restarted by T3\" = r1(a) w3(a) c3 w1(a) c1
multiple_items \"Multiple data items\" = w1(x) r2(x) w1(y) r2(y) w2(x) w2(y) c1 c2
";

/// Parse the built-in catalog.
///
/// # Errors
///
/// Only if [`BUILTIN`] itself is malformed.
pub fn builtin() -> Result<Vec<Scenario>, ParseError> {
    parse_scenarios(BUILTIN)
}

/// The scenario with `key`, if any.
#[must_use]
pub fn find<'a>(scenarios: &'a [Scenario], key: &str) -> Option<&'a Scenario> {
    scenarios.iter().find(|scenario| scenario.key == key)
}
