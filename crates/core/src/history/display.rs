use alloc::string::String;
use core::fmt::Write;

use crate::operation::Operation;

/// Format a sequence of operations as a space separated token list.
///
/// The output parses back with `Scheduler::load` after splitting on
/// whitespace.
#[must_use]
pub fn format_history(operations: &[Operation]) -> String {
    let mut output = String::new();
    for (i, operation) in operations.iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        let _ = write!(output, "{operation}");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_history() {
        let operations = vec![
            Operation::read(1, "x"),
            Operation::write(1, "x"),
            Operation::commit(1),
        ];
        assert_eq!(format_history(&operations), "r1(x) w1(x) c1");
    }

    #[test]
    fn test_format_history_empty() {
        assert_eq!(format_history(&[]), "");
    }
}
