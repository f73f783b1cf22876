/// A parse error with human-readable location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// 1-based.
    pub line: usize,
    /// 1-based, in bytes.
    pub column: usize,
}

impl ParseError {
    /// Build an error located at byte `offset` of `input`.
    #[must_use]
    pub fn at_offset(input: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = offset_to_line_col(input, offset);
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Convert a byte offset into the original input to 1-based (line, column).
pub(crate) fn offset_to_line_col(input: &str, offset: usize) -> (usize, usize) {
    let safe_offset = offset.min(input.len());
    let prefix = input.get(..safe_offset).unwrap_or(input);
    let line = prefix.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = prefix
        .rfind('\n')
        .map_or_else(|| prefix.len() + 1, |pos| prefix.len() - pos);
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_line_col() {
        assert_eq!(offset_to_line_col("hello\nworld\n", 0), (1, 1));
        assert_eq!(offset_to_line_col("hello\nworld\n", 6), (2, 1));
        assert_eq!(offset_to_line_col("hello\nworld\n", 8), (2, 3));
        assert_eq!(offset_to_line_col("ab", 99), (1, 3));
    }

    #[test]
    fn test_display() {
        let err = ParseError::at_offset("a\nbc", 3, "bad");
        assert_eq!(err.to_string(), "parse error at line 2, column 2: bad");
    }
}
