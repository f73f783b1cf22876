/// Winnow-based parser for scenario catalog files.
///
/// Grammar:
/// ```text
/// file       = (line (NEWLINE line)*)?
/// line       = WS? (comment | scenario)? WS?
/// comment    = "//" REST_OF_LINE
/// scenario   = key WS? title? WS? "=" operations comment?
/// key        = [A-Za-z0-9_-]+
/// title      = '"' [^"\n]* '"'
/// operations = (SEP* operation)* SEP*
/// SEP        = " " | "\t" | ","
/// ```
use bto_core::{parse_operation, Operation, Scenario};
use winnow::ascii::{line_ending, till_line_ending};
use winnow::combinator::{cut_err, delimited, eof, opt, preceded};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};
use winnow::ModalResult;

use crate::error::ParseError;

/// Parse a scenario catalog into scenarios, in file order.
///
/// # Errors
///
/// Returns a [`ParseError`] with line/column information when the input does
/// not conform to the grammar or an operation is malformed.
pub fn parse_scenarios(input: &str) -> Result<Vec<Scenario>, ParseError> {
    let mut stream: &str = input;
    scenario_file.parse_next(&mut stream).map_err(|e| {
        let consumed = input.len().saturating_sub(stream.len());
        ParseError::at_offset(input, consumed, e.to_string())
    })
}

/// Spaces and tabs.
fn inline_ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., [' ', '\t']).void().parse_next(input)
}

fn comment(input: &mut &str) -> ModalResult<()> {
    ("//", till_line_ending).void().parse_next(input)
}

fn key<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        .context(StrContext::Label("scenario key"))
        .parse_next(input)
}

/// `"` TEXT `"`
fn title<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited(
        '"',
        take_till(0.., ['"', '\n']),
        cut_err('"').context(StrContext::Expected(StrContextValue::CharLiteral('"'))),
    )
    .parse_next(input)
}

fn operation(input: &mut &str) -> ModalResult<Operation> {
    cut_err(take_while(1.., |c: char| !c.is_whitespace() && c != ',').try_map(parse_operation))
        .context(StrContext::Label("operation"))
        .context(StrContext::Expected(StrContextValue::Description(
            "r<n>(<item>), w<n>(<item>) or c<n>",
        )))
        .parse_next(input)
}

fn operations(input: &mut &str) -> ModalResult<Vec<Operation>> {
    let mut operations = Vec::new();
    loop {
        take_while(0.., [' ', '\t', ',']).parse_next(input)?;
        if input.is_empty() || input.starts_with(['\n', '\r']) || input.starts_with("//") {
            return Ok(operations);
        }
        operations.push(operation.parse_next(input)?);
    }
}

/// `key "title" = ops`
fn scenario(input: &mut &str) -> ModalResult<Scenario> {
    let key = key.parse_next(input)?;
    inline_ws.parse_next(input)?;
    let title = opt(title).parse_next(input)?;
    inline_ws.parse_next(input)?;
    cut_err('=')
        .context(StrContext::Expected(StrContextValue::CharLiteral('=')))
        .parse_next(input)?;
    let operations = operations.parse_next(input)?;
    opt(comment).parse_next(input)?;

    let scenario = Scenario::new(key, operations);
    Ok(match title {
        Some(title) => scenario.with_title(title.trim()),
        None => scenario,
    })
}

/// One line without its terminator. Blank and comment lines yield `None`.
fn line(input: &mut &str) -> ModalResult<Option<Scenario>> {
    inline_ws.parse_next(input)?;
    let scenario = if input.starts_with("//") {
        comment.parse_next(input)?;
        None
    } else if input.is_empty() || input.starts_with(['\n', '\r']) {
        None
    } else {
        Some(scenario.parse_next(input)?)
    };
    inline_ws.parse_next(input)?;
    Ok(scenario)
}

fn scenario_file(input: &mut &str) -> ModalResult<Vec<Scenario>> {
    let mut scenarios = Vec::new();
    loop {
        if let Some(scenario) = line.parse_next(input)? {
            scenarios.push(scenario);
        }
        if opt(eof).parse_next(input)?.is_some() {
            return Ok(scenarios);
        }
        preceded(
            opt('\r'),
            cut_err(line_ending).context(StrContext::Expected(StrContextValue::Description(
                "end of line",
            ))),
        )
        .parse_next(input)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_scenario() {
        let result = parse_scenarios("serial = r1(x) w1(x) c1\n").expect("should parse");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].key, "serial");
        assert_eq!(result[0].title, None);
        assert_eq!(
            result[0].operations,
            vec![
                Operation::read(1, "x"),
                Operation::write(1, "x"),
                Operation::commit(1)
            ]
        );
    }

    #[test]
    fn test_title_and_commas() {
        let result =
            parse_scenarios("read_conflict \"Read conflict\" = r1(y), r2(y),w1(y) , c2, c1")
                .expect("should parse");
        assert_eq!(result[0].title.as_deref(), Some("Read conflict"));
        assert_eq!(result[0].display_name(), "Read conflict");
        assert_eq!(result[0].operations.len(), 5);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let input = "\
// catalog

a = r1(x) // trailing comment
   \t
b=c1
// end
";
        let result = parse_scenarios(input).expect("should parse");
        let keys: Vec<&str> = result.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(result[0].operations, vec![Operation::read(1, "x")]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let result = parse_scenarios("a = c1\r\nb = c2\r\n").expect("should parse");
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].operations, vec![Operation::commit(2)]);
    }

    #[test]
    fn test_empty_scenario_and_empty_file() {
        let result = parse_scenarios("empty =\n").expect("should parse");
        assert!(result[0].operations.is_empty());
        assert_eq!(parse_scenarios(""), Ok(Vec::new()));
    }

    #[test]
    fn test_malformed_operation_location() {
        let err = parse_scenarios("ok = c1\nbad = r1(x), x9(z)\n").expect_err("should fail");
        assert_eq!((err.line, err.column), (2, 14));
        assert!(err.to_string().contains("operation"), "{err}");
    }

    #[test]
    fn test_missing_equals() {
        let err = parse_scenarios("serial r1(x)\n").expect_err("should fail");
        assert_eq!((err.line, err.column), (1, 8));
    }

    #[test]
    fn test_unterminated_title() {
        let err = parse_scenarios("a \"open = c1\n").expect_err("should fail");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_line_not_starting_with_key() {
        let err = parse_scenarios("a = c1\n  @bad\n").expect_err("should fail");
        assert_eq!((err.line, err.column), (2, 3));
    }
}
