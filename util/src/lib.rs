use std::{
    fs::File,
    io::Read,
    path::Path,
};

use anyhow::{Context, Result};
use miette::{GraphicalReportHandler, GraphicalTheme, SourceSpan};
use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    error::{FromExternalError, ParseError},
    sequence::tuple,
    Finish, IResult,
};

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
#[error("bad input")]
struct BadInput<'a> {
    #[source_code]
    src: &'a str,

    #[label("{reason}")]
    bad_bit: SourceSpan,

    reason: String,
}

pub fn parse_number<'a, E>(i: &'a str) -> IResult<&'a str, i64, E>
where
    E: ParseError<&'a str> + FromExternalError<&'a str, std::num::ParseIntError>,
{
    map_res(recognize(tuple((opt(char('-')), digit1))), |s: &'a str| {
        s.parse::<i64>()
    })(i)
}

/// Parses a whole token as a signed integer, surrounding whitespace allowed.
pub fn number(token: &str) -> Option<i64> {
    all_consuming(parse_number::<nom::error::Error<&str>>)(token.trim())
        .finish()
        .ok()
        .map(|(_, n)| n)
}

/// Like [`number`], but malformed tokens count as zero.
pub fn number_or_zero(token: &str) -> i64 {
    number(token).unwrap_or(0)
}

/// Byte span of the 1-based `line` in `src`, without its line ending.
pub fn line_span(src: &str, line: usize) -> Option<SourceSpan> {
    let mut offset = 0;
    for (n, l) in src.split_inclusive('\n').enumerate() {
        if n + 1 == line {
            let text = l.trim_end_matches(&['\n', '\r'][..]);
            return Some((offset, text.len()).into());
        }
        offset += l.len();
    }
    None
}

/// Renders `reason` as a label under `line` of `src`.
pub fn render_bad_input(src: &str, line: usize, reason: &str) -> Result<String> {
    let err = BadInput {
        src,
        bad_bit: line_span(src, line).unwrap_or_else(|| (src.len(), 0).into()),
        reason: reason.to_string(),
    };

    let mut s = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .render_report(&mut s, &err)?;
    Ok(s)
}

pub fn read_input_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    let mut file = File::open(path)
        .with_context(|| format!("unable to open input file: {}", path.display()))?;

    let mut input = String::new();
    file.read_to_string(&mut input)
        .with_context(|| format!("failed to read input file: {}", path.display()))?;

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("19", Some(19))]
    #[case(" 79 ", Some(79))]
    #[case("-4", Some(-4))]
    #[case("old", None)]
    #[case("", None)]
    #[case("12a", None)]
    fn numbers(#[case] token: &str, #[case] expected: Option<i64>) {
        assert_eq!(number(token), expected);
        assert_eq!(number_or_zero(token), expected.unwrap_or(0));
    }

    #[test]
    fn line_spans() {
        let src = "Monkey 0:\r\n  Starting items: 1\nlast";
        assert_eq!(line_span(src, 1), Some((0, 9).into()));
        assert_eq!(line_span(src, 2), Some((11, 19).into()));
        assert_eq!(line_span(src, 3), Some((31, 4).into()));
        assert_eq!(line_span(src, 4), None);
    }

    #[test]
    fn bad_input_is_labelled() {
        let src = "Monkey 0:\n  Operation: new = old % 3\n";
        let report = render_bad_input(src, 2, "unknown operator `%`").unwrap();
        assert!(report.contains("bad input"));
        assert!(report.contains("Operation: new = old % 3"));
        assert!(report.contains("unknown operator `%`"));
    }

    #[test]
    fn missing_file() {
        let err = read_input_file("no/such/dir/input.txt").unwrap_err();
        assert!(err.to_string().starts_with("unable to open input file"));
    }
}
