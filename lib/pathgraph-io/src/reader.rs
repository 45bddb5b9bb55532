use std::io::{BufRead, Lines};

use pathgraph_model::oxsdatatypes::{Boolean, DateTime, Double, Integer};
use pathgraph_model::{unescape, Quad, Value};

use crate::error::QuadIoError;

const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// A lazy finite sequence of [`Quad`]s, fallible per element. Any iterator
/// of `Result<Quad, QuadIoError>` already satisfies
/// this; external collaborators (loaders backed by other formats) implement
/// it directly rather than going through [`LineQuadReader`].
pub trait QuadReader: Iterator<Item = Result<Quad, QuadIoError>> {}

impl<T: Iterator<Item = Result<Quad, QuadIoError>>> QuadReader for T {}

/// Parses the line-oriented quad grammar: one quad per line,
/// `subject predicate object [label] .`, terminated by `Read`'s own line
/// breaks. Blank lines are skipped.
pub struct LineQuadReader<R> {
    lines: Lines<R>,
    line_no: u64,
}

impl<R: BufRead> LineQuadReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for LineQuadReader<R> {
    type Item = Result<Quad, QuadIoError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            match parse_quad_line(&line, self.line_no) {
                Ok(Some(quad)) => return Some(Ok(quad)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn syntax(line: u64, message: impl Into<String>) -> QuadIoError {
    QuadIoError::Syntax {
        line,
        message: message.into(),
    }
}

fn parse_quad_line(line: &str, line_no: u64) -> Result<Option<Quad>, QuadIoError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let (subject, rest) = parse_term(trimmed, line_no)?;
    let (predicate, rest) = parse_term(rest, line_no)?;
    let (object, rest) = parse_term(rest, line_no)?;
    let rest = rest.trim_start();
    let (label, rest) = if rest.starts_with('.') {
        (None, rest)
    } else {
        let (label, rest) = parse_term(rest, line_no)?;
        (Some(label), rest)
    };
    let rest = rest.trim_start();
    if !rest.starts_with('.') {
        return Err(syntax(line_no, "expected terminating '.'"));
    }
    Ok(Some(Quad::new(subject, predicate, object, label)))
}

/// Parses one leading term off `input`, returning it and the unconsumed
/// remainder. Recognizes the four term shapes: `<iri>`, `_:name`, a
/// quoted literal (optionally `@lang` or `^^<iri>`-suffixed).
fn parse_term(input: &str, line_no: u64) -> Result<(Value, &str), QuadIoError> {
    let input = input.trim_start();
    match input.as_bytes().first() {
        Some(b'<') => {
            let body = &input[1..];
            let end = memchr::memchr(b'>', body.as_bytes())
                .ok_or_else(|| syntax(line_no, "unterminated IRI"))?;
            Ok((Value::iri(&body[..end]), &body[end + 1..]))
        }
        Some(b'_') if input.starts_with("_:") => {
            let body = &input[2..];
            let end = body
                .find(|c: char| c.is_whitespace())
                .unwrap_or(body.len());
            Ok((Value::blank_node(&body[..end]), &body[end..]))
        }
        Some(b'"') => parse_literal(input, line_no),
        _ => Err(syntax(line_no, "unrecognized term")),
    }
}

fn parse_literal(input: &str, line_no: u64) -> Result<(Value, &str), QuadIoError> {
    let body = &input[1..];
    let end = find_unescaped_quote(body.as_bytes())
        .ok_or_else(|| syntax(line_no, "unterminated literal"))?;
    let raw_body = &body[..end];
    let value = unescape(raw_body).map_err(|source| QuadIoError::BadEscape {
        line: line_no,
        source,
    })?;
    let mut remainder = &body[end + 1..];

    if let Some(tail) = remainder.strip_prefix('@') {
        let tag_end = tail
            .find(|c: char| c.is_whitespace())
            .unwrap_or(tail.len());
        let language = tail[..tag_end].to_string();
        remainder = &tail[tag_end..];
        return Ok((Value::lang_string(value, language), remainder));
    }

    if let Some(tail) = remainder.strip_prefix("^^") {
        let tail = tail.trim_start();
        if !tail.starts_with('<') {
            return Err(syntax(line_no, "expected datatype IRI after '^^'"));
        }
        let datatype_body = &tail[1..];
        let datatype_end = memchr::memchr(b'>', datatype_body.as_bytes())
            .ok_or_else(|| syntax(line_no, "unterminated datatype IRI"))?;
        let datatype = datatype_body[..datatype_end].to_string();
        remainder = &datatype_body[datatype_end + 1..];
        return Ok((literal_with_datatype(value, datatype), remainder));
    }

    Ok((Value::plain(value), remainder))
}

/// Upgrades a literal body to a native type when its datatype IRI is one of
/// the four XSD cases the value model carries natively, mirroring [`Value::classify`] but
/// driven by the explicit datatype instead of trial parsing.
fn literal_with_datatype(value: String, datatype: String) -> Value {
    match datatype.as_str() {
        XSD_INTEGER => value
            .parse::<Integer>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::typed_string(value, datatype)),
        XSD_DOUBLE => value
            .parse::<Double>()
            .map(Value::Float)
            .unwrap_or_else(|_| Value::typed_string(value, datatype)),
        XSD_BOOLEAN => value
            .parse::<Boolean>()
            .map(Value::Bool)
            .unwrap_or_else(|_| Value::typed_string(value, datatype)),
        XSD_DATETIME => value
            .parse::<DateTime>()
            .map(Value::Time)
            .unwrap_or_else(|_| Value::typed_string(value, datatype)),
        _ => Value::typed_string(value, datatype),
    }
}

/// Finds the first `"` in `bytes` not preceded by an odd run of backslashes.
fn find_unescaped_quote(bytes: &[u8]) -> Option<usize> {
    let mut start = 0;
    loop {
        let idx = start + memchr::memchr(b'"', &bytes[start..])?;
        let mut backslashes = 0;
        let mut j = idx;
        while j > 0 && bytes[j - 1] == b'\\' {
            backslashes += 1;
            j -= 1;
        }
        if backslashes % 2 == 0 {
            return Some(idx);
        }
        start = idx + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_triple() {
        let mut reader = LineQuadReader::new(
            "<http://example.test/alice> <http://example.test/follows> <http://example.test/bob> .\n"
                .as_bytes(),
        );
        let quad = reader.next().expect("one quad").expect("valid quad");
        assert_eq!(quad.subject, Value::iri("http://example.test/alice"));
        assert_eq!(quad.object, Value::iri("http://example.test/bob"));
        assert!(quad.label.is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn parses_a_labeled_quad_with_a_string_literal() {
        let mut reader = LineQuadReader::new(
            "<http://example.test/bob> <http://example.test/status> \"cool\" <http://example.test/g> .\n"
                .as_bytes(),
        );
        let quad = reader.next().expect("one quad").expect("valid quad");
        assert_eq!(quad.object, Value::plain("cool"));
        assert_eq!(quad.label, Some(Value::iri("http://example.test/g")));
    }

    #[test]
    fn upgrades_xsd_integer_datatype_to_a_native_int() {
        let mut reader = LineQuadReader::new(
            "<http://example.test/p> <http://example.test/age> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n"
                .as_bytes(),
        );
        let quad = reader.next().expect("one quad").expect("valid quad");
        assert_eq!(quad.object, Value::Int(42.into()));
    }

    #[test]
    fn skips_blank_lines() {
        let mut reader = LineQuadReader::new(
            "\n<http://example.test/a> <http://example.test/b> <http://example.test/c> .\n\n"
                .as_bytes(),
        );
        assert!(reader.next().expect("one quad").is_ok());
        assert!(reader.next().is_none());
    }

    #[test]
    fn reports_unterminated_iri() {
        let mut reader =
            LineQuadReader::new("<http://example.test/a <http://example.test/b> .\n".as_bytes());
        assert!(matches!(
            reader.next(),
            Some(Err(QuadIoError::Syntax { .. }))
        ));
    }
}
