use oxsdatatypes::{Boolean, DateTime, Double, Integer};
use std::cmp::Ordering;
use std::fmt;

/// A typed RDF-style value.
///
/// Every case is totally ordered by its canonical string form ([`Value::string_of`]);
/// `Value` itself derives `Ord` from that same comparison so the two never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An absolute or prefixed resource identifier.
    Iri(String),
    /// A blank node with a local name.
    BlankNode(String),
    /// A plain string literal.
    String(String),
    /// A literal tagged with a BCP-47 language tag.
    LangString { value: String, language: String },
    /// A literal tagged with a datatype IRI that isn't one of the native cases below.
    TypedString { value: String, datatype: String },
    /// A native-typed integer literal.
    Int(Integer),
    /// A native-typed floating point literal.
    Float(Double),
    /// A native-typed boolean literal.
    Bool(Boolean),
    /// A native-typed point in time.
    Time(DateTime),
    /// Uninterpreted string form, used during parsing before classification.
    Raw(String),
}

impl Value {
    /// Builds an IRI value without validating it. Use [`Value::parse_iri`]
    /// for untrusted input.
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// Builds an IRI value, validating it per RFC 3987.
    pub fn parse_iri(iri: impl Into<String>) -> Result<Self, oxiri::IriParseError> {
        let iri = oxiri::Iri::parse(iri.into())?;
        Ok(Self::Iri(iri.into_inner()))
    }

    pub fn blank_node(name: impl Into<String>) -> Self {
        Self::BlankNode(name.into())
    }

    pub fn plain(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn lang_string(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::LangString {
            value: value.into(),
            language: language.into(),
        }
    }

    /// Builds a language-tagged literal, validating the tag per BCP-47.
    pub fn parse_lang_string(
        value: impl Into<String>,
        language: impl AsRef<str>,
    ) -> Result<Self, oxilangtag::LanguageTagParseError> {
        let language = oxilangtag::LanguageTag::parse(language.as_ref().to_owned())?;
        Ok(Self::LangString {
            value: value.into(),
            language: language.into_inner(),
        })
    }

    pub fn typed_string(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::TypedString {
            value: value.into(),
            datatype: datatype.into(),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Iri(_) | Self::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        !self.is_node() && !matches!(self, Self::Raw(_))
    }

    /// Classifies a [`Value::Raw`] by trying the native numeric/boolean/time
    /// lexical forms first, then falling back to a plain string. Non-`Raw`
    /// values are returned unchanged.
    #[must_use]
    pub fn classify(self) -> Self {
        let Self::Raw(text) = self else {
            return self;
        };
        if let Ok(i) = text.parse::<Integer>() {
            return Self::Int(i);
        }
        if let Ok(f) = text.parse::<Double>() {
            return Self::Float(f);
        }
        if let Ok(b) = text.parse::<Boolean>() {
            return Self::Bool(b);
        }
        if let Ok(t) = text.parse::<DateTime>() {
            return Self::Time(t);
        }
        Self::String(text)
    }

    /// The canonical total-order string form used to intern and to sort this value.
    pub fn string_of(&self) -> String {
        match self {
            Self::Iri(iri) => format!("<{iri}>"),
            Self::BlankNode(name) => format!("_:{name}"),
            Self::String(value) => format!("\"{}\"", escape_literal(value)),
            Self::LangString { value, language } => {
                format!("\"{}\"@{language}", escape_literal(value))
            }
            Self::TypedString { value, datatype } => {
                format!("\"{}\"^^<{datatype}>", escape_literal(value))
            }
            Self::Int(i) => format!(
                "\"{i}\"^^<http://www.w3.org/2001/XMLSchema#integer>"
            ),
            Self::Float(f) => format!(
                "\"{f}\"^^<http://www.w3.org/2001/XMLSchema#double>"
            ),
            Self::Bool(b) => format!(
                "\"{b}\"^^<http://www.w3.org/2001/XMLSchema#boolean>"
            ),
            Self::Time(t) => format!(
                "\"{t}\"^^<http://www.w3.org/2001/XMLSchema#dateTime>"
            ),
            Self::Raw(text) => format!("\u{0}raw\u{0}{text}"),
        }
    }
}

impl Eq for Value {}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.string_of().cmp(&other.string_of())
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.string_of())
    }
}

/// Escapes a literal value body for the textual quad grammar: `\`, `"`,
/// newline and carriage return are backslash-escaped; everything else is left
/// as-is (non-ASCII characters may optionally be `\uXXXX`/`\UXXXXXXXX`-escaped
/// by writers, but are not required to be — see [`unescape`]).
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// The error produced by [`unescape`] on a malformed escape sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnescapeError {
    #[error("dangling backslash at end of literal")]
    DanglingBackslash,
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid \\u/\\U unicode escape")]
    InvalidUnicodeEscape,
}

/// Reverses [`escape_literal`] and additionally understands `\uXXXX` and
/// `\UXXXXXXXX` Unicode escapes.
pub fn unescape(value: &str) -> Result<String, UnescapeError> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next().ok_or(UnescapeError::DanglingBackslash)? {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'u' => out.push(read_hex_escape(&mut chars, 4)?),
            'U' => out.push(read_hex_escape(&mut chars, 8)?),
            other => return Err(UnescapeError::InvalidEscape(other)),
        }
    }
    Ok(out)
}

fn read_hex_escape(
    chars: &mut std::str::Chars<'_>,
    digits: usize,
) -> Result<char, UnescapeError> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(UnescapeError::InvalidUnicodeEscape)?;
        value = value * 16 + digit;
    }
    char::from_u32(value).ok_or(UnescapeError::InvalidUnicodeEscape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_of_distinguishes_cases() {
        let iri = Value::iri("http://example.com/foo");
        let bnode = Value::blank_node("foo");
        let string = Value::plain("foo");
        assert_ne!(iri.string_of(), bnode.string_of());
        assert_ne!(bnode.string_of(), string.string_of());
        assert_ne!(iri.string_of(), string.string_of());
    }

    #[test]
    fn ordering_is_total_and_stable() {
        let mut values = vec![
            Value::iri("http://example.com/b"),
            Value::iri("http://example.com/a"),
            Value::plain("zeta"),
            Value::blank_node("x"),
        ];
        values.sort();
        let sorted_strings: Vec<_> = values.iter().map(Value::string_of).collect();
        let mut expected = sorted_strings.clone();
        expected.sort();
        assert_eq!(sorted_strings, expected);
    }

    #[test]
    fn escape_round_trips() {
        let original = "line1\nline2\t\"quoted\"\\";
        let escaped = escape_literal(original);
        assert_eq!(unescape(&escaped).unwrap(), original);
    }

    #[test]
    fn unicode_escape_round_trip() {
        assert_eq!(unescape("caf\\u00e9").unwrap(), "café");
        assert_eq!(unescape("\\U0001F600").unwrap(), "\u{1F600}");
    }

    #[test]
    fn classify_recognizes_native_types() {
        assert_eq!(Value::Raw("42".into()).classify(), Value::Int(42.into()));
        assert_eq!(
            Value::Raw("true".into()).classify(),
            Value::Bool(true.into())
        );
        assert_eq!(
            Value::Raw("not a number".into()).classify(),
            Value::String("not a number".into())
        );
    }
}
