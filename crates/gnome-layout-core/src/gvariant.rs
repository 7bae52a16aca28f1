//! GVariant string-array literals
//!
//! dconf stores `enabled-extensions` as a GVariant text literal of type `as`:
//!
//! ```text
//! array   := [ "@as" ] "[" [ string { "," string } ] "]"
//! string  := "'" { char | escape } "'" | '"' { char | escape } '"'
//! escape  := "\" ( "\" | "'" | '"' | "n" | "t" | "r" | "u" hex{4} )
//! ```
//!
//! Whitespace is allowed between tokens. Anything else is a parse error;
//! stored values are never evaluated.

use crate::error::{Error, Result};

const CONTEXT: &str = "string array";
const TYPE_ANNOTATION: &str = "@as";

/// Parse a GVariant `as` literal into its strings, in stored order
pub fn parse_string_array(input: &str) -> Result<Vec<String>> {
    let mut parser = Parser::new(input);
    let items = parser.array()?;
    parser.skip_ws();
    if let Some((pos, c)) = parser.peek() {
        return Err(parser.error(pos, format!("unexpected {c:?} after closing ']'")));
    }
    Ok(items)
}

/// Format strings as a GVariant `as` literal
///
/// Uses single quotes like `dconf dump`; the empty array is written `@as []`
/// so the type survives a `dconf load`.
pub fn format_string_array<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let quoted: Vec<String> = items.into_iter().map(|s| quote(s.as_ref())).collect();
    if quoted.is_empty() {
        format!("{TYPE_ANNOTATION} []")
    } else {
        format!("[{}]", quoted.join(", "))
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn error(&self, pos: usize, message: impl Into<String>) -> Error {
        Error::parse(CONTEXT, format!("{} (at byte {})", message.into(), pos))
    }

    fn eof_error(&self, message: &str) -> Error {
        self.error(self.input.len(), message)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.chars.next() {
            Some((_, c)) if c == expected => Ok(()),
            Some((pos, c)) => Err(self.error(pos, format!("expected {expected:?}, found {c:?}"))),
            None => Err(self.eof_error(&format!("expected {expected:?}, found end of input"))),
        }
    }

    fn array(&mut self) -> Result<Vec<String>> {
        self.skip_ws();
        if let Some((pos, '@')) = self.peek() {
            if !self.input[pos..].starts_with(TYPE_ANNOTATION) {
                return Err(self.error(pos, "only the '@as' type annotation is supported"));
            }
            for _ in 0..TYPE_ANNOTATION.len() {
                self.chars.next();
            }
            self.skip_ws();
        }

        self.expect('[')?;
        self.skip_ws();

        let mut items = Vec::new();
        if let Some((_, ']')) = self.peek() {
            self.chars.next();
            return Ok(items);
        }

        loop {
            self.skip_ws();
            items.push(self.string()?);
            self.skip_ws();
            match self.chars.next() {
                Some((_, ',')) => continue,
                Some((_, ']')) => return Ok(items),
                Some((pos, c)) => {
                    return Err(self.error(pos, format!("expected ',' or ']', found {c:?}")))
                }
                None => return Err(self.eof_error("unterminated array")),
            }
        }
    }

    fn string(&mut self) -> Result<String> {
        let quote = match self.chars.next() {
            Some((_, c @ ('\'' | '"'))) => c,
            Some((pos, c)) => {
                return Err(self.error(pos, format!("expected quoted string, found {c:?}")))
            }
            None => return Err(self.eof_error("expected quoted string")),
        };

        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == quote => return Ok(out),
                Some((pos, '\\')) => out.push(self.escape(pos)?),
                Some((_, c)) => out.push(c),
                None => return Err(self.eof_error("unterminated string")),
            }
        }
    }

    fn escape(&mut self, start: usize) -> Result<char> {
        match self.chars.next() {
            Some((_, '\\')) => Ok('\\'),
            Some((_, '\'')) => Ok('\''),
            Some((_, '"')) => Ok('"'),
            Some((_, 'n')) => Ok('\n'),
            Some((_, 't')) => Ok('\t'),
            Some((_, 'r')) => Ok('\r'),
            Some((_, 'u')) => {
                let mut hex = String::with_capacity(4);
                for _ in 0..4 {
                    match self.chars.next() {
                        Some((_, c)) if c.is_ascii_hexdigit() => hex.push(c),
                        _ => return Err(self.error(start, "invalid \\u escape")),
                    }
                }
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error(start, "invalid \\u escape"))
            }
            Some((_, c)) => Err(self.error(start, format!("unsupported escape '\\{c}'"))),
            None => Err(self.eof_error("unterminated escape")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("['foo@bar.org', 'baz@qux.org']", &["foo@bar.org", "baz@qux.org"] ; "dconf style")]
    #[test_case("[\"a@b\",\"c@d\"]", &["a@b", "c@d"] ; "double quotes no spaces")]
    #[test_case("@as []", &[] ; "typed empty")]
    #[test_case("[]", &[] ; "untyped empty")]
    #[test_case("  [ 'x@y' ]  ", &["x@y"] ; "surrounding whitespace")]
    #[test_case("['it\\'s@x', 'back\\\\slash']", &["it's@x", "back\\slash"] ; "escapes")]
    #[test_case("['']", &[""] ; "empty member kept by codec")]
    #[test_case("['\\u00e9@x']", &["\u{e9}@x"] ; "unicode escape")]
    fn test_parse_valid(input: &str, expected: &[&str]) {
        assert_eq!(parse_string_array(input).unwrap(), expected);
    }

    #[test_case("" ; "empty input")]
    #[test_case("['a'" ; "unterminated array")]
    #[test_case("['a]" ; "unterminated string")]
    #[test_case("['a',]" ; "trailing comma")]
    #[test_case("['a'] x" ; "trailing garbage")]
    #[test_case("[a]" ; "bare word")]
    #[test_case("__import__('os')" ; "not a literal")]
    #[test_case("@au []" ; "wrong type")]
    #[test_case("['\\q']" ; "unknown escape")]
    #[test_case("['a' 'b']" ; "missing comma")]
    fn test_parse_invalid(input: &str) {
        let err = parse_string_array(input).unwrap_err();
        assert!(err.is_parse_error(), "{input:?} gave {err}");
    }

    #[test]
    fn test_format() {
        assert_eq!(format_string_array(Vec::<String>::new()), "@as []");
        assert_eq!(
            format_string_array(["a@x.org", "b@y.org"]),
            "['a@x.org', 'b@y.org']"
        );
        assert_eq!(format_string_array(["it's"]), "['it\\'s']");
    }

    #[test]
    fn test_format_then_parse_preserves_awkward_strings() {
        let items = vec!["quote'd".to_string(), "tab\there".to_string(), "\\".to_string()];
        let parsed = parse_string_array(&format_string_array(&items)).unwrap();
        assert_eq!(parsed, items);
    }
}
