//! Splitting raw text into space-delimited fields.
//!
//! The rules are those of a CSV reader whose separator is a single space:
//! a field starting with `"` runs to the matching quote (`""` escapes a quote
//! and the span may hold spaces or line breaks), a quote anywhere else is an
//! error, and records end at `\n` or `\r\n`. Empty lines are skipped.
//!
//! Optionally a field starting with `[` runs to the next `]` on the same line,
//! which is how nginx writes `$time_local`.

use crate::error::{Error, Result};
use regex::Regex;
use std::borrow::Cow;

/// One record's fields, in order. Unquoted fields borrow from the input.
pub type Record<'a> = Vec<Cow<'a, str>>;

/// A carriage return is kept inside an unquoted field; only one directly
/// before a line break (or at the end of input) is left for the separator.
const UNQUOTED: &str = r#"[^ "\r\n]*(?:\r+[^ "\r\n]+)*"#;
const BRACKETED: &str = r#"\[[^\]\n]*\]"#;

/// A compiled field tokenizer.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Matches exactly one field at the start of the haystack.
    field: Regex,
    brackets: bool,
}

impl Tokenizer {
    /// Create a tokenizer.
    ///
    /// # Arguments
    ///
    /// * `brackets` - Whether a `[...]` span counts as a single field
    pub fn new(brackets: bool) -> Result<Self> {
        let unquoted = if brackets {
            format!("{}{}|{}", BRACKETED, UNQUOTED, UNQUOTED)
        } else {
            UNQUOTED.to_string()
        };
        let pattern = format!(
            r#"\A(?:"(?P<quoted>(?:[^"]|"")*)"|(?P<bare>{}))"#,
            unquoted
        );
        let field = Regex::new(&pattern)?;

        Ok(Self { field, brackets })
    }

    /// Whether bracket spans are kept together.
    pub fn brackets(&self) -> bool {
        self.brackets
    }

    /// Split `text` into records of fields.
    ///
    /// Returns every record found; deciding how many are acceptable is up to
    /// the caller. Fails on an unterminated quote, a bare quote inside an
    /// unquoted field, or anything other than a separator after a closing quote.
    pub fn tokenize<'a>(&self, text: &'a str) -> Result<Vec<Record<'a>>> {
        let mut records = Vec::new();
        let mut rest = text;

        loop {
            rest = skip_blank_lines(rest);
            if rest.is_empty() {
                return Ok(records);
            }
            let (record, remaining) = self.read_record(text, rest)?;
            records.push(record);
            rest = remaining;
        }
    }

    /// Read fields until the end of the current record.
    fn read_record<'a>(&self, text: &'a str, mut rest: &'a str) -> Result<(Record<'a>, &'a str)> {
        let mut record = Vec::new();

        loop {
            let captures = self
                .field
                .captures(rest)
                .ok_or_else(|| Error::malformed_line(offset(text, rest), "unreadable field"))?;

            let (token, quoted) = match captures.name("quoted") {
                Some(m) => (unescape(m.as_str()), true),
                None => {
                    let bare = captures.name("bare").map_or("", |m| m.as_str());
                    (Cow::Borrowed(bare), false)
                }
            };
            let field_start = rest;
            rest = &rest[captures.get(0).map_or(0, |m| m.end())..];

            if let Some(next) = rest.strip_prefix(' ') {
                record.push(token);
                rest = next;
                continue;
            }
            if let Some(next) = line_break(rest) {
                record.push(token);
                return Ok((record, next));
            }
            if rest.is_empty() || rest == "\r" {
                record.push(token);
                return Ok((record, ""));
            }

            let reason = if quoted {
                "extraneous character after quoted field"
            } else if rest.starts_with('"') && rest.len() == field_start.len() {
                "unterminated quoted field"
            } else if rest.starts_with('"') {
                "bare quote in unquoted field"
            } else {
                "unexpected carriage return"
            };
            return Err(Error::malformed_line(offset(text, rest), reason));
        }
    }
}

fn offset(text: &str, rest: &str) -> usize {
    text.len() - rest.len()
}

fn line_break(rest: &str) -> Option<&str> {
    rest.strip_prefix('\n')
        .or_else(|| rest.strip_prefix("\r\n"))
}

fn skip_blank_lines(mut rest: &str) -> &str {
    while let Some(next) = line_break(rest) {
        rest = next;
    }
    rest
}

/// Undo `""` escaping and normalize line endings inside a quoted span.
fn unescape(quoted: &str) -> Cow<'_, str> {
    if quoted.contains("\"\"") || quoted.contains("\r\n") {
        Cow::Owned(quoted.replace("\"\"", "\"").replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(quoted)
    }
}
