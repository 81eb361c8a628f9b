//! The line-oriented text format for records.
//!
//! Each field occupies one line:
//!
//! ```text
//! 001 00 *a 2 548 263 8 *b 870970
//! 245 00 *a Something's goin' on *e Cliff Richard
//! ```
//!
//! A line starts with a three character field name, a space, a two character
//! indicator, a space and the first subfield marker `*`. Each subfield is the
//! marker, a one character name, an optional space and the value. In values
//! `@` is written as `@@` and `*` as `@*`.
//!
//! A line that begins with whitespace continues the previous line: the line
//! break and the leading whitespace are dropped and the rest is appended to
//! the field. Blank lines are ignored. Control fields have no line syntax and
//! are rejected like any other malformed header.
//!
//! # Examples
//!
//! ```
//! use marcline::line_format;
//!
//! let record = line_format::parse("100 27 *ab*cd\n").unwrap();
//! let field = record.field(0).unwrap();
//! assert_eq!(field.indicator().unwrap(), "27");
//! assert_eq!(field.subfield_names(), "ac");
//! ```

use crate::error::{MarcError, Result};
use crate::record::{Field, Record, Subfield};
use crate::recovery::{RecoveryContext, RecoveryMode};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

lazy_static! {
    static ref FIELD_HEADER: Regex =
        Regex::new(r"^(\S{3}) (.{2}) (\*.*)$").expect("field header pattern is valid");
}

/// How `@` and `*` are escaped when writing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EscapeMode {
    /// Escape every occurrence (default)
    #[default]
    All,
    /// Escape only the first `@` and the first `*` of each value
    FirstOccurrence,
}

/// Options for reading and writing the line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineFormatOptions {
    /// Escaping applied on output
    pub escape: EscapeMode,
    /// Handling of malformed lines on input
    pub recovery: RecoveryMode,
}

impl LineFormatOptions {
    /// Set the escape mode.
    #[must_use]
    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }

    /// Set the recovery mode.
    #[must_use]
    pub fn with_recovery_mode(mut self, recovery: RecoveryMode) -> Self {
        self.recovery = recovery;
        self
    }
}

/// Escape `@` and `*` in a value.
#[must_use]
pub fn escape_value(value: &str, mode: EscapeMode) -> Cow<'_, str> {
    if !value.contains(|c| c == '@' || c == '*') {
        return Cow::Borrowed(value);
    }
    match mode {
        EscapeMode::All => {
            let mut out = String::with_capacity(value.len() + 4);
            for c in value.chars() {
                match c {
                    '@' => out.push_str("@@"),
                    '*' => out.push_str("@*"),
                    other => out.push(other),
                }
            }
            Cow::Owned(out)
        },
        EscapeMode::FirstOccurrence => {
            Cow::Owned(value.replacen('@', "@@", 1).replacen('*', "@*", 1))
        },
    }
}

/// Reverse [`escape_value`]: `@@` becomes `@` and `@*` becomes `*`.
///
/// Any other `@` is kept as is.
#[must_use]
pub fn unescape_value(value: &str) -> Cow<'_, str> {
    if !value.contains('@') {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '@' {
            if let Some(&escaped @ ('@' | '*')) = chars.peek() {
                out.push(escaped);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Parse line format text into a new record with default header values.
///
/// # Errors
///
/// Returns [`MarcError::ParseError`] for the first malformed line.
pub fn parse(text: &str) -> Result<Record> {
    parse_with_options(text, &LineFormatOptions::default()).map(|(record, _)| record)
}

/// Parse line format text with explicit options.
///
/// In [`RecoveryMode::Lenient`] malformed fields are skipped; the returned
/// [`RecoveryContext`] lists them.
///
/// # Errors
///
/// In strict mode, returns [`MarcError::ParseError`] for the first malformed line.
pub fn parse_with_options(
    text: &str,
    options: &LineFormatOptions,
) -> Result<(Record, RecoveryContext)> {
    let mut context = RecoveryContext::new(options.recovery);
    let fields = parse_fields(text, &mut context)?;

    let mut record = Record::new();
    record.replace_fields(fields);
    tracing::debug!(
        fields = record.size(),
        skipped = context.recovery_messages.len(),
        "parsed record from line format"
    );
    Ok((record, context))
}

/// Render a record in line format with explicit options.
#[must_use]
pub fn to_line_format(record: &Record, options: &LineFormatOptions) -> String {
    record.to_line_string(options.escape)
}

struct PendingField {
    line: usize,
    name: String,
    indicator: String,
    body: String,
}

fn parse_fields(text: &str, context: &mut RecoveryContext) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    let mut pending: Option<PendingField> = None;
    // Set while the lines of a rejected field are being dropped
    let mut skipping = false;

    for (index, raw) in text.split('\n').enumerate() {
        let line_number = index + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            match pending.as_mut() {
                Some(field) => field.body.push_str(line.trim_start()),
                None if skipping => {},
                None => {
                    context.recover(MarcError::ParseError {
                        line: line_number,
                        message: "continuation line without a preceding field".to_string(),
                    })?;
                    skipping = true;
                },
            }
            continue;
        }

        if let Some(field) = pending.take() {
            finish_field(field, &mut fields, context)?;
        }
        match parse_header(line, line_number) {
            Ok(field) => {
                tracing::trace!(name = %field.name, line = line_number, "field header");
                pending = Some(field);
                skipping = false;
            },
            Err(error) => {
                context.recover(error)?;
                skipping = true;
            },
        }
    }

    if let Some(field) = pending.take() {
        finish_field(field, &mut fields, context)?;
    }
    Ok(fields)
}

fn parse_header(line: &str, line_number: usize) -> Result<PendingField> {
    let caps = FIELD_HEADER
        .captures(line)
        .ok_or_else(|| MarcError::ParseError {
            line: line_number,
            message: format!("expected 'NNN ii *' field header, found {line:?}"),
        })?;
    Ok(PendingField {
        line: line_number,
        name: caps[1].to_string(),
        indicator: caps[2].to_string(),
        body: caps[3].to_string(),
    })
}

fn finish_field(
    pending: PendingField,
    fields: &mut Vec<Field>,
    context: &mut RecoveryContext,
) -> Result<()> {
    match parse_subfields(&pending.body, pending.line) {
        Ok(subfields) => {
            let field = subfields
                .into_iter()
                .fold(
                    Field::builder(pending.name, pending.indicator),
                    |builder, sf| builder.subfield(sf.name, sf.value),
                )
                .build();
            fields.push(field);
            Ok(())
        },
        Err(error) => context.recover(error),
    }
}

fn parse_subfields(body: &str, line: usize) -> Result<Vec<Subfield>> {
    let mut subfields: Vec<Subfield> = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        let literal = match c {
            '*' => {
                let name = match chars.next() {
                    Some(name) if !name.is_whitespace() => name,
                    _ => {
                        return Err(MarcError::ParseError {
                            line,
                            message: "subfield marker without a name".to_string(),
                        })
                    },
                };
                if chars.peek() == Some(&' ') {
                    chars.next();
                }
                subfields.push(Subfield::new(name.to_string(), String::new()));
                continue;
            },
            '@' => match chars.peek() {
                Some(&escaped @ ('@' | '*')) => {
                    chars.next();
                    escaped
                },
                _ => '@',
            },
            other => other,
        };
        match subfields.last_mut() {
            Some(subfield) => subfield.value.push(literal),
            None => {
                return Err(MarcError::ParseError {
                    line,
                    message: "text before the first subfield marker".to_string(),
                })
            },
        }
    }

    // The writer puts one separator space after every subfield
    for subfield in &mut subfields {
        if subfield.value.ends_with(' ') {
            subfield.value.pop();
        }
    }
    Ok(subfields)
}

impl Record {
    /// Replace this record's fields with those parsed from line format text.
    ///
    /// Header values are kept. The fields are cleared before parsing starts,
    /// so on error the record is left without fields.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ParseError`] for the first malformed line.
    pub fn from_line_format(&mut self, text: &str) -> Result<()> {
        self.clear_fields();
        let mut context = RecoveryContext::new(RecoveryMode::Strict);
        let fields = parse_fields(text, &mut context)?;
        self.replace_fields(fields);
        Ok(())
    }
}

impl FromStr for Record {
    type Err = MarcError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}
