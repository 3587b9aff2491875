//! The symbol table, a human readable dump of a token list that can be read back.
//!
//! ```text
//! CYTHONIC LEXICAL ANALYZER - SYMBOL TABLE
//! ========================================
//!
//! LINE | COL | TYPE              | LEXEME                        | RAW
//! -----|-----|-------------------|-------------------------------|-----
//!    1 |   1 | IF                | if                            | IF
//!
//! Total tokens: 1
//! END OF SYMBOL TABLE
//! ```
//!
//! Lexemes and raw text are escaped so that every token fits on one row and no field contains a
//! bare `|`. Leading and trailing spaces are written as `\s`.

use crate::token::{Token, TokenKind};
use crate::Position;
use itertools::Itertools;
use std::io;
use std::io::{BufRead, Write};

const TITLE: &str = "CYTHONIC LEXICAL ANALYZER - SYMBOL TABLE";
const HEADER: &str = "LINE | COL | TYPE              | LEXEME                        | RAW";
const SEPARATOR: &str = "-----|-----|-------------------|-------------------------------|-----";
const TOTAL_PREFIX: &str = "Total tokens: ";
const FOOTER: &str = "END OF SYMBOL TABLE";

/// An error occurred while reading a symbol table
#[derive(Debug, thiserror::Error)]
pub enum SymbolTableError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("missing symbol table header")]
    MissingHeader,
    #[error("malformed row on line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error("unknown token type {name:?} on line {line}")]
    UnknownKind { line: usize, name: String },
    #[error("symbol table lists {found} tokens but claims {expected}")]
    CountMismatch { expected: usize, found: usize },
}

/// Writes a symbol table for the given tokens. End of stream tokens are not listed.
pub fn write_symbol_table<W: Write>(tokens: &[Token], mut writer: W) -> io::Result<()> {
    writeln!(writer, "{TITLE}")?;
    writeln!(writer, "{}", "=".repeat(TITLE.len()))?;
    writeln!(writer)?;
    writeln!(writer, "{HEADER}")?;
    writeln!(writer, "{SEPARATOR}")?;

    let mut count = 0_usize;
    for token in tokens.iter().filter(|t| t.kind() != TokenKind::Eof) {
        writeln!(
            writer,
            "{:4} | {:3} | {:<17} | {:<29} | {}",
            token.line(),
            token.column(),
            token.kind().name(),
            escape(token.lexeme()),
            escape(token.raw())
        )?;
        count += 1;
    }

    writeln!(writer)?;
    writeln!(writer, "{TOTAL_PREFIX}{count}")?;
    writeln!(writer, "{FOOTER}")?;
    writer.flush()
}

/// Reads a symbol table back into a token list.
///
/// Comments are dropped, and an end of stream token is appended just past the last token.
pub fn read_symbol_table<R: BufRead>(reader: R) -> Result<Vec<Token>, SymbolTableError> {
    let mut lines = reader.lines().enumerate().map(|(i, line)| (i + 1, line));

    loop {
        let Some((_, line)) = lines.next() else {
            return Err(SymbolTableError::MissingHeader);
        };
        if line?.trim_end() == SEPARATOR {
            break;
        }
    }

    let mut tokens = vec![];
    let mut listed = 0_usize;
    let mut claimed = None;
    for (line_no, line) in lines {
        let line = line?;
        if line.trim().is_empty() || line.trim_end() == FOOTER {
            continue;
        }
        if let Some(total) = line.strip_prefix(TOTAL_PREFIX) {
            let total = total
                .trim()
                .parse::<usize>()
                .map_err(|e| SymbolTableError::MalformedRow {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            claimed = Some(total);
            continue;
        }

        let token = parse_row(line_no, &line)?;
        listed += 1;
        if token.kind() != TokenKind::Comment {
            tokens.push(token);
        }
    }

    if let Some(expected) = claimed {
        if expected != listed {
            return Err(SymbolTableError::CountMismatch {
                expected,
                found: listed,
            });
        }
    }

    let eof_position = tokens
        .last()
        .map(|last| {
            Position::new(
                last.line(),
                last.column() + last.raw().chars().count(),
            )
        })
        .unwrap_or_default();
    tokens.push(Token::eof(eof_position));
    Ok(tokens)
}

fn parse_row(line_no: usize, row: &str) -> Result<Token, SymbolTableError> {
    let malformed = |reason: &str| SymbolTableError::MalformedRow {
        line: line_no,
        reason: reason.to_string(),
    };

    let (line, column, kind, lexeme, raw) = split_fields(row)
        .into_iter()
        .map(|field| field.trim().to_string())
        .collect_tuple()
        .ok_or_else(|| malformed("expected 5 fields"))?;

    let line = line
        .parse::<usize>()
        .map_err(|_| malformed("line is not a number"))?;
    let column = column
        .parse::<usize>()
        .map_err(|_| malformed("column is not a number"))?;
    let kind = TokenKind::from_name(&kind).ok_or(SymbolTableError::UnknownKind {
        line: line_no,
        name: kind,
    })?;

    Ok(Token::new(
        kind,
        unescape(&lexeme).ok_or_else(|| malformed("bad escape in lexeme"))?,
        unescape(&raw).ok_or_else(|| malformed("bad escape in raw text"))?,
        Position::new(line, column),
    ))
}

/// Splits a row on every `|` that isn't escaped
fn split_fields(row: &str) -> Vec<&str> {
    let mut fields = vec![];
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in row.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '|' => {
                fields.push(&row[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&row[start..]);
    fields
}

fn escape(text: &str) -> String {
    let leading = text.len() - text.trim_start_matches(' ').len();
    let trailing = if leading == text.len() {
        0
    } else {
        text.len() - text.trim_end_matches(' ').len()
    };
    let middle = &text[leading..text.len() - trailing];

    let mut escaped = "\\s".repeat(leading);
    for c in middle.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '|' => escaped.push_str("\\|"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            c => escaped.push(c),
        }
    }
    escaped.push_str(&"\\s".repeat(trailing));
    escaped
}

fn unescape(text: &str) -> Option<String> {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        let c = match chars.next()? {
            '\\' => '\\',
            '|' => '|',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            's' => ' ',
            _ => return None,
        };
        unescaped.push(c);
    }
    Some(unescaped)
}
