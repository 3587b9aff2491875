//! Scanning routines for numeric, string and char literals

use super::cursor::{is_newline, Cursor};
use super::LexErrorKind;

/// Decodes the character after a `\`
pub fn decode_escape(c: char) -> Option<char> {
    Some(match c {
        'n' => '\n',
        't' => '\t',
        '\\' => '\\',
        '"' => '"',
        '\'' => '\'',
        'r' => '\r',
        'b' => '\u{8}',
        'f' => '\u{c}',
        '0' => '\0',
        _ => return None,
    })
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Scans a numeric literal starting at `start`, which is either a digit or a `.` followed by a
/// digit.
///
/// The accepted shape is `digits? ('.' digits?)? ([eE] [+-]? digits)?` where the integer and
/// fraction parts are not both empty. A number directly followed by an identifier character is
/// malformed, and the whole run is consumed into the error.
pub fn number<'s>(cursor: &mut Cursor<'s>, start: usize) -> Result<&'s str, LexErrorKind> {
    let digits = |cursor: &mut Cursor<'s>| cursor.eat_while(|c| c.is_ascii_digit());

    digits(cursor);
    if cursor.eat('.') {
        digits(cursor);
    }

    let mut well_formed = true;
    if matches!(cursor.peek(), Some('e' | 'E')) {
        cursor.bump();
        if matches!(cursor.peek(), Some('+' | '-')) {
            cursor.bump();
        }
        if cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            digits(cursor);
        } else {
            well_formed = false;
        }
    }

    if cursor.peek().is_some_and(is_identifier_continue) {
        well_formed = false;
    }

    if well_formed {
        Ok(cursor.slice_from(start))
    } else {
        cursor.eat_while(is_identifier_continue);
        Err(LexErrorKind::InvalidNumber(cursor.slice_from(start).to_string()))
    }
}

/// Scans a string literal, the opening quote already consumed. Returns the decoded contents.
///
/// An illegal escape does not stop the scan, so that the cursor always ends past the closing
/// quote. The first illegal escape is reported once the string ends.
pub fn string(cursor: &mut Cursor) -> Result<String, LexErrorKind> {
    let mut decoded = String::new();
    let mut illegal_escape = None;
    loop {
        match cursor.peek() {
            None => return Err(LexErrorKind::UnterminatedString),
            Some(c) if is_newline(c) => return Err(LexErrorKind::UnterminatedString),
            Some('"') => {
                cursor.bump();
                break;
            }
            Some('\\') => {
                cursor.bump();
                match cursor.peek() {
                    None => return Err(LexErrorKind::UnterminatedString),
                    Some(c) if is_newline(c) => return Err(LexErrorKind::UnterminatedString),
                    Some(c) => {
                        cursor.bump();
                        match decode_escape(c) {
                            Some(decoded_char) => decoded.push(decoded_char),
                            None => {
                                illegal_escape.get_or_insert(c);
                            }
                        }
                    }
                }
            }
            Some(c) => {
                cursor.bump();
                decoded.push(c);
            }
        }
    }

    match illegal_escape {
        Some(escape) => Err(LexErrorKind::IllegalEscape(escape)),
        None => Ok(decoded),
    }
}

/// Scans a char literal, the opening quote already consumed.
pub fn character(cursor: &mut Cursor) -> Result<char, LexErrorKind> {
    let value = match cursor.peek() {
        None => return Err(LexErrorKind::UnterminatedChar),
        Some(c) if is_newline(c) => return Err(LexErrorKind::UnterminatedChar),
        Some('\'') => {
            cursor.bump();
            return Err(LexErrorKind::EmptyChar);
        }
        Some('\\') => {
            cursor.bump();
            let target = cursor
                .peek()
                .filter(|c| !is_newline(*c))
                .ok_or(LexErrorKind::UnterminatedChar)?;
            cursor.bump();
            decode_escape(target).ok_or(LexErrorKind::IllegalEscape(target))?
        }
        Some(c) => {
            cursor.bump();
            c
        }
    };

    if cursor.eat('\'') {
        Ok(value)
    } else {
        Err(LexErrorKind::UnterminatedChar)
    }
}
