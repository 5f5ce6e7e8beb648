//! Serialization of identifiers and strings for use inside selectors.
//! Spec: <https://drafts.csswg.org/cssom/#serialize-an-identifier>

use core::fmt::{self, Write as _};
use std::error::Error;

/// Why a value could not be escaped without losing information.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeError {
    /// Empty identifiers have no selector form.
    Empty,
    /// U+0000 would be serialized as U+FFFD and could never match the original value.
    NullCharacter { position: usize },
}

impl fmt::Display for EscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "cannot escape an empty identifier"),
            Self::NullCharacter { position } => {
                write!(f, "NUL character at position {position} has no selector form")
            }
        }
    }
}

impl Error for EscapeError {}

fn push_hex_escape(out: &mut String, character: char) {
    // Writing into a String never fails
    let _ = write!(out, "\\{:x} ", u32::from(character));
}

/// Serialize `value` as a CSS identifier (the `CSS.escape()` algorithm).
///
/// # Errors
/// Returns [`EscapeError`] for inputs that cannot round-trip through a selector.
pub fn escape_identifier(value: &str) -> Result<String, EscapeError> {
    if value.is_empty() {
        return Err(EscapeError::Empty);
    }
    let mut out = String::with_capacity(value.len());
    let first = value.chars().next();
    let single_char = value.chars().nth(1).is_none();
    for (index, character) in value.chars().enumerate() {
        match character {
            '\0' => return Err(EscapeError::NullCharacter { position: index }),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_hex_escape(&mut out, character),
            '0'..='9' if index == 0 => push_hex_escape(&mut out, character),
            '0'..='9' if index == 1 && first == Some('-') => push_hex_escape(&mut out, character),
            '-' if index == 0 && single_char => out.push_str("\\-"),
            _ if !character.is_ascii()
                || character.is_ascii_alphanumeric()
                || character == '-'
                || character == '_' =>
            {
                out.push(character);
            }
            _ => {
                out.push('\\');
                out.push(character);
            }
        }
    }
    Ok(out)
}

/// Serialize `value` as the body of a double-quoted CSS string (without the quotes).
/// Spec: <https://drafts.csswg.org/cssom/#serialize-a-string>
///
/// # Errors
/// Returns [`EscapeError::NullCharacter`] if `value` contains U+0000.
pub fn escape_string(value: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(value.len() + 2);
    for (index, character) in value.chars().enumerate() {
        match character {
            '\0' => return Err(EscapeError::NullCharacter { position: index }),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_hex_escape(&mut out, character),
            '"' | '\\' => {
                out.push('\\');
                out.push(character);
            }
            _ => out.push(character),
        }
    }
    Ok(out)
}

/// Keep only characters that are safe in a selector without escaping.
pub fn strip_unsafe(value: &str) -> String {
    value
        .chars()
        .filter(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'))
        .collect()
}
