//! CSS selector parsing.
//! Spec: <https://www.w3.org/TR/selectors-3/>

use crate::{CompoundSelector, SelectorList, SimpleSelector};
use core::fmt;
use std::error::Error;

/// Reasons a selector string was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorParseError {
    /// Nothing to parse.
    Empty,
    /// Whitespace or a combinator character inside a compound selector.
    UnsupportedCombinator { position: usize },
    /// An identifier was expected after `.`, `#` or `[`.
    ExpectedIdentifier { position: usize },
    /// An attribute selector was not closed with `]`.
    UnterminatedAttribute { position: usize },
    /// A quoted string ran to the end of input.
    UnterminatedString { position: usize },
    /// A backslash at the very end of input.
    DanglingEscape { position: usize },
    /// Any other character.
    UnexpectedCharacter { position: usize, found: char },
}

impl fmt::Display for SelectorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::UnsupportedCombinator { position } => {
                write!(f, "combinators are not supported (at {position})")
            }
            Self::ExpectedIdentifier { position } => write!(f, "expected identifier at {position}"),
            Self::UnterminatedAttribute { position } => {
                write!(f, "unterminated attribute selector starting at {position}")
            }
            Self::UnterminatedString { position } => {
                write!(f, "unterminated string starting at {position}")
            }
            Self::DanglingEscape { position } => write!(f, "dangling escape at {position}"),
            Self::UnexpectedCharacter { position, found } => {
                write!(f, "unexpected {found:?} at {position}")
            }
        }
    }
}

impl Error for SelectorParseError {}

/// Tokenizer over a single compound selector.
struct SelectorTokenizer {
    /// Input split into characters so escapes and non-ASCII identifiers index cleanly.
    input: Vec<char>,
    /// Current cursor index into `input`.
    index: usize,
}

impl SelectorTokenizer {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            index: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.index).copied()
    }

    fn bump(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    /// Return the next simple selector, if any.
    fn next(&mut self) -> Option<Result<SimpleSelector, SelectorParseError>> {
        let current = self.peek()?;
        let position = self.index;
        Some(match current {
            '*' => {
                self.bump();
                Ok(SimpleSelector::Any)
            }
            '.' => {
                self.bump();
                self.consume_ident(position).map(SimpleSelector::Class)
            }
            '#' => {
                self.bump();
                self.consume_ident(position).map(SimpleSelector::Id)
            }
            '[' => {
                self.bump();
                self.consume_attr(position)
            }
            '>' | '+' | '~' => Err(SelectorParseError::UnsupportedCombinator { position }),
            character if character.is_whitespace() => {
                Err(SelectorParseError::UnsupportedCombinator { position })
            }
            character if is_ident_start(character) => self
                .consume_ident(position)
                .map(|ident| SimpleSelector::Tag(ident.to_ascii_lowercase())),
            found => Err(SelectorParseError::UnexpectedCharacter { position, found }),
        })
    }

    /// Consume an identifier, resolving CSS escapes. Case is preserved.
    /// Spec: CSS Syntax 3, §4.3.11 "consume an ident sequence"
    fn consume_ident(&mut self, start: usize) -> Result<String, SelectorParseError> {
        let mut out = String::new();
        while let Some(character) = self.peek() {
            if character == '\\' {
                self.bump();
                out.push(self.consume_escape()?);
            } else if is_ident_char(character) {
                out.push(character);
                self.bump();
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(SelectorParseError::ExpectedIdentifier { position: start });
        }
        Ok(out)
    }

    /// Consume the code point after a backslash.
    /// Spec: CSS Syntax 3, §4.3.7 "consume an escaped code point"
    fn consume_escape(&mut self) -> Result<char, SelectorParseError> {
        let position = self.index;
        let Some(first) = self.peek() else {
            return Err(SelectorParseError::DanglingEscape { position });
        };
        if !first.is_ascii_hexdigit() {
            self.bump();
            return Ok(first);
        }
        let mut code: u32 = 0;
        let mut digits = 0;
        while digits < 6 {
            let Some(digit) = self.peek().and_then(|character| character.to_digit(16)) else {
                break;
            };
            code = code.saturating_mul(16).saturating_add(digit);
            digits += 1;
            self.bump();
        }
        if self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        Ok(match char::from_u32(code) {
            Some('\0') | None => char::REPLACEMENT_CHARACTER,
            Some(character) => character,
        })
    }

    /// Parse `[name]` or `[name=value]` with quoted or unquoted values.
    fn consume_attr(&mut self, start: usize) -> Result<SimpleSelector, SelectorParseError> {
        self.skip_spaces();
        let name = self.consume_ident(self.index)?.to_ascii_lowercase();
        self.skip_spaces();
        let selector = match self.peek() {
            Some(']') => SimpleSelector::AttributeExists(name),
            Some('=') => {
                self.bump();
                self.skip_spaces();
                let value = match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        let string_start = self.index;
                        self.bump();
                        self.consume_quoted(quote, string_start)?
                    }
                    _ => self.consume_ident(self.index)?,
                };
                self.skip_spaces();
                SimpleSelector::AttributeEquals { name, value }
            }
            _ => return Err(SelectorParseError::UnterminatedAttribute { position: start }),
        };
        if self.peek() != Some(']') {
            return Err(SelectorParseError::UnterminatedAttribute { position: start });
        }
        self.bump();
        Ok(selector)
    }

    /// Consume a quoted string body up to the matching quote.
    fn consume_quoted(&mut self, quote: char, start: usize) -> Result<String, SelectorParseError> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(SelectorParseError::UnterminatedString { position: start }),
                Some(character) if character == quote => {
                    self.bump();
                    return Ok(out);
                }
                Some('\\') => {
                    self.bump();
                    if self.peek() == Some('\n') {
                        // Escaped newline is a line continuation
                        self.bump();
                    } else {
                        out.push(self.consume_escape()?);
                    }
                }
                Some(character) => {
                    out.push(character);
                    self.bump();
                }
            }
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }
}

fn is_ident_start(character: char) -> bool {
    character.is_ascii_alphabetic() || character == '_' || character == '-' || !character.is_ascii()
}

fn is_ident_char(character: char) -> bool {
    is_ident_start(character) || character.is_ascii_digit()
}

/// Parse one compound selector such as `div.card[data-field="x"]`.
/// Spec: Section 5 — Simple selector sequences
///
/// # Errors
/// Returns [`SelectorParseError`] when the input is not a single compound selector.
pub fn parse_compound_selector(input: &str) -> Result<CompoundSelector, SelectorParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SelectorParseError::Empty);
    }
    let mut tokens = SelectorTokenizer::new(trimmed);
    let mut compound = CompoundSelector::default();
    while let Some(simple) = tokens.next() {
        compound.parts.push(simple?);
    }
    Ok(compound)
}

/// Parse a comma-separated list of compound selectors.
/// Spec: Section 4 — Groups of selectors
///
/// # Errors
/// A group is invalid as a whole if any of its selectors is invalid.
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorParseError> {
    let mut list = SelectorList::default();
    for part in split_top_level(input) {
        list.selectors.push(parse_compound_selector(&part)?);
    }
    Ok(list)
}

/// Split on commas that are outside of quoted strings and attribute brackets.
fn split_top_level(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0_usize;
    for character in input.chars() {
        if escaped {
            escaped = false;
            current.push(character);
            continue;
        }
        match (character, quote) {
            ('\\', _) => escaped = true,
            ('"' | '\'', None) => quote = Some(character),
            (found, Some(open)) if found == open => quote = None,
            ('[', None) => depth = depth.saturating_add(1),
            (']', None) => depth = depth.saturating_sub(1),
            (',', None) if depth == 0 => {
                parts.push(core::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(character);
    }
    parts.push(current);
    parts
}
