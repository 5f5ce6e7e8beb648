//! Placeholder token spellings.
//!
//! Templates mark a field either with an element attribute or with a textual
//! token around its identifier. Five delimiter pairs are recognized, tried in
//! the order of [`TokenSpelling::ALL`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Delimiters wrapped around a field identifier in template text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenSpelling {
    /// `{{id}}`
    DoubleBrace,
    /// `{id}`
    SingleBrace,
    /// `[id]`
    Bracket,
    /// `%id%`
    Percent,
    /// `$id$`
    Dollar,
}

impl TokenSpelling {
    /// Every spelling, in substitution priority order.
    pub const ALL: [Self; 5] = [
        Self::DoubleBrace,
        Self::SingleBrace,
        Self::Bracket,
        Self::Percent,
        Self::Dollar,
    ];

    pub const fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::DoubleBrace => ("{{", "}}"),
            Self::SingleBrace => ("{", "}"),
            Self::Bracket => ("[", "]"),
            Self::Percent => ("%", "%"),
            Self::Dollar => ("$", "$"),
        }
    }

    /// The literal token for `field` in this spelling.
    pub fn wrap(self, field: &str) -> String {
        let (open, close) = self.delimiters();
        format!("{open}{field}{close}")
    }
}

/// `{{identifier}}` as used by design tree text. The identifier is captured untrimmed.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
pub(crate) static DOUBLE_BRACE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid token pattern"));

/// Identifiers of every `{{identifier}}` token in `text`, trimmed, in order of appearance.
pub fn double_brace_identifiers(text: &str) -> impl Iterator<Item = &str> + '_ {
    DOUBLE_BRACE_TOKEN
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|found| found.as_str().trim())
        .filter(|identifier| !identifier.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings_wrap_in_priority_order() {
        let tokens: Vec<String> = TokenSpelling::ALL
            .iter()
            .map(|spelling| spelling.wrap("price"))
            .collect();
        assert_eq!(
            tokens,
            vec!["{{price}}", "{price}", "[price]", "%price%", "$price$"]
        );
    }

    #[test]
    fn identifiers_are_trimmed_and_empty_ones_dropped() {
        let found: Vec<&str> =
            double_brace_identifiers("{{ a }} and {{b}} but not {{ }} or {c} or {{d}").collect();
        assert_eq!(found, vec!["a", "b"]);
    }
}
