//! Compound selectors for addressing template fields.
//! Spec: <https://www.w3.org/TR/selectors-3/>
//!
//! Covers what field lookup needs and nothing more: tag, `#id`, `.class`,
//! `[name]` and `[name="value"]` parts combined into compounds, comma
//! separated lists of those, and `CSS.escape` to build them from arbitrary
//! identifiers. Combinators are rejected at parse time.

mod escape;
mod matcher;
mod parser;

pub use escape::{EscapeError, escape_identifier, escape_string, strip_unsafe};
pub use matcher::{matches_compound, matches_selector_list, query_first};
pub use parser::{SelectorParseError, parse_compound_selector, parse_selector_list};

/// Read access to a document's elements, as needed to test a selector.
pub trait SelectorTarget {
    /// Cheap element reference, such as an arena index.
    type Node: Copy + Eq;

    /// Local name; compared ASCII case-insensitively.
    fn local_name(&self, node: Self::Node) -> &str;

    /// Value of the `id` attribute.
    fn id(&self, node: Self::Node) -> Option<&str>;

    /// Whether `class` is one of the whitespace-separated `class` tokens.
    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    /// Value of the attribute `name` (lowercase).
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;
}

/// One condition inside a compound selector.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// `div`; stored lowercase.
    Tag(String),
    /// `.name`; case-sensitive.
    Class(String),
    /// `#name`; case-sensitive.
    Id(String),
    /// `[name="value"]`; exact value match.
    AttributeEquals { name: String, value: String },
    /// `[name]`
    AttributeExists(String),
    /// `*`
    Any,
}

/// All conditions must hold for the same element.
/// Spec: Section 5 (sequences of simple selectors)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub parts: Vec<SimpleSelector>,
}

/// Matches an element if any member does.
/// Spec: Section 4 (groups of selectors)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<CompoundSelector>,
}

impl From<CompoundSelector> for SelectorList {
    fn from(selector: CompoundSelector) -> Self {
        Self {
            selectors: vec![selector],
        }
    }
}
