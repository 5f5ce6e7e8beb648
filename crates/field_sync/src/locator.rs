//! Resolve a field identifier to the element that carries it.
//!
//! Attribute strategies are tried in a fixed priority order and the first
//! strategy with any match wins; within a strategy the first element in
//! document order is returned. When no attribute matches, the body text is
//! scanned for a placeholder token and the enclosing element is returned.

use crate::adapter::DomTarget;
use crate::highlight::{CLICKABLE_CLASS, HIGHLIGHT_CLASS, TOOLTIP_CLASS};
use crate::tokens::TokenSpelling;
use css_selectors::{
    CompoundSelector, EscapeError, SelectorList, escape_identifier, escape_string,
    parse_compound_selector, query_first, strip_unsafe,
};
use html::{DOM, NodeId};
use log::{debug, trace, warn};

/// How an element was matched to a field identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `id="<field>"`
    IdAttribute,
    /// `data-field-id="<field>"`
    FieldIdMarker,
    /// `data-field="<field>"`
    FieldMarker,
    /// `data-id="<field>"`
    IdMarker,
    /// `class="field-<field>"`
    ClassName,
    /// `name="<field>"`
    NameAttribute,
    /// A placeholder token found in body text.
    TextScan,
}

impl Strategy {
    /// Attribute strategies in priority order. [`Strategy::TextScan`] runs after all of them.
    pub const ATTRIBUTE_ORDER: [Self; 6] = [
        Self::IdAttribute,
        Self::FieldIdMarker,
        Self::FieldMarker,
        Self::IdMarker,
        Self::ClassName,
        Self::NameAttribute,
    ];

    /// Selector text for `field`, or `None` for the text scan.
    fn selector_text(self, field: &str) -> Option<Result<String, EscapeError>> {
        let attribute = |name: &str| escape_string(field).map(|value| format!("[{name}=\"{value}\"]"));
        Some(match self {
            Self::IdAttribute => escape_identifier(field).map(|ident| format!("#{ident}")),
            Self::FieldIdMarker => attribute("data-field-id"),
            Self::FieldMarker => attribute("data-field"),
            Self::IdMarker => attribute("data-id"),
            Self::ClassName => {
                escape_identifier(&format!("field-{field}")).map(|ident| format!(".{ident}"))
            }
            Self::NameAttribute => attribute("name"),
            Self::TextScan => return None,
        })
    }

    /// Compile the selector for `field`, stripping unsafe characters when escaping fails.
    fn selector(self, field: &str) -> Option<CompoundSelector> {
        if self == Self::ClassName && is_decoration_class(field) {
            debug!("skipping {self:?} for field {field:?}: class is added by highlighting");
            return None;
        }
        let text = match self.selector_text(field)? {
            Ok(text) => text,
            Err(error) => {
                warn!("cannot escape field {field:?} for {self:?} ({error}); stripping unsafe characters");
                let stripped = strip_unsafe(field);
                if stripped.is_empty() {
                    return None;
                }
                self.selector_text(&stripped)?.ok()?
            }
        };
        match parse_compound_selector(&text) {
            Ok(selector) => Some(selector),
            Err(error) => {
                debug!("skipping {self:?} for field {field:?}: selector {text:?} rejected ({error})");
                None
            }
        }
    }
}

/// Classes the synchronizer puts on preview elements. They share the `field-`
/// prefix but never address a field.
const DECORATION_CLASSES: [&str; 3] = [HIGHLIGHT_CLASS, TOOLTIP_CLASS, CLICKABLE_CLASS];

fn is_decoration_class(field: &str) -> bool {
    DECORATION_CLASSES
        .iter()
        .any(|class| class.strip_prefix("field-") == Some(field))
}

/// A resolved field location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Located {
    pub node: NodeId,
    pub strategy: Strategy,
}

/// Find the element carrying `field`, or `None` when nothing in `dom` references it.
pub fn locate(dom: &DOM, field: &str) -> Option<NodeId> {
    locate_with_strategy(dom, field).map(|located| located.node)
}

/// Like [`locate`], also reporting which strategy matched.
pub fn locate_with_strategy(dom: &DOM, field: &str) -> Option<Located> {
    if field.is_empty() {
        debug!("refusing to locate an empty field identifier");
        return None;
    }
    let target = DomTarget::new(dom);
    for strategy in Strategy::ATTRIBUTE_ORDER {
        let Some(selector) = strategy.selector(field) else {
            continue;
        };
        let list = SelectorList::from(selector);
        if let Some(node) = query_first(&target, dom.elements(), &list) {
            trace!("field {field:?} matched {strategy:?} at {node:?}");
            return Some(Located { node, strategy });
        }
    }
    let node = scan_text(dom, field)?;
    trace!("field {field:?} found by text scan at {node:?}");
    Some(Located {
        node,
        strategy: Strategy::TextScan,
    })
}

/// Tags whose text is never user-visible template content.
const NON_CONTENT_TAGS: [&str; 2] = ["script", "style"];

/// First text node under the body containing a token for `field` (or the bare
/// identifier), returning its parent element.
fn scan_text(dom: &DOM, field: &str) -> Option<NodeId> {
    let needles: Vec<String> = TokenSpelling::ALL
        .iter()
        .map(|spelling| spelling.wrap(field))
        .chain(core::iter::once(field.to_owned()))
        .collect();
    let scope = dom.body().unwrap_or_else(|| dom.root());
    dom.descendants(scope).find_map(|node| {
        let text = dom.text(node)?;
        if !needles.iter().any(|needle| text.contains(needle.as_str())) {
            return None;
        }
        let parent = dom.parent(node)?;
        let tag = dom.tag_name(parent)?;
        if NON_CONTENT_TAGS.iter().any(|skip| tag.eq_ignore_ascii_case(skip)) {
            return None;
        }
        Some(parent)
    })
}

/// Attributes consulted when recovering a field identifier from an element.
pub const REVERSE_LOOKUP_ATTRIBUTES: [&str; 5] = ["id", "data-field-id", "data-field", "data-id", "name"];

/// Field identifier an element exposes, checking `id`, `data-field-id`,
/// `data-field`, `data-id` and `name` in that order. Empty values are ignored.
pub fn field_id_of(dom: &DOM, node: NodeId) -> Option<&str> {
    REVERSE_LOOKUP_ATTRIBUTES
        .iter()
        .filter_map(|name| dom.attr(node, name))
        .find(|value| !value.trim().is_empty())
}
