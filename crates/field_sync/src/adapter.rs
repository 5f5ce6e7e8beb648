//! Selector matching over the template DOM.

use css_selectors::SelectorTarget;
use html::{DOM, NodeId};

/// Borrowed view of a [`DOM`] that the selector engine can walk.
pub(crate) struct DomTarget<'dom> {
    dom: &'dom DOM,
}

impl<'dom> DomTarget<'dom> {
    pub(crate) const fn new(dom: &'dom DOM) -> Self {
        Self { dom }
    }
}

impl SelectorTarget for DomTarget<'_> {
    type Node = NodeId;

    fn local_name(&self, node: NodeId) -> &str {
        self.dom.tag_name(node).unwrap_or_default()
    }

    fn id(&self, node: NodeId) -> Option<&str> {
        self.dom.attr(node, "id")
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.dom.has_class(node, class)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.dom.attr(node, name)
    }
}
