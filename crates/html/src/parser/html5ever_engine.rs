use crate::dom::{DOM, DOMNode, NodeId, NodeKind, html_name};
use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ExpandedName, QualName};
use log::trace;
use std::borrow::Cow;

/// Tree sink that builds a [`DOM`] directly from html5ever tree-construction calls.
pub struct DomSink {
    dom: DOM,
    /// Name reported for non-element handles; the tree builder only asks for
    /// names of elements it created, so this is never consulted in practice.
    placeholder_name: QualName,
    errors: usize,
}

impl Default for DomSink {
    fn default() -> Self {
        Self {
            dom: DOM::new(),
            placeholder_name: html_name(""),
            errors: 0,
        }
    }
}

impl DomSink {
    fn new_node(&mut self, node: DOMNode) -> NodeId {
        self.dom.arena.new_node(node)
    }

    /// Append text to `parent`, merging with a trailing text node.
    fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(last) = self.dom.children(parent).last()
            && let Some(NodeKind::Text { text: existing }) =
                self.dom.node_mut(last).map(|node| &mut node.kind)
        {
            existing.push_str(text);
            return;
        }
        let node = self.new_node(DOMNode::text(text));
        self.append_node(parent, node);
    }

    fn append_node(&mut self, parent: NodeId, child: NodeId) {
        if let Err(error) = self.dom.append_child(parent, child) {
            trace!("html5ever sink: {error}");
        }
    }
}

impl TreeSink for DomSink {
    type Handle = NodeId;
    type Output = DOM;

    fn finish(self) -> Self::Output {
        if self.errors > 0 {
            trace!("html5ever sink: finished with {} recoverable parse errors", self.errors);
        }
        self.dom
    }

    fn parse_error(&mut self, msg: Cow<'static, str>) {
        self.errors = self.errors.saturating_add(1);
        trace!("html5ever parse error: {msg}");
    }

    fn get_document(&mut self) -> Self::Handle {
        self.dom.root()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> ExpandedName<'a> {
        match self.dom.node(*target).map(|node| &node.kind) {
            Some(NodeKind::Element { name }) => name.expanded(),
            _ => self.placeholder_name.expanded(),
        }
    }

    fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let mut node = DOMNode::element(name);
        for attr in attrs {
            node.attrs
                .push((attr.name.local.to_string(), attr.value.to_string()));
        }
        self.new_node(node)
    }

    fn create_comment(&mut self, text: StrTendril) -> Self::Handle {
        self.new_node(DOMNode::comment(text.to_string()))
    }

    fn create_pi(&mut self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        // Processing instructions only occur in foreign content; keep them as comments
        self.new_node(DOMNode::comment(data.to_string()))
    }

    fn append(&mut self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => self.append_node(*parent, node),
            NodeOrText::AppendText(text) => self.append_text(*parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &mut self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.dom.parent(*element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &mut self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let root = self.dom.root();
        let node = self.new_node(DOMNode {
            kind: NodeKind::Doctype {
                name: name.to_string(),
            },
            ..DOMNode::default()
        });
        self.append_node(root, node);
    }

    fn get_template_contents(&mut self, target: &Self::Handle) -> Self::Handle {
        // Template contents live directly under the template element
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&mut self, _mode: QuirksMode) {}

    fn append_before_sibling(&mut self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => {
                let previous = self
                    .dom
                    .arena
                    .get(*sibling)
                    .and_then(|entry| entry.previous_sibling());
                if let Some(previous) = previous
                    && let Some(NodeKind::Text { text: existing }) =
                        self.dom.node_mut(previous).map(|node| &mut node.kind)
                {
                    existing.push_str(&text);
                    return;
                }
                self.new_node(DOMNode::text(text.to_string()))
            }
        };
        self.dom.detach(node);
        if let Err(error) = self.dom.insert_before(*sibling, node) {
            trace!("html5ever sink: {error}");
        }
    }

    fn add_attrs_if_missing(&mut self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let Some(node) = self.dom.node_mut(*target) else {
            return;
        };
        for attr in attrs {
            let name = attr.name.local.to_string();
            if node.attr(&name).is_none() {
                node.attrs.push((name, attr.value.to_string()));
            }
        }
    }

    fn remove_from_parent(&mut self, target: &Self::Handle) {
        self.dom.detach(*target);
    }

    fn reparent_children(&mut self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children: Vec<NodeId> = self.dom.children(*node).collect();
        for child in children {
            self.dom.detach(child);
            self.append_node(*new_parent, child);
        }
    }
}
