//! In-place mutation of a [`DOM`].

use super::{DOM, DOMNode, HTML_NAMESPACE, NodeId, NodeKind};
use crate::parser::parse_fragment;
use anyhow::{Error, anyhow};
use html5ever::{LocalName, Namespace, QualName};

/// Build the qualified name for an HTML element created by hand.
pub fn html_name(tag: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(tag.to_ascii_lowercase()),
    )
}

impl DOM {
    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(DOMNode::element(html_name(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.arena.new_node(DOMNode::text(text))
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|error| anyhow!("append {child:?} to {parent:?} failed: {error}"))
    }

    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) -> Result<(), Error> {
        sibling
            .checked_insert_before(new_node, &mut self.arena)
            .map_err(|error| anyhow!("insert {new_node:?} before {sibling:?} failed: {error}"))
    }

    /// Unlink a node from its parent, keeping it and its subtree alive in the arena.
    pub fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    /// Remove a node and all of its descendants.
    pub fn remove_node(&mut self, id: NodeId) {
        if self.node(id).is_some() {
            id.remove_subtree(&mut self.arena);
        }
    }

    pub fn remove_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            self.remove_node(child);
        }
    }

    /// Set or replace an attribute. Returns false when `id` is not an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if !matches!(node.kind, NodeKind::Element { .. }) {
            return false;
        }
        if let Some(entry) = node.attrs.iter_mut().find(|(key, _)| key == name) {
            value.clone_into(&mut entry.1);
        } else {
            node.attrs.push((name.to_owned(), value.to_owned()));
        }
        true
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let node = self.node_mut(id)?;
        let index = node.attrs.iter().position(|(key, _)| key == name)?;
        Some(node.attrs.remove(index).1)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.has_class(id, class) {
            return true;
        }
        let mut tokens: Vec<&str> = self.class_list(id).collect();
        tokens.push(class);
        let joined = tokens.join(" ");
        self.set_attr(id, "class", &joined)
    }

    /// Remove a class token. The attribute is dropped once the list is empty.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        if !self.has_class(id, class) {
            return false;
        }
        let remaining: Vec<&str> = self.class_list(id).filter(|token| *token != class).collect();
        if remaining.is_empty() {
            self.remove_attr(id, "class");
        } else {
            let joined = remaining.join(" ");
            self.set_attr(id, "class", &joined);
        }
        true
    }

    /// Set the live value of a form control without touching its attributes.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.value = Some(value.to_owned());
        true
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), Error> {
        self.remove_children(id);
        if text.is_empty() {
            return Ok(());
        }
        let node = self.create_text(text);
        self.append_child(id, node)
    }

    /// Replace the children of `id` with the nodes parsed from `markup`.
    ///
    /// The fragment is parsed with `id` as context element before anything is
    /// removed, so a failed parse leaves the element untouched.
    pub fn set_inner_html(&mut self, id: NodeId, markup: &str) -> Result<(), Error> {
        let context = self
            .tag_name(id)
            .ok_or_else(|| anyhow!("node {id:?} is not an element"))?
            .to_owned();
        let fragment = parse_fragment(markup, &context)?;
        self.remove_children(id);
        if let Some(fragment_root) = fragment.fragment_root() {
            self.import_children(&fragment, fragment_root, id)?;
        }
        Ok(())
    }

    /// Deep-copy the children of `from` (in `source`) under `parent` (in `self`).
    pub fn import_children(
        &mut self,
        source: &DOM,
        from: NodeId,
        parent: NodeId,
    ) -> Result<(), Error> {
        let children: Vec<NodeId> = source.children(from).collect();
        for child in children {
            let Some(data) = source.node(child) else {
                continue;
            };
            let copy = self.arena.new_node(data.clone());
            self.append_child(parent, copy)?;
            self.import_children(source, child, copy)?;
        }
        Ok(())
    }

    /// Root element produced by fragment parsing (the synthetic `<html>` wrapper).
    pub(crate) fn fragment_root(&self) -> Option<NodeId> {
        self.children(self.root()).find(|id| self.is_element(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_tokens_are_added_once_and_removed_cleanly() {
        let mut dom = DOM::new();
        let div = dom.create_element("div");
        assert!(dom.append_child(dom.root(), div).is_ok());

        assert!(dom.add_class(div, "a"));
        assert!(dom.add_class(div, "b"));
        assert!(dom.add_class(div, "a"));
        assert_eq!(dom.attr(div, "class"), Some("a b"));

        assert!(dom.remove_class(div, "a"));
        assert!(!dom.remove_class(div, "a"));
        assert!(dom.remove_class(div, "b"));
        assert_eq!(dom.attr(div, "class"), None);
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut dom = DOM::new();
        let input = dom.create_element("input");
        dom.set_attr(input, "name", "a");
        dom.set_attr(input, "value", "1");
        dom.set_attr(input, "name", "b");
        let names: Vec<&str> = dom
            .node(input)
            .map(|node| node.attrs.iter().map(|(key, _)| key.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["name", "value"]);
        assert_eq!(dom.attr(input, "name"), Some("b"));
    }

    #[test]
    fn text_nodes_reject_attributes() {
        let mut dom = DOM::new();
        let text = dom.create_text("hi");
        assert!(!dom.set_attr(text, "id", "x"));
    }
}
