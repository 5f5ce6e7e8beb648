pub mod events;
mod printing;
mod updating;

use events::ListenerRegistry;
use html5ever::QualName;
use indextree::Arena;
use smallvec::SmallVec;

pub use indextree::NodeId;
pub use updating::html_name;

/// HTML namespace URI used for elements created outside the parser.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Doctype { name: String },
    Element { name: QualName },
    Text { text: String },
    Comment { text: String },
}

#[derive(Debug, Clone, Default)]
pub struct DOMNode {
    pub kind: NodeKind,
    /// Attributes in source order.
    pub attrs: SmallVec<[(String, String); 4]>,
    /// Live value of a form control. Kept apart from the `value` attribute the same
    /// way a browser keeps the `value` property apart from its content attribute.
    pub value: Option<String>,
}

impl DOMNode {
    pub fn element(name: QualName) -> Self {
        Self {
            kind: NodeKind::Element { name },
            attrs: SmallVec::new(),
            value: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text { text: text.into() },
            attrs: SmallVec::new(),
            value: None,
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Comment { text: text.into() },
            attrs: SmallVec::new(),
            value: None,
        }
    }

    /// Lowercase local tag name for elements.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { name } => Some(&*name.local),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An HTML document held in an index arena.
pub struct DOM {
    pub(crate) arena: Arena<DOMNode>,
    root: NodeId,
    pub(crate) listeners: ListenerRegistry,
}

impl Default for DOM {
    fn default() -> Self {
        Self::new()
    }
}

impl DOM {
    /// Create a document holding only the document node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DOMNode::default());
        Self {
            arena,
            root,
            listeners: ListenerRegistry::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&DOMNode> {
        self.arena.get(id).filter(|node| !node.is_removed()).map(|node| node.get())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut DOMNode> {
        self.arena
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get_mut())
    }

    /// True while `id` refers to a node still attached somewhere under the root.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some() && id.ancestors(&self.arena).any(|ancestor| ancestor == self.root)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.parent())
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// `id` and all of its descendants in document (pre-)order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.descendants(&self.arena)
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.ancestors(&self.arena).skip(1)
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root).filter(|id| self.is_element(*id))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.tag_name(id).is_some()
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(DOMNode::tag)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|node| node.attr(name))
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|node| &node.kind) {
            Some(NodeKind::Text { text }) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Whitespace-separated tokens of the `class` attribute.
    pub fn class_list(&self, id: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.attr(id, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_list(id).any(|token| token == class)
    }

    /// First element with the given tag, in document order.
    pub fn first_element_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.elements()
            .find(|id| self.tag_name(*id).is_some_and(|name| name.eq_ignore_ascii_case(tag)))
    }

    pub fn element_by_id(&self, id_value: &str) -> Option<NodeId> {
        self.elements().find(|id| self.attr(*id, "id") == Some(id_value))
    }

    pub fn body(&self) -> Option<NodeId> {
        self.first_element_by_tag("body")
    }

    pub fn head(&self) -> Option<NodeId> {
        self.first_element_by_tag("head")
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// Live form-control value, falling back to the `value` attribute.
    pub fn value(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id)?;
        node.value.as_deref().or_else(|| node.attr("value"))
    }

    /// Number of live nodes in the arena (document node included).
    pub fn node_count(&self) -> usize {
        self.descendants(self.root).count()
    }
}
