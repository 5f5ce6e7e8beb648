use core::fmt;

use super::{DOM, DOMNode, NodeKind};
use indextree::NodeId;

use serde_json::{Map, Value, json};

// -----------------------
// Markup serialization
// -----------------------

/// Elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text children are written out verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn write_node(dom: &DOM, id: NodeId, out: &mut String) {
    let Some(DOMNode { kind, attrs, .. }) = dom.node(id) else {
        return;
    };
    match kind {
        NodeKind::Document => write_children(dom, id, out),
        NodeKind::Doctype { name } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeKind::Element { name } => {
            let tag = &*name.local;
            out.push('<');
            out.push_str(tag);
            for (key, value) in attrs {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            write_children(dom, id, out);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeKind::Text { text } => {
            let raw = dom
                .parent(id)
                .and_then(|parent| dom.tag_name(parent))
                .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
            if raw {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        NodeKind::Comment { text } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

fn write_children(dom: &DOM, id: NodeId, out: &mut String) {
    for child in dom.children(id) {
        write_node(dom, child, out);
    }
}

impl DOM {
    /// Markup of the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        write_children(self, id, &mut out);
        out
    }

    /// Markup of `id` itself, including its start and end tags.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        write_node(self, id, &mut out);
        out
    }

    /// Markup of the whole document.
    pub fn to_html(&self) -> String {
        self.outer_html(self.root())
    }
}

// -----------------------
// JSON snapshots
// -----------------------

fn flush_text(children: &mut Vec<Value>, text_buf: &mut String) {
    if !text_buf.trim().is_empty() {
        children.push(json!({ "type": "text", "text": text_buf.clone() }));
    }
    text_buf.clear();
}

fn coalesce_children(dom: &DOM, id: NodeId) -> Vec<Value> {
    let mut children: Vec<Value> = Vec::new();
    let mut text_buf = String::new();
    for child in dom.children(id) {
        if let Some(text) = dom.text(child) {
            text_buf.push_str(text);
            continue;
        }
        flush_text(&mut children, &mut text_buf);
        let value = node_to_json(dom, child);
        if !value.is_null() {
            children.push(value);
        }
    }
    flush_text(&mut children, &mut text_buf);
    children
}

fn node_to_json(dom: &DOM, id: NodeId) -> Value {
    let Some(DOMNode { kind, attrs, value }) = dom.node(id) else {
        return Value::Null;
    };
    match kind {
        NodeKind::Document => json!({ "type": "document", "children": coalesce_children(dom, id) }),
        NodeKind::Element { name } => {
            // Sorted for deterministic snapshots
            let mut pairs: Vec<&(String, String)> = attrs.iter().collect();
            pairs.sort_by(|left, right| left.0.cmp(&right.0));
            let mut attrs_obj = Map::new();
            for (key, attr_value) in pairs {
                attrs_obj.insert(key.clone(), Value::String(attr_value.clone()));
            }
            let mut obj = json!({
                "type": "element",
                "tag": &*name.local,
                "attrs": Value::Object(attrs_obj),
                "children": coalesce_children(dom, id),
            });
            if let (Some(live), Some(map)) = (value, obj.as_object_mut()) {
                map.insert("value".to_owned(), Value::String(live.clone()));
            }
            obj
        }
        NodeKind::Text { text } => {
            if text.trim().is_empty() {
                Value::Null
            } else {
                json!({ "type": "text", "text": text })
            }
        }
        NodeKind::Doctype { .. } | NodeKind::Comment { .. } => Value::Null,
    }
}

impl DOM {
    /// Build a deterministic JSON representation of the subtree at `id`.
    /// Schema:
    /// - Document: { "type":"document", "children":[ ... ] }
    /// - Element: { "type":"element", "tag": "div", "attrs": {..}, "children":[ ... ], "value"?: "..." }
    /// - Text: { "type":"text", "text":"..." }
    pub fn to_json_value(&self, id: NodeId) -> Value {
        node_to_json(self, id)
    }

    /// Pretty JSON string for snapshots and test comparisons.
    pub fn to_json_string(&self, id: NodeId) -> String {
        serde_json::to_string_pretty(&self.to_json_value(id)).unwrap_or_else(|_| String::from("{}"))
    }
}

// -----------------------
// Debug tree dump
// -----------------------

fn write_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str("  ")?;
    }
    Ok(())
}

fn debug_node(dom: &DOM, id: NodeId, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    let Some(node) = dom.node(id) else {
        return Ok(());
    };
    match &node.kind {
        NodeKind::Document => {
            write_indent(f, depth)?;
            writeln!(f, "#document")?;
        }
        NodeKind::Doctype { name } => {
            write_indent(f, depth)?;
            writeln!(f, "<!DOCTYPE {name}>")?;
        }
        NodeKind::Element { name } => {
            write_indent(f, depth)?;
            write!(f, "<{}", &*name.local)?;
            for (key, value) in &node.attrs {
                write!(f, " {key}={value:?}")?;
            }
            writeln!(f, ">")?;
        }
        NodeKind::Text { text } => {
            // Skip pure-whitespace text nodes in the printer for cleaner output
            if text.chars().all(char::is_whitespace) {
                return Ok(());
            }
            write_indent(f, depth)?;
            writeln!(f, "{text:?}")?;
        }
        NodeKind::Comment { text } => {
            write_indent(f, depth)?;
            writeln!(f, "<!-- {text} -->")?;
        }
    }
    for child in dom.children(id) {
        debug_node(dom, child, f, depth + 1)?;
    }
    Ok(())
}

impl fmt::Debug for DOM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DOM")?;
        debug_node(self, self.root(), f, 0)
    }
}
