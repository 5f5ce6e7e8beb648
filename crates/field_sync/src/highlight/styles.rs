use html::{DOM, NodeId};
use log::debug;

/// Class added to the element of the active field.
pub const HIGHLIGHT_CLASS: &str = "field-highlight";
/// Class of the floating label naming the active field.
pub const TOOLTIP_CLASS: &str = "field-highlight-tooltip";
/// Class added to elements that can be clicked to focus their field.
pub const CLICKABLE_CLASS: &str = "field-clickable";
/// `id` of the injected style element.
pub const STYLE_ELEMENT_ID: &str = "field-sync-styles";

/// Presentation for the classes above.
pub const HIGHLIGHT_CSS: &str = "\
.field-highlight {
  outline: 2px solid #4f8ef7;
  outline-offset: 2px;
  background-color: rgba(79, 142, 247, 0.12);
  transition: outline-color 120ms ease-in-out, background-color 120ms ease-in-out;
}
.field-highlight-tooltip {
  position: absolute;
  top: -1.75em;
  left: 0;
  z-index: 2147483647;
  padding: 2px 6px;
  border-radius: 3px;
  background: #4f8ef7;
  color: #fff;
  font: 12px/1.4 sans-serif;
  white-space: nowrap;
  pointer-events: none;
}
.field-clickable {
  cursor: pointer;
}
.field-clickable:hover {
  outline: 1px dashed #4f8ef7;
}
";

/// Install the highlight stylesheet into `dom`, replacing any previous copy.
///
/// The style element goes into `<head>`, or `<body>` when there is no head.
///
/// # Errors
/// Returns an error if the new node cannot be attached.
pub fn inject_styles(dom: &mut DOM) -> Result<NodeId, anyhow::Error> {
    if let Some(existing) = dom.element_by_id(STYLE_ELEMENT_ID) {
        debug!("replacing existing highlight stylesheet");
        dom.remove_node(existing);
    }
    let parent = dom.head().or_else(|| dom.body()).unwrap_or_else(|| dom.root());
    let style = dom.create_element("style");
    dom.set_attr(style, "id", STYLE_ELEMENT_ID);
    dom.append_child(parent, style)?;
    dom.set_text_content(style, HIGHLIGHT_CSS)?;
    Ok(style)
}
