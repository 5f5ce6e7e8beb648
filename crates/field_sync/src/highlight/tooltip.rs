use super::styles::TOOLTIP_CLASS;
use css_style_attr::{property_value, set_property};
use html::{DOM, NodeId};
use log::trace;

/// Attach a label reading `display_name` to the parent of `target`.
///
/// The parent is made a positioning context when its inline position is
/// absent or `static`. Returns the label node, or `None` if `target` has no
/// parent element.
pub(crate) fn spawn_tooltip(
    dom: &mut DOM,
    target: NodeId,
    display_name: &str,
) -> Result<Option<NodeId>, anyhow::Error> {
    let Some(parent) = dom.parent(target).filter(|parent| dom.is_element(*parent)) else {
        return Ok(None);
    };
    let style = dom.attr(parent, "style").unwrap_or_default().to_owned();
    let positioned = property_value(&style, "position")
        .is_some_and(|position| !position.eq_ignore_ascii_case("static"));
    if !positioned {
        dom.set_attr(parent, "style", &set_property(&style, "position", "relative"));
    }
    let tooltip = dom.create_element("div");
    dom.set_attr(tooltip, "class", TOOLTIP_CLASS);
    dom.set_text_content(tooltip, display_name)?;
    dom.append_child(parent, tooltip)?;
    trace!("tooltip {tooltip:?} attached under {parent:?}");
    Ok(Some(tooltip))
}
