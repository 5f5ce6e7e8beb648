//! Approximate "is this element rendered with a box" from markup alone.

use css_style_attr::property_value;
use html::{DOM, NodeId};

/// Elements that never produce a box.
const NON_RENDERED_TAGS: [&str; 9] = [
    "head", "script", "style", "template", "meta", "link", "title", "noscript", "base",
];

/// Elements that have intrinsic size even when they have no content.
const REPLACED_TAGS: [&str; 11] = [
    "img", "input", "select", "textarea", "button", "video", "audio", "canvas", "svg", "iframe",
    "object",
];

fn is_zero_length(value: &str) -> bool {
    let trimmed = value.trim().to_ascii_lowercase();
    let number = trimmed
        .trim_end_matches(|character: char| character.is_ascii_alphabetic() || character == '%');
    !number.is_empty() && number.parse::<f32>().is_ok_and(|parsed| parsed.abs() < f32::EPSILON)
}

/// Whether `node` itself hides its subtree.
fn hides_subtree(dom: &DOM, node: NodeId) -> bool {
    let tag = dom.tag_name(node).unwrap_or_default().to_ascii_lowercase();
    if NON_RENDERED_TAGS.contains(&tag.as_str()) || dom.attr(node, "hidden").is_some() {
        return true;
    }
    if tag == "input"
        && dom
            .attr(node, "type")
            .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"))
    {
        return true;
    }
    let Some(style) = dom.attr(node, "style") else {
        return false;
    };
    property_value(style, "display").is_some_and(|display| display.eq_ignore_ascii_case("none"))
        || property_value(style, "visibility")
            .is_some_and(|visibility| visibility.eq_ignore_ascii_case("hidden"))
        || property_value(style, "width").is_some_and(|width| is_zero_length(&width))
        || property_value(style, "height").is_some_and(|height| is_zero_length(&height))
}

fn has_intrinsic_content(dom: &DOM, node: NodeId) -> bool {
    dom.descendants(node).any(|descendant| {
        dom.text(descendant)
            .is_some_and(|text| !text.trim().is_empty())
            || dom.tag_name(descendant).is_some_and(|tag| {
                REPLACED_TAGS
                    .iter()
                    .any(|replaced| tag.eq_ignore_ascii_case(replaced))
            })
    })
}

/// True when `node` is an element that would be laid out with a non-empty box.
pub fn is_rendered(dom: &DOM, node: NodeId) -> bool {
    if !dom.is_element(node) || hides_subtree(dom, node) {
        return false;
    }
    if dom
        .ancestors(node)
        .filter(|ancestor| dom.is_element(*ancestor))
        .any(|ancestor| hides_subtree(dom, ancestor))
    {
        return false;
    }
    has_intrinsic_content(dom, node)
}
