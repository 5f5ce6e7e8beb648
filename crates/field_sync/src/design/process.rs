//! Placeholder discovery and default-value injection over a design tree.

use super::{ContentMeta, DesignTree, FieldDefinitions};
use crate::tokens::{DOUBLE_BRACE_TOKEN, double_brace_identifiers};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeSet;

/// Opening tag at the very start of a block: the tag head and its attribute text.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static LEADING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*<[A-Za-z][A-Za-z0-9:-]*)([^>]*)>").expect("valid tag pattern"));

/// One attribute in a tag's attribute text: separator, name and optional value.
/// Matches consume quoted values whole, so text inside a value is never read as a name.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(^|\s+)([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute pattern")
});

/// Every identifier referenced by a `{{identifier}}` token in any block's
/// `text` or `html`, across body rows, headers and footers.
pub fn extract_field_ids(tree: &DesignTree) -> BTreeSet<String> {
    let found: BTreeSet<String> = tree
        .content_nodes()
        .flat_map(|node| [node.values.text.as_deref(), node.values.html.as_deref()])
        .flatten()
        .flat_map(double_brace_identifiers)
        .map(str::to_owned)
        .collect();
    debug!("extracted {} field identifier(s)", found.len());
    found
}

/// Copy of `tree` with every known `{{identifier}}` replaced by its default value.
///
/// Each substituted block is tagged with the identifiers it received (see
/// [`tag_with_identifiers`]) and its `_meta.identifiers` history is extended.
/// Tokens without a definition are left as they are. `tree` is not modified.
pub fn process_fields(tree: &DesignTree, definitions: &FieldDefinitions) -> DesignTree {
    let mut processed = tree.clone();
    let mut touched = 0_usize;
    for node in processed.content_nodes_mut() {
        let values = &mut node.values;
        let mut substituted: Vec<String> = Vec::new();
        for slot in [&mut values.text, &mut values.html] {
            let Some(content) = slot.as_deref() else {
                continue;
            };
            let Some((replaced, fields)) = substitute(content, definitions) else {
                continue;
            };
            *slot = Some(replaced);
            for field in fields {
                if !substituted.contains(&field) {
                    substituted.push(field);
                }
            }
        }
        if substituted.is_empty() {
            continue;
        }
        touched = touched.saturating_add(1);
        let meta = values.meta.get_or_insert_with(ContentMeta::default);
        for field in &substituted {
            meta.record_identifier(field);
        }
    }
    info!("injected field defaults into {touched} block(s)");
    processed
}

/// Replace known tokens in `content`, returning the tagged result and the
/// identifiers substituted, or `None` when nothing was replaced.
fn substitute(content: &str, definitions: &FieldDefinitions) -> Option<(String, Vec<String>)> {
    let mut fields: Vec<String> = Vec::new();
    let replaced = DOUBLE_BRACE_TOKEN.replace_all(content, |captures: &Captures<'_>| {
        let token = captures.get(0).map_or("", |found| found.as_str());
        let field = captures.get(1).map_or("", |found| found.as_str().trim());
        match definitions.get(field) {
            Some(value) if !field.is_empty() => {
                if !fields.iter().any(|seen| seen == field) {
                    fields.push(field.to_owned());
                }
                value.to_owned()
            }
            _ => token.to_owned(),
        }
    });
    if fields.is_empty() {
        return None;
    }
    Some((tag_with_identifiers(&replaced, &fields), fields))
}

/// Mark `content` with `fields` so the preview can find it again.
///
/// When `content` opens with a tag, the identifiers are merged into that tag's
/// `id` attribute (space-joined, no duplicates). Otherwise the whole content
/// is wrapped in `<span id="...">`.
pub fn tag_with_identifiers(content: &str, fields: &[String]) -> String {
    let Some(captures) = LEADING_TAG.captures(content) else {
        return format!("<span id=\"{}\">{content}</span>", escape_attribute(&fields.join(" ")));
    };
    let (Some(whole), Some(head), Some(attributes)) = (captures.get(0), captures.get(1), captures.get(2))
    else {
        return content.to_owned();
    };
    let attributes = attributes.as_str();
    let id_attribute = ATTRIBUTE.captures_iter(attributes).find(|attribute| {
        attribute
            .get(2)
            .is_some_and(|name| name.as_str().eq_ignore_ascii_case("id"))
    });
    let rewritten = match id_attribute {
        Some(id_captures) => {
            let existing = id_captures
                .get(3)
                .or_else(|| id_captures.get(4))
                .or_else(|| id_captures.get(5))
                .map_or("", |found| found.as_str());
            let separator = id_captures.get(1).map_or("", |found| found.as_str());
            let span = id_captures.get(0).map_or(0..0, |found| found.range());
            format!(
                "{}{separator}id=\"{}\"{}",
                &attributes[..span.start],
                escape_attribute(&join_unique(existing, fields)),
                &attributes[span.end..]
            )
        }
        None => format!(
            " id=\"{}\"{attributes}",
            escape_attribute(&join_unique("", fields))
        ),
    };
    format!("{}{rewritten}>{}", head.as_str(), &content[whole.end()..])
}

fn join_unique(existing: &str, fields: &[String]) -> String {
    let mut tokens: Vec<&str> = existing.split_ascii_whitespace().collect();
    for field in fields {
        if !tokens.contains(&field.as_str()) {
            tokens.push(field);
        }
    }
    tokens.join(" ")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|field| (*field).to_owned()).collect()
    }

    #[test]
    fn plain_text_is_wrapped_in_a_span() {
        assert_eq!(
            tag_with_identifiers("Hello!", &ids(&["greeting"])),
            "<span id=\"greeting\">Hello!</span>"
        );
    }

    #[test]
    fn leading_tag_receives_the_identifiers() {
        assert_eq!(
            tag_with_identifiers("<p class=\"x\">Hi</p>", &ids(&["a", "b"])),
            "<p id=\"a b\" class=\"x\">Hi</p>"
        );
        assert_eq!(
            tag_with_identifiers("<p data-id=\"q\" id='a'>Hi</p>", &ids(&["a", "b"])),
            "<p data-id=\"q\" id=\"a b\">Hi</p>"
        );
        assert_eq!(tag_with_identifiers("<br/>", &ids(&["a"])), "<br id=\"a\"/>");
    }

    #[test]
    fn id_text_inside_other_values_is_left_alone() {
        assert_eq!(
            tag_with_identifiers("<a title=\"my id=5\" id=\"cta\">x</a>", &ids(&["code"])),
            "<a title=\"my id=5\" id=\"cta code\">x</a>"
        );
        assert_eq!(
            tag_with_identifiers("<a data-note='id=\"x\"' href=\"#\">x</a>", &ids(&["code"])),
            "<a id=\"code\" data-note='id=\"x\"' href=\"#\">x</a>"
        );
        assert_eq!(
            tag_with_identifiers("<p ID=top>x</p>", &ids(&["code"])),
            "<p id=\"top code\">x</p>"
        );
    }
}
