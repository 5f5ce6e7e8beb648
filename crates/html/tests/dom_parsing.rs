//! Parsing, serialization and mutation of the arena DOM.

use anyhow::{Result, anyhow};
use html::{DOM, parse_document};

fn body_of(dom: &DOM) -> Result<html::NodeId> {
    dom.body().ok_or_else(|| anyhow!("document has no body"))
}

#[test]
fn parser_builds_implied_structure() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let dom = parse_document("<p class=\"a b\">Hello <b>world</b></p>")?;
    assert!(dom.head().is_some(), "html5ever should imply <head>");
    let body = body_of(&dom)?;
    assert_eq!(dom.inner_html(body), "<p class=\"a b\">Hello <b>world</b></p>");
    let paragraph = dom.first_element_by_tag("p").ok_or_else(|| anyhow!("no <p>"))?;
    assert!(dom.has_class(paragraph, "b"));
    assert_eq!(dom.text_content(paragraph), "Hello world");
    Ok(())
}

#[test]
fn serializer_escapes_text_and_attributes() -> Result<()> {
    let dom = parse_document("<div title='a \"q\" &amp; b'>1 &lt; 2</div><br>")?;
    let body = body_of(&dom)?;
    assert_eq!(
        dom.inner_html(body),
        "<div title=\"a &quot;q&quot; &amp; b\">1 &lt; 2</div><br>"
    );
    Ok(())
}

#[test]
fn style_text_is_not_escaped() -> Result<()> {
    let dom = parse_document("<style>a > b { color: red }</style>")?;
    let style = dom.first_element_by_tag("style").ok_or_else(|| anyhow!("no <style>"))?;
    assert_eq!(dom.outer_html(style), "<style>a > b { color: red }</style>");
    Ok(())
}

#[test]
fn inner_html_replaces_children_with_fragment() -> Result<()> {
    let mut dom = parse_document("<div id=\"box\"><i>old</i></div>")?;
    let target = dom.element_by_id("box").ok_or_else(|| anyhow!("no #box"))?;
    dom.set_inner_html(target, "<em>new</em> text")?;
    assert_eq!(dom.inner_html(target), "<em>new</em> text");
    assert_eq!(dom.first_element_by_tag("i"), None);
    Ok(())
}

#[test]
fn table_fragments_use_the_element_as_context() -> Result<()> {
    let mut dom = parse_document("<table><tbody id=\"rows\"></tbody></table>")?;
    let rows = dom.element_by_id("rows").ok_or_else(|| anyhow!("no #rows"))?;
    dom.set_inner_html(rows, "<tr><td>1</td></tr>")?;
    assert_eq!(dom.inner_html(rows), "<tr><td>1</td></tr>");
    Ok(())
}

#[test]
fn live_value_is_separate_from_attribute() -> Result<()> {
    let mut dom = parse_document("<input name=\"q\" value=\"a\">")?;
    let input = dom.first_element_by_tag("input").ok_or_else(|| anyhow!("no <input>"))?;
    assert_eq!(dom.value(input), Some("a"));
    dom.set_value(input, "b");
    assert_eq!(dom.value(input), Some("b"));
    assert_eq!(dom.attr(input, "value"), Some("a"));
    Ok(())
}

#[test]
fn json_snapshot_is_sorted_and_skips_whitespace() -> Result<()> {
    let dom = parse_document("<span z=\"1\" a=\"2\"> hi </span>\n")?;
    let span = dom.first_element_by_tag("span").ok_or_else(|| anyhow!("no <span>"))?;
    let snapshot = dom.to_json_value(span);
    let keys: Vec<&String> = snapshot["attrs"]
        .as_object()
        .map(|attrs| attrs.keys().collect())
        .unwrap_or_default();
    assert_eq!(keys, vec!["a", "z"]);
    assert_eq!(snapshot["children"][0]["text"], " hi ");
    Ok(())
}

#[test]
fn json_string_snapshot_includes_live_values() -> Result<()> {
    let mut dom = parse_document("<form id=\"f\"><input name=\"q\"><!-- note --> <b>go</b></form>")?;
    let form = dom.element_by_id("f").ok_or_else(|| anyhow!("no #f"))?;
    let input = dom.first_element_by_tag("input").ok_or_else(|| anyhow!("no <input>"))?;
    dom.set_value(input, "shoes");

    let snapshot = dom.to_json_string(form);
    assert!(snapshot.lines().count() > 1, "snapshot should be pretty-printed");
    let parsed: serde_json::Value = serde_json::from_str(&snapshot)?;
    assert_eq!(
        parsed,
        serde_json::json!({
            "type": "element",
            "tag": "form",
            "attrs": { "id": "f" },
            "children": [
                {
                    "type": "element",
                    "tag": "input",
                    "attrs": { "name": "q" },
                    "children": [],
                    "value": "shoes"
                },
                {
                    "type": "element",
                    "tag": "b",
                    "attrs": {},
                    "children": [{ "type": "text", "text": "go" }]
                }
            ]
        })
    );
    Ok(())
}
