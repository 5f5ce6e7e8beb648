//! Writing values into a rendered template.

use anyhow::{Result, anyhow};
use field_sync::{
    MergeError, TokenSpelling, WriteKind, merge, merge_markup, merge_with_report, selected_option,
};
use html::{DOM, parse_document};
use std::collections::HashMap;

#[test]
fn token_is_replaced_and_merge_is_idempotent() {
    let _ = env_logger::builder().is_test(true).try_init();
    let values = [("price", "$5")];
    let once = merge_markup("<span id=\"price\">{{price}}</span>", values);
    assert_eq!(once, "<span id=\"price\">$5</span>");
    let twice = merge_markup(&once, values);
    assert_eq!(twice, once);
}

#[test]
fn each_element_kind_gets_its_write() -> Result<()> {
    let mut dom = parse_document(
        "<input id=\"a\">\
         <textarea name=\"b\">old</textarea>\
         <select data-field=\"c\"><option>one</option><option value=\"2\">two</option></select>\
         <img class=\"field-d\">\
         <p data-id=\"e\">Hi [e]!</p>\
         <div id=\"f\"><b>replaced</b></div>",
    )?;
    let values = HashMap::from([
        ("a", "A"),
        ("b", "B"),
        ("c", "2"),
        ("d", "pic.png"),
        ("e", "there"),
        ("f", "<i>new</i>"),
    ]);
    let (markup, report) = merge_with_report(&mut dom, &values)?;

    assert_eq!(report.write_kind("a"), Some(WriteKind::InputValue));
    assert_eq!(report.write_kind("b"), Some(WriteKind::TextAreaValue));
    assert_eq!(report.write_kind("c"), Some(WriteKind::SelectValue));
    assert_eq!(report.write_kind("d"), Some(WriteKind::ImageSource));
    assert_eq!(
        report.write_kind("e"),
        Some(WriteKind::TokenSubstitution(TokenSpelling::Bracket))
    );
    assert_eq!(report.write_kind("f"), Some(WriteKind::FullOverwrite));
    assert!(report.skipped.is_empty());

    let input = dom.element_by_id("a").ok_or_else(|| anyhow!("no input"))?;
    assert_eq!(dom.value(input), Some("A"));
    assert!(markup.contains("<input id=\"a\" value=\"A\">"));
    assert!(markup.contains("<textarea name=\"b\">B</textarea>"));
    assert!(markup.contains("<img class=\"field-d\" src=\"pic.png\" alt=\"pic.png\">"));
    assert!(markup.contains("<p data-id=\"e\">Hi there!</p>"));
    assert!(markup.contains("<div id=\"f\"><i>new</i></div>"));

    let select = dom.first_element_by_tag("select").ok_or_else(|| anyhow!("no select"))?;
    assert_eq!(dom.value(select), Some("2"));
    assert!(!markup.contains("<select data-field=\"c\" value="));
    let option = selected_option(&dom, select).ok_or_else(|| anyhow!("no selection"))?;
    assert_eq!(dom.text_content(option), "two");
    Ok(())
}

#[test]
fn unknown_fields_are_skipped() -> Result<()> {
    let mut dom = parse_document("<p id=\"x\">keep</p>")?;
    let (markup, report) = merge_with_report(&mut dom, [("nope", "value")])?;
    assert_eq!(markup, "<p id=\"x\">keep</p>");
    assert_eq!(report.skipped, vec!["nope".to_owned()]);
    assert!(report.applied.is_empty());
    Ok(())
}

#[test]
fn document_without_body_is_rejected_untouched() {
    let mut dom = DOM::new();
    let before = dom.node_count();
    let result = merge(&mut dom, [("price", "$5")]);
    assert!(matches!(result, Err(MergeError::MissingBody)));
    assert_eq!(dom.node_count(), before);
}

#[test]
fn mixed_spellings_are_only_partially_substituted() {
    // Known limitation: only the first spelling present is replaced.
    let merged = merge_markup("<p id=\"x\">{{x}} and [x] and {{x}}</p>", [("x", "V")]);
    assert_eq!(merged, "<p id=\"x\">V and [x] and V</p>");
}
