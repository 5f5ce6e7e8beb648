//! Write field values into a rendered template document.

use crate::locator::locate;
use crate::tokens::TokenSpelling;
use core::fmt;
use html::{DOM, NodeId, parse_document};
use log::{debug, info, warn};
use std::error::Error;

/// How a value was written into the element that carries its field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteKind {
    /// Text input: live value and `value` attribute.
    InputValue,
    /// Multi-line text control: live value and text content.
    TextAreaValue,
    /// Selection control: live value only.
    SelectValue,
    /// Image: `src` and `alt`.
    ImageSource,
    /// A placeholder token inside the element's markup was replaced.
    TokenSubstitution(TokenSpelling),
    /// The element's markup was replaced wholesale.
    FullOverwrite,
}

/// What a merge did, field by field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Fields written, in input order.
    pub applied: Vec<(String, WriteKind)>,
    /// Fields with no matching element, or whose write failed.
    pub skipped: Vec<String>,
}

impl MergeReport {
    pub fn write_kind(&self, field: &str) -> Option<WriteKind> {
        self.applied
            .iter()
            .find(|(applied, _)| applied == field)
            .map(|(_, kind)| *kind)
    }
}

#[derive(Debug)]
pub enum MergeError {
    /// The template could not be parsed.
    Parse(anyhow::Error),
    /// The document has no body to merge into or serialize.
    MissingBody,
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(error) => write!(f, "failed to parse template: {error}"),
            Self::MissingBody => write!(f, "template document has no body"),
        }
    }
}

impl Error for MergeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(error) => Some(&**error),
            Self::MissingBody => None,
        }
    }
}

/// Merge `values` into `dom` and return the serialized body content.
///
/// Fields with no matching element are skipped. The body is checked before
/// any write so a failed merge leaves `dom` untouched.
///
/// # Errors
/// [`MergeError::MissingBody`] when `dom` has no body element.
pub fn merge<I, K, V>(dom: &mut DOM, values: I) -> Result<String, MergeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    merge_with_report(dom, values).map(|(markup, _)| markup)
}

/// [`merge`], also returning a [`MergeReport`].
///
/// # Errors
/// [`MergeError::MissingBody`] when `dom` has no body element.
pub fn merge_with_report<I, K, V>(dom: &mut DOM, values: I) -> Result<(String, MergeReport), MergeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let body = dom.body().ok_or(MergeError::MissingBody)?;
    let mut report = MergeReport::default();
    for (field, value) in values {
        let (field, value) = (field.as_ref(), value.as_ref());
        let Some(node) = locate(dom, field) else {
            debug!("no element for field {field:?}; skipping");
            report.skipped.push(field.to_owned());
            continue;
        };
        match write_value(dom, node, field, value) {
            Ok(kind) => report.applied.push((field.to_owned(), kind)),
            Err(error) => {
                warn!("failed to write field {field:?}: {error}");
                report.skipped.push(field.to_owned());
            }
        }
    }
    info!(
        "merged {} field(s), skipped {}",
        report.applied.len(),
        report.skipped.len()
    );
    Ok((dom.inner_html(body), report))
}

/// Parse `template`, merge `values` and return the body content.
///
/// Any parse or merge failure yields `template` unchanged.
pub fn merge_markup<I, K, V>(template: &str, values: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let result = parse_document(template)
        .map_err(MergeError::Parse)
        .and_then(|mut dom| merge(&mut dom, values));
    match result {
        Ok(markup) => markup,
        Err(error) => {
            warn!("merge failed, returning template unchanged: {error}");
            template.to_owned()
        }
    }
}

/// The `<option>` of `select` whose value matches the control's live value.
///
/// An option's value is its `value` attribute, or its trimmed text when the
/// attribute is absent.
pub fn selected_option(dom: &DOM, select: NodeId) -> Option<NodeId> {
    let live = dom.value(select)?;
    dom.descendants(select).find(|node| {
        dom.tag_name(*node)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("option"))
            && dom
                .attr(*node, "value")
                .map_or_else(|| dom.text_content(*node).trim() == live, |value| value == live)
    })
}

fn write_value(dom: &mut DOM, node: NodeId, field: &str, value: &str) -> Result<WriteKind, anyhow::Error> {
    let tag = dom.tag_name(node).unwrap_or_default().to_ascii_lowercase();
    match tag.as_str() {
        "input" => {
            dom.set_value(node, value);
            dom.set_attr(node, "value", value);
            Ok(WriteKind::InputValue)
        }
        "textarea" => {
            dom.set_value(node, value);
            dom.set_text_content(node, value)?;
            Ok(WriteKind::TextAreaValue)
        }
        "select" => {
            dom.set_value(node, value);
            Ok(WriteKind::SelectValue)
        }
        "img" => {
            dom.set_attr(node, "src", value);
            dom.set_attr(node, "alt", value);
            Ok(WriteKind::ImageSource)
        }
        _ => {
            let inner = dom.inner_html(node);
            for spelling in TokenSpelling::ALL {
                let token = spelling.wrap(field);
                if inner.contains(&token) {
                    dom.set_inner_html(node, &inner.replace(&token, value))?;
                    return Ok(WriteKind::TokenSubstitution(spelling));
                }
            }
            dom.set_inner_html(node, value)?;
            Ok(WriteKind::FullOverwrite)
        }
    }
}
