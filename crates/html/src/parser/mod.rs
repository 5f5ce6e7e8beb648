mod html5ever_engine;

use crate::dom::{DOM, html_name};
use crate::parser::html5ever_engine::DomSink;
use anyhow::{Context as _, Error};
use html5ever::tendril::TendrilSink as _;
use html5ever::ParseOpts;

/// Parse a complete HTML document.
///
/// html5ever recovers from malformed markup the way a browser does, so errors
/// here come from decoding the input stream rather than from tag soup.
pub fn parse_document(markup: &str) -> Result<DOM, Error> {
    html5ever::parse_document(DomSink::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut markup.as_bytes())
        .context("failed to read HTML document")
}

/// Parse `markup` as the children of a `context_tag` element.
///
/// The returned document holds a single `<html>` element whose children are the
/// parsed fragment nodes.
pub fn parse_fragment(markup: &str, context_tag: &str) -> Result<DOM, Error> {
    html5ever::parse_fragment(
        DomSink::default(),
        ParseOpts::default(),
        html_name(context_tag),
        Vec::new(),
    )
    .from_utf8()
    .read_from(&mut markup.as_bytes())
    .with_context(|| format!("failed to read HTML fragment in <{context_tag}>"))
}
