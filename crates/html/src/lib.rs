#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! HTML document model for template editing.
//!
//! A [`DOM`] is an arena-backed tree built by the html5ever tree builder. It can be
//! queried, mutated in place, serialized back to markup, and carries a small click
//! listener registry so a host can route pointer events into it.

pub mod dom;
pub mod parser;

pub use dom::events::{ClickEvent, ListenerId};
pub use dom::{DOM, DOMNode, NodeId, NodeKind};
pub use parser::{parse_document, parse_fragment};
