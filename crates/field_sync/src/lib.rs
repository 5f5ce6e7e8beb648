#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! Template field synchronization.
//!
//! Ties three representations of a coupon/popup template together through a
//! shared field identifier:
//! - the structured design tree authored in the editor ([`design`]),
//! - the rendered template document that values are merged into ([`merge`]),
//! - the live preview document that mirrors form focus as a highlight ([`highlight`]).
//!
//! All of them resolve identifiers to elements through [`locator`].

mod adapter;
pub mod config;
pub mod design;
pub mod highlight;
pub mod locator;
pub mod merge;
pub mod tokens;

pub use config::SyncConfig;
pub use design::{DesignTree, FieldDefinitions, extract_field_ids, process_fields};
pub use highlight::{
    FormSignal, FrameRequest, HighlightOutcome, SyncBinding, Synchronizer, inject_styles,
    setup_bidirectional_sync,
};
pub use locator::{Located, Strategy, field_id_of, locate, locate_with_strategy};
pub use merge::{
    MergeError, MergeReport, WriteKind, merge, merge_markup, merge_with_report, selected_option,
};
pub use tokens::TokenSpelling;
