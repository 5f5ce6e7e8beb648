//! Structured design documents produced by the template editor.
//!
//! Only the path `body.{rows,headers,footers}[].columns[].contents[].values`
//! is typed. Everything else in the document is kept verbatim in `extra`
//! maps so that a processed tree serializes back with all foreign keys intact.

mod fields;
mod process;

pub use fields::{FieldDefinitions, FieldRecord};
pub use process::{extract_field_ids, process_fields, tag_with_identifiers};

use anyhow::{Context as _, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root of a design document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignTree {
    pub body: DesignBody,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignBody {
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<Row>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footers: Option<Vec<Row>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub columns: Vec<Column>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub contents: Vec<ContentNode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A leaf block (text, heading, button, ...).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub values: ContentValues,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ContentMeta>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-block metadata. `identifiers` is the space-joined history of fields
/// substituted into the block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentMeta {
    /// Identifiers recorded so far, in insertion order.
    pub fn identifier_list(&self) -> impl Iterator<Item = &str> + '_ {
        self.identifiers
            .as_deref()
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Append `field` unless it is already recorded.
    pub fn record_identifier(&mut self, field: &str) {
        if self.identifier_list().any(|existing| existing == field) {
            return;
        }
        let joined = match self.identifiers.take() {
            Some(existing) if !existing.trim().is_empty() => format!("{} {field}", existing.trim()),
            _ => field.to_owned(),
        };
        self.identifiers = Some(joined);
    }
}

impl DesignTree {
    /// Parse and validate a design document.
    ///
    /// # Errors
    /// Returns an error when the text is not JSON or a required child array is missing.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).context("invalid design document")
    }

    /// # Errors
    /// Returns an error when a required child array is missing or mistyped.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        serde_json::from_value(value).context("invalid design document")
    }

    /// # Errors
    /// Serialization only fails for non-string map keys, which this type never produces.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).context("failed to serialize design document")
    }

    /// # Errors
    /// See [`DesignTree::to_json`].
    pub fn to_value(&self) -> Result<Value, Error> {
        serde_json::to_value(self).context("failed to serialize design document")
    }

    /// Body rows followed by header and footer rows.
    pub fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.body
            .rows
            .iter()
            .chain(self.body.headers.iter().flatten())
            .chain(self.body.footers.iter().flatten())
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> + '_ {
        self.body
            .rows
            .iter_mut()
            .chain(self.body.headers.iter_mut().flatten())
            .chain(self.body.footers.iter_mut().flatten())
    }

    /// Every content block, in document order.
    pub fn content_nodes(&self) -> impl Iterator<Item = &ContentNode> + '_ {
        self.rows()
            .flat_map(|row| row.columns.iter())
            .flat_map(|column| column.contents.iter())
    }

    pub fn content_nodes_mut(&mut self) -> impl Iterator<Item = &mut ContentNode> + '_ {
        self.rows_mut()
            .flat_map(|row| row.columns.iter_mut())
            .flat_map(|column| column.contents.iter_mut())
    }
}
