use anyhow::{Context as _, Error};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keys naming the field in a record, in preference order.
const ID_KEYS: [&str; 3] = ["id", "name", "key"];
/// Keys holding the default value in a record, in preference order.
const DEFAULT_KEYS: [&str; 4] = ["defaultValue", "default", "default_value", "value"];

/// One entry of a list-shaped field definition payload.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRecord {
    pub id: String,
    pub default: Option<Value>,
}

impl FieldRecord {
    /// Read a record, taking the first non-empty string among `id`, `name`, `key`.
    pub fn from_map(mut record: Map<String, Value>) -> Option<Self> {
        let id = ID_KEYS.iter().find_map(|key| match record.get(*key) {
            Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_owned()),
            _ => None,
        })?;
        let default = DEFAULT_KEYS.iter().find_map(|key| record.remove(*key));
        Some(Self { id, default })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDefinitions {
    Map(BTreeMap<String, Value>),
    List(Vec<Map<String, Value>>),
}

/// Field identifier to default value, as used by [`process_fields`](super::process_fields).
///
/// Accepts either a JSON object (`{"price": "$5"}`) or a list of records
/// (`[{"id": "price", "defaultValue": "$5"}]`). Non-string defaults are
/// rendered as their JSON text; `null` and missing defaults become empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldDefinitions {
    values: BTreeMap<String, String>,
}

impl FieldDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns an error when `text` is neither an object nor a list of field records.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).context("invalid field definitions")
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

fn render_default(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    }
}

impl<'de> Deserialize<'de> for FieldDefinitions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = match RawDefinitions::deserialize(deserializer)? {
            RawDefinitions::Map(map) => map
                .into_iter()
                .map(|(field, value)| (field, render_default(Some(value))))
                .collect(),
            RawDefinitions::List(records) => {
                let mut values = BTreeMap::new();
                for (index, record) in records.into_iter().enumerate() {
                    let record = FieldRecord::from_map(record).ok_or_else(|| {
                        D::Error::custom(format!("field record {index} has no identifier"))
                    })?;
                    values.insert(record.id, render_default(record.default));
                }
                values
            }
        };
        Ok(Self { values })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldDefinitions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }
}
