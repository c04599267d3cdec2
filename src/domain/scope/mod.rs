//! Scope descriptors: schema-lite tables with declared columns.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use utoipa::ToSchema;

pub mod catalog;
pub mod registry;

pub use registry::ScopeRegistry;

/// A named table-like collection.
///
/// The column list declares which fields are accepted and returned; the
/// optional primary key names the column whose value becomes the record's
/// storage key. Without one, records are keyed by a 0-based insertion
/// index. `values` maps keys to records in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub values: Map<String, JsonValue>,
}

impl Scope {
    pub fn new(name: &str, columns: &[&str], primary_key: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            primary_key: primary_key.map(str::to_string),
            values: Map::new(),
        }
    }

    /// The scope's metadata with the stored records stripped.
    pub fn structure(&self) -> ScopeStructure {
        ScopeStructure {
            name: self.name.clone(),
            columns: self.columns.clone(),
            primary_key: self.primary_key.clone(),
        }
    }

    /// Projects `fields` onto the declared columns, returning the storage
    /// key and the record to store.
    ///
    /// Returns `None` when the record must be rejected: the primary-key
    /// value is missing, or no declared column is present at all. The
    /// primary-key value becomes the key and is not stored as a field;
    /// without a declared primary key the key is the current record count.
    pub(crate) fn project(&self, fields: &JsonValue) -> Option<(String, JsonValue)> {
        let fields = fields.as_object()?;

        let mut item = Map::new();
        let mut primary_key_value = None;
        for column in &self.columns {
            if self.primary_key.as_deref() == Some(column.as_str()) {
                primary_key_value = fields.get(column.as_str());
            } else if let Some(value) = fields.get(column.as_str()) {
                item.insert(column.clone(), value.clone());
            }
        }

        let key = match (&self.primary_key, primary_key_value) {
            (Some(_), Some(value)) => key_from_value(value)?,
            (Some(_), None) => return None,
            (None, _) => self.values.len().to_string(),
        };
        if item.is_empty() {
            return None;
        }

        Some((key, JsonValue::Object(item)))
    }
}

/// Scope metadata (name, columns, primary key) excluding stored records.
///
/// Served for the reserved `:structure` key so clients can introspect the
/// schema without fetching data.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScopeStructure {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
}

/// Renders a primary-key value as a storage key.
///
/// Keys are strings in the persisted form, so numeric primary keys are
/// stringified. Other value shapes (floats, arrays, objects, null) do not
/// make usable keys and are treated as a missing primary key.
pub fn key_from_value(value: &JsonValue) -> Option<String> {
    if let Some(text) = value.as_str() {
        return Some(text.to_string());
    }
    if let Some(number) = value.as_i64() {
        return Some(number.to_string());
    }
    if let Some(number) = value.as_u64() {
        return Some(number.to_string());
    }
    None
}
