pub mod load;

use std::collections::BTreeMap;

use compact_str::CompactString;
use serde::Deserialize;

pub use load::{load_records, parse_records};

/// One user record, reduced to what the treemap needs plus the raw fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataItem {
    pub id: CompactString,
    /// Drives the area of the box.
    pub value: f64,
    /// Drives positive/negative coloring when present; falls back to `value`.
    pub color_value: Option<f64>,
    pub label: Option<CompactString>,
    /// Every other field of the source record, for tooltips.
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl DataItem {
    pub fn new(id: impl Into<CompactString>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
            color_value: None,
            label: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn coloring_value(&self) -> f64 {
        self.color_value.unwrap_or(self.value)
    }

    /// Text shown for this item: the label when mapped, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Which record fields feed the id, the value and the optional extras.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub id: String,
    pub value: String,
    pub color: Option<String>,
    pub label: Option<String>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            value: "value".to_string(),
            color: None,
            label: None,
        }
    }
}
