use std::path::Path;

use anyhow::{bail, Context, Result};
use compact_str::{CompactString, ToCompactString};
use serde_json::{Map, Value};

use super::{DataItem, FieldMapping};

/// Read a JSON data file and map its records through `mapping`.
pub fn load_records(path: &Path, mapping: &FieldMapping) -> Result<Vec<DataItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading data file {}", path.display()))?;
    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing JSON in {}", path.display()))?;
    let items = parse_records(&json, mapping)
        .with_context(|| format!("mapping records from {}", path.display()))?;

    tracing::info!("Loaded {} records from {}", items.len(), path.display());
    Ok(items)
}

/// Map a JSON array of objects (or `{"data": [...]}`) to [`DataItem`]s.
///
/// Records without a usable id or numeric value are skipped with a warning.
pub fn parse_records(json: &Value, mapping: &FieldMapping) -> Result<Vec<DataItem>> {
    let records = match json {
        Value::Array(records) => records,
        Value::Object(obj) => match obj.get("data") {
            Some(Value::Array(records)) => records,
            _ => bail!("expected a JSON array or an object with a \"data\" array"),
        },
        _ => bail!("expected a JSON array or an object with a \"data\" array"),
    };

    let mut items = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let Value::Object(fields) = record else {
            bail!("record {index} is not an object");
        };
        match map_record(fields, mapping) {
            Some(item) => items.push(item),
            None => tracing::warn!(
                "Skipping record {}: needs an id in '{}' and a number in '{}'",
                index,
                mapping.id,
                mapping.value
            ),
        }
    }
    Ok(items)
}

fn map_record(fields: &Map<String, Value>, mapping: &FieldMapping) -> Option<DataItem> {
    let id = id_of(fields.get(&mapping.id)?)?;
    let value = fields.get(&mapping.value)?.as_f64()?;
    let color_value = mapping
        .color
        .as_ref()
        .and_then(|name| fields.get(name))
        .and_then(Value::as_f64);
    let label = mapping
        .label
        .as_ref()
        .and_then(|name| fields.get(name))
        .and_then(|v| match v {
            Value::String(s) => Some(CompactString::new(s)),
            Value::Number(n) => Some(n.to_compact_string()),
            _ => None,
        });

    let rest = fields
        .iter()
        .filter(|(name, _)| **name != mapping.id && **name != mapping.value)
        .map(|(name, v)| (name.clone(), v.clone()))
        .collect();

    Some(DataItem {
        id,
        value,
        color_value,
        label,
        fields: rest,
    })
}

fn id_of(value: &Value) -> Option<CompactString> {
    match value {
        Value::String(s) => Some(CompactString::new(s)),
        Value::Number(n) => Some(n.to_compact_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn maps_default_fields() {
        let json = json!([
            { "id": "a", "value": 10.5, "sector": "tech" },
            { "id": 7, "value": 3 }
        ]);
        let items = parse_records(&json, &FieldMapping::default()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "a");
        assert_eq!(items[0].value, 10.5);
        assert_eq!(items[0].fields.get("sector"), Some(&json!("tech")));
        assert!(!items[0].fields.contains_key("id"));
        assert_eq!(items[1].id, "7");
        assert_eq!(items[1].value, 3.0);
    }

    #[test]
    fn custom_mapping_reads_color_and_label() {
        let json = json!({
            "data": [
                { "ticker": "ACME", "cap": 120.0, "change": -2.5, "name": "Acme Corp" }
            ]
        });
        let mapping = FieldMapping {
            id: "ticker".into(),
            value: "cap".into(),
            color: Some("change".into()),
            label: Some("name".into()),
        };
        let items = parse_records(&json, &mapping).unwrap();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, "ACME");
        assert_eq!(item.value, 120.0);
        assert_eq!(item.color_value, Some(-2.5));
        assert_eq!(item.coloring_value(), -2.5);
        assert_eq!(item.display_name(), "Acme Corp");
        assert!(item.fields.contains_key("change"));
    }

    #[test]
    fn skips_records_without_id_or_numeric_value() {
        let json = json!([
            { "id": "ok", "value": 1 },
            { "value": 2 },
            { "id": "text", "value": "12" },
            { "id": true, "value": 4 },
            { "id": "neg", "value": -4 }
        ]);
        let items = parse_records(&json, &FieldMapping::default()).unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "neg"]);
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(parse_records(&json!({ "id": 1 }), &FieldMapping::default()).is_err());
        assert!(parse_records(&json!("nope"), &FieldMapping::default()).is_err());
        assert!(parse_records(&json!([1, 2]), &FieldMapping::default()).is_err());
    }

    #[test]
    fn loads_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "x", "value": 2}}, {{"id": "y", "value": 1}}]"#).unwrap();

        let items = load_records(file.path(), &FieldMapping::default()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, "y");
    }

    #[test]
    fn load_error_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_records(file.path(), &FieldMapping::default()).unwrap_err();
        assert!(format!("{err:#}").contains(&file.path().display().to_string()));
    }
}
