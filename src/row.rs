//! row mapping
//!
//! moves data between a nested response object and a flat row keyed by
//! field key. a key missing from a flattened row means a parent object on
//! the path was absent; an explicit `null` means the leaf itself was null.

use crate::error::{Error, Result};
use crate::field::{FieldDefinition, FieldType};
use serde_json::{Map, Number, Value};

/// flat row keyed by [`FieldDefinition::key`]
pub type Row = Map<String, Value>;

/// nested object -> flat row
///
/// `id` is copied through when present. fields whose path crosses a null or
/// missing parent are left out of the row.
pub fn flatten(data: &Value, fields: &[FieldDefinition]) -> Row {
    let mut row = Row::new();
    if let Some(id) = data.get("id") {
        row.insert("id".to_string(), id.clone());
    }

    for field in fields {
        if let Some(value) = lookup_path(data, field) {
            row.insert(field.key.clone(), value.clone());
        }
    }
    row
}

fn lookup_path<'a>(data: &'a Value, field: &FieldDefinition) -> Option<&'a Value> {
    field.segments().try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        _ => None,
    })
}

/// flat row -> nested object
///
/// only fields whose key is present in `row` are written, so a sparse row
/// produces a sparse object. fields sharing a parent segment share one
/// intermediate object. `id` is never a registry field, so it stays out of
/// the result and out of mutation input.
pub fn unflatten(row: &Row, fields: &[FieldDefinition]) -> Row {
    let mut nested = Row::new();
    for field in fields {
        let Some(value) = row.get(&field.key) else {
            continue;
        };

        let segments: Vec<&str> = field.segments().collect();
        let Some((leaf, parents)) = segments.split_last() else {
            continue;
        };

        let mut target = &mut nested;
        for parent in parents {
            let entry = target
                .entry(parent.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            target = match entry {
                Value::Object(map) => map,
                _ => unreachable!("entry was just made an object"),
            };
        }
        target.insert(leaf.to_string(), value.clone());
    }
    nested
}

/// coerce raw ui input into a json value of the field's type
///
/// empty input for a non-string field is `null`.
pub fn coerce_value(field: &FieldDefinition, raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() && field.field_type != FieldType::String {
        return Ok(Value::Null);
    }

    let malformed = || Error::MalformedInput {
        key: field.key.clone(),
        value: raw.to_string(),
        expected: field.field_type,
    };

    match field.field_type {
        FieldType::String => Ok(Value::String(raw.to_string())),
        FieldType::Number => {
            if let Ok(int) = trimmed.parse::<i64>() {
                return Ok(Value::Number(int.into()));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(malformed)
        }
        FieldType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(malformed()),
        },
        FieldType::Date => {
            let valid = chrono::DateTime::parse_from_rfc3339(trimmed).is_ok()
                || chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok();
            if valid {
                Ok(Value::String(trimmed.to_string()))
            } else {
                Err(malformed())
            }
        }
        FieldType::Enum => match &field.enum_values {
            Some(values) if !values.is_empty() && !values.iter().any(|v| v == trimmed) => {
                Err(malformed())
            }
            _ => Ok(Value::String(trimmed.to_string())),
        },
    }
}
