//! field definitions
//!
//! the serializable unit shared by the registry, the document builders, and
//! the row helpers.

use crate::naming::capitalize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// simplified value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Date,
    Boolean,
    Enum,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Enum => "enum",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// one flat field of a type, addressed by its dotted graphql path
///
/// `key` and `label` are derived from the path on creation but stored
/// independently: overriding either never touches `graphql_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// flat row property name, camelCase
    pub key: String,
    /// display label
    pub label: String,
    /// dot-separated path into the nested response
    pub graphql_path: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// allowed values, only for enum fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl FieldDefinition {
    /// create a non-enum field, deriving key and label from the path
    pub fn new(graphql_path: impl Into<String>, field_type: FieldType) -> Self {
        let graphql_path = graphql_path.into();
        let leaf = graphql_path.rsplit('.').next().unwrap_or_default();
        Self {
            key: key_from_path(&graphql_path),
            label: label_from_name(leaf),
            graphql_path,
            field_type,
            enum_values: (field_type == FieldType::Enum).then(Vec::new),
        }
    }

    /// create an enum field with its allowed values
    pub fn enumeration(graphql_path: impl Into<String>, values: Vec<String>) -> Self {
        let mut field = Self::new(graphql_path, FieldType::Enum);
        field.enum_values = Some(values);
        field
    }

    /// override the flat key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// override the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// path segments of the graphql path
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.graphql_path.split('.')
    }
}

/// `shippingAddress.city` -> `shippingAddressCity`
pub fn key_from_path(path: &str) -> String {
    let mut segments = path.split('.');
    let mut key = segments.next().unwrap_or_default().to_string();
    for segment in segments {
        key.push_str(&capitalize(segment));
    }
    key
}

/// `shippingAddress` -> `Shipping Address`
pub fn label_from_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_uppercase() && prev_lower {
            out.push(' ');
        }
        out.push(ch);
        prev_lower = ch.is_lowercase();
    }
    capitalize(&out)
}
