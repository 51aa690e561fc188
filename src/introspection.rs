//! introspection metadata
//!
//! typed form of the `__type` introspection payload, plus the wrapper
//! unwrapping used by the registry.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// `__TypeKind`, with a catch-all for kinds this crate does not inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
    #[serde(other)]
    Other,
}

impl TypeKind {
    /// true for `NON_NULL` and `LIST`
    pub fn is_wrapper(&self) -> bool {
        matches!(self, TypeKind::NonNull | TypeKind::List)
    }
}

/// enum value entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionEnumValue {
    pub name: String,
}

/// a possibly wrapped type reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    /// null for wrapper kinds
    #[serde(default)]
    pub name: Option<String>,
    pub kind: TypeKind,
    #[serde(default)]
    pub of_type: Option<Box<IntrospectionType>>,
    #[serde(default)]
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
}

impl IntrospectionType {
    /// named, unwrapped type reference
    pub fn named(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            of_type: None,
            enum_values: None,
        }
    }

    /// named enum reference carrying its values
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enum_values: Some(
                values
                    .into_iter()
                    .map(|name| IntrospectionEnumValue { name: name.into() })
                    .collect(),
            ),
            ..Self::named(name, TypeKind::Enum)
        }
    }

    /// wrap in `NON_NULL`
    pub fn non_null(self) -> Self {
        Self::wrap(self, TypeKind::NonNull)
    }

    /// wrap in `LIST`
    pub fn list(self) -> Self {
        Self::wrap(self, TypeKind::List)
    }

    fn wrap(inner: Self, kind: TypeKind) -> Self {
        Self {
            name: None,
            kind,
            of_type: Some(Box::new(inner)),
            enum_values: None,
        }
    }

    /// enum value names, empty when absent
    pub fn enum_value_names(&self) -> Vec<String> {
        self.enum_values
            .iter()
            .flatten()
            .map(|value| value.name.clone())
            .collect()
    }
}

/// field of an introspected type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntrospectionField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: IntrospectionType,
}

impl IntrospectionField {
    pub fn new(name: impl Into<String>, field_type: IntrospectionType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// introspected type: its name and fields (or input fields)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntrospectionResult {
    pub name: String,
    pub fields: Vec<IntrospectionField>,
}

impl IntrospectionResult {
    pub fn new(name: impl Into<String>, fields: Vec<IntrospectionField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// raw `__type` payload, before `fields`/`inputFields` are merged
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawIntrospectedType {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    pub(crate) input_fields: Option<Vec<IntrospectionField>>,
}

impl From<RawIntrospectedType> for IntrospectionResult {
    fn from(raw: RawIntrospectedType) -> Self {
        Self {
            name: raw.name,
            fields: raw.fields.or(raw.input_fields).unwrap_or_default(),
        }
    }
}

/// strip `NON_NULL`/`LIST` layers as far as the metadata allows
///
/// a wrapper without `ofType` is returned as-is.
pub fn unwrap_type(ty: &IntrospectionType) -> &IntrospectionType {
    let mut current = ty;
    while current.kind.is_wrapper() {
        match current.of_type.as_deref() {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// source of nested type metadata for the synchronous registry
pub trait TypeLookup {
    fn lookup(&self, type_name: &str) -> Option<&IntrospectionResult>;
}

impl<S: BuildHasher> TypeLookup for HashMap<String, IntrospectionResult, S> {
    fn lookup(&self, type_name: &str) -> Option<&IntrospectionResult> {
        self.get(type_name)
    }
}

impl TypeLookup for BTreeMap<String, IntrospectionResult> {
    fn lookup(&self, type_name: &str) -> Option<&IntrospectionResult> {
        self.get(type_name)
    }
}

impl TypeLookup for [IntrospectionResult] {
    fn lookup(&self, type_name: &str) -> Option<&IntrospectionResult> {
        self.iter().find(|ty| ty.name == type_name)
    }
}

impl TypeLookup for Vec<IntrospectionResult> {
    fn lookup(&self, type_name: &str) -> Option<&IntrospectionResult> {
        self.as_slice().lookup(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_wrapper_chains() {
        let string = IntrospectionType::named("String", TypeKind::Scalar);
        let address = IntrospectionType::named("Address", TypeKind::Object);

        let chains = [
            string.clone(),
            string.clone().non_null(),
            string.clone().list().non_null(),
            string.clone().non_null().list().non_null(),
            address.clone().non_null().list().non_null(),
        ];
        for chain in &chains[..4] {
            assert_eq!(unwrap_type(chain), &string);
        }
        assert_eq!(unwrap_type(&chains[4]), &address);
    }

    #[test]
    fn test_unwrap_truncated_chain() {
        let truncated = IntrospectionType {
            name: None,
            kind: TypeKind::NonNull,
            of_type: None,
            enum_values: None,
        };
        let wrapped = truncated.clone().list();
        assert_eq!(unwrap_type(&wrapped), &truncated);
    }

    #[test]
    fn test_deserialize_introspection_payload() {
        let raw: RawIntrospectedType = serde_json::from_value(json!({
            "name": "Order",
            "kind": "OBJECT",
            "fields": [
                {
                    "name": "status",
                    "type": {
                        "name": null,
                        "kind": "NON_NULL",
                        "enumValues": null,
                        "ofType": {
                            "name": "OrderStatus",
                            "kind": "ENUM",
                            "enumValues": [{"name": "PENDING"}, {"name": "SHIPPED"}],
                            "ofType": null
                        }
                    }
                },
                {
                    "name": "metadata",
                    "type": {"name": "Meta", "kind": "SOMETHING_NEW"}
                }
            ],
            "inputFields": null
        }))
        .unwrap();

        let result = IntrospectionResult::from(raw);
        assert_eq!(result.name, "Order");
        let status = unwrap_type(&result.fields[0].field_type);
        assert_eq!(status.kind, TypeKind::Enum);
        assert_eq!(status.enum_value_names(), vec!["PENDING", "SHIPPED"]);
        assert_eq!(result.fields[1].field_type.kind, TypeKind::Other);
    }

    #[test]
    fn test_input_fields_used_for_input_objects() {
        let raw: RawIntrospectedType = serde_json::from_value(json!({
            "name": "UpdateOrderInput",
            "fields": null,
            "inputFields": [
                {"name": "status", "type": {"name": "String", "kind": "SCALAR"}}
            ]
        }))
        .unwrap();
        let result = IntrospectionResult::from(raw);
        assert_eq!(result.fields.len(), 1);
        assert_eq!(result.fields[0].name, "status");
    }

    #[test]
    fn test_lookup_impls() {
        let address = IntrospectionResult::new("Address", vec![]);
        let list = vec![address.clone()];
        assert_eq!(list.lookup("Address"), Some(&address));
        assert_eq!(list.lookup("Missing"), None);

        let map: HashMap<String, IntrospectionResult> =
            [("Address".to_string(), address.clone())].into_iter().collect();
        assert_eq!(map.lookup("Address"), Some(&address));
    }
}
