//! resolved types
//!
//! everything the document builders and row helpers need about one type.

use crate::field::FieldDefinition;
use crate::naming::MutationKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// query fields, discovered mutations, and input fields of a type
///
/// `editable_fields` is the subset of `fields` whose key also appears in
/// `input_fields`, in `fields` order. it is computed on construction,
/// including deserialization. a serialized `editableFields` list is applied
/// as an override, the same as [`ResolvedType::with_editable_fields`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ResolvedTypeData")]
pub struct ResolvedType {
    type_name: String,
    fields: Vec<FieldDefinition>,
    mutations: BTreeMap<MutationKind, String>,
    input_fields: Vec<FieldDefinition>,
    editable_fields: Vec<FieldDefinition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedTypeData {
    type_name: String,
    #[serde(default)]
    fields: Vec<FieldDefinition>,
    #[serde(default)]
    mutations: BTreeMap<MutationKind, String>,
    #[serde(default)]
    input_fields: Vec<FieldDefinition>,
    editable_fields: Option<Vec<FieldDefinition>>,
}

impl From<ResolvedTypeData> for ResolvedType {
    fn from(data: ResolvedTypeData) -> Self {
        let resolved = Self::new(data.type_name, data.fields, data.mutations, data.input_fields);
        match data.editable_fields {
            Some(editable) => resolved.with_editable_fields(editable),
            None => resolved,
        }
    }
}

impl ResolvedType {
    pub fn new(
        type_name: impl Into<String>,
        fields: Vec<FieldDefinition>,
        mutations: BTreeMap<MutationKind, String>,
        input_fields: Vec<FieldDefinition>,
    ) -> Self {
        let editable_fields = editable_fields(&fields, &input_fields);
        Self {
            type_name: type_name.into(),
            fields,
            mutations,
            input_fields,
            editable_fields,
        }
    }

    /// replace the computed editable subset
    pub fn with_editable_fields(mut self, editable_fields: Vec<FieldDefinition>) -> Self {
        self.editable_fields = editable_fields;
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn mutations(&self) -> &BTreeMap<MutationKind, String> {
        &self.mutations
    }

    /// schema name of a discovered mutation
    pub fn mutation(&self, kind: MutationKind) -> Option<&str> {
        self.mutations.get(&kind).map(String::as_str)
    }

    pub fn input_fields(&self) -> &[FieldDefinition] {
        &self.input_fields
    }

    pub fn editable_fields(&self) -> &[FieldDefinition] {
        &self.editable_fields
    }
}

/// fields whose key is also an input field key, order kept from `fields`
pub fn editable_fields(
    fields: &[FieldDefinition],
    input_fields: &[FieldDefinition],
) -> Vec<FieldDefinition> {
    let input_keys: HashSet<&str> = input_fields.iter().map(|f| f.key.as_str()).collect();
    fields
        .iter()
        .filter(|field| input_keys.contains(field.key.as_str()))
        .cloned()
        .collect()
}
