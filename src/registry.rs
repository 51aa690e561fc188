//! field registry derivation
//!
//! turns introspection metadata into an ordered list of
//! [`FieldDefinition`]s. nested object fields are flattened into dotted
//! paths up to the configured depth. the synchronous builder reads nested
//! metadata from a [`TypeLookup`]; the asynchronous one introspects nested
//! types through a [`Gateway`].

use crate::config::RegistryOptions;
use crate::error::{Error, Result};
use crate::field::{label_from_name, FieldDefinition, FieldType};
use crate::gateway::{Gateway, Transport};
use crate::introspection::{
    unwrap_type, IntrospectionField, IntrospectionResult, TypeKind, TypeLookup,
};
use crate::naming::capitalize;
use futures::future::{BoxFuture, FutureExt};
use std::collections::{BTreeMap, HashMap};

/// scalar name -> simplified field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarMap(BTreeMap<String, FieldType>);

impl Default for ScalarMap {
    fn default() -> Self {
        let entries = [
            ("String", FieldType::String),
            ("Int", FieldType::Number),
            ("Float", FieldType::Number),
            ("Boolean", FieldType::Boolean),
            ("DateTime", FieldType::Date),
            ("ID", FieldType::String),
        ];
        Self(
            entries
                .into_iter()
                .map(|(name, ty)| (name.to_string(), ty))
                .collect(),
        )
    }
}

impl ScalarMap {
    pub fn get(&self, scalar: &str) -> Option<FieldType> {
        self.0.get(scalar).copied()
    }

    pub fn insert(&mut self, scalar: impl Into<String>, field_type: FieldType) {
        self.0.insert(scalar.into(), field_type);
    }
}

/// key and path prefix of the object currently being walked
#[derive(Debug, Clone, Default)]
struct Prefix {
    key: String,
    path: String,
}

impl Prefix {
    fn child(&self, name: &str) -> Prefix {
        if self.path.is_empty() {
            Prefix {
                key: name.to_string(),
                path: name.to_string(),
            }
        } else {
            Prefix {
                key: format!("{}{}", self.key, capitalize(name)),
                path: format!("{}.{}", self.path, name),
            }
        }
    }
}

/// what to do with one introspected field
enum Step {
    Emit(FieldDefinition),
    Descend { type_name: String, prefix: Prefix },
    Skip(&'static str),
}

fn classify(
    field: &IntrospectionField,
    prefix: &Prefix,
    depth: usize,
    options: &RegistryOptions,
) -> Step {
    if field.name == "id" {
        return Step::Skip("implicit id");
    }

    let ty = unwrap_type(&field.field_type);
    let child = prefix.child(&field.name);
    let definition = |field_type: FieldType| FieldDefinition {
        key: child.key.clone(),
        label: label_from_name(&field.name),
        graphql_path: child.path.clone(),
        field_type,
        enum_values: None,
    };

    match ty.kind {
        TypeKind::Enum => {
            let mut def = definition(FieldType::Enum);
            def.enum_values = Some(ty.enum_value_names());
            Step::Emit(def)
        }
        TypeKind::Scalar => match ty.name.as_deref().and_then(|name| options.scalars.get(name)) {
            Some(field_type) => Step::Emit(definition(field_type)),
            None => Step::Skip("unmapped scalar"),
        },
        TypeKind::Object | TypeKind::InputObject => match (&ty.name, depth) {
            (_, 0) => Step::Skip("depth exhausted"),
            (Some(type_name), _) => Step::Descend {
                type_name: type_name.clone(),
                prefix: child,
            },
            (None, _) => Step::Skip("unnamed object"),
        },
        _ => Step::Skip("unsupported kind"),
    }
}

fn push_field(fields: &mut Vec<FieldDefinition>, field: FieldDefinition) {
    if fields.iter().any(|existing| existing.key == field.key) {
        tracing::debug!(
            key = %field.key,
            path = %field.graphql_path,
            "skipping field: duplicate key"
        );
        return;
    }
    fields.push(field);
}

/// apply label overrides as a final pass
pub fn apply_labels(
    mut fields: Vec<FieldDefinition>,
    labels: &BTreeMap<String, String>,
) -> Vec<FieldDefinition> {
    for field in &mut fields {
        if let Some(label) = labels.get(&field.key) {
            field.label = label.clone();
        }
    }
    fields
}

/// derive the field registry of a type from already-fetched metadata
///
/// nested object types are read from `nested`; objects whose metadata is
/// missing, or that sit below `max_depth`, are skipped.
pub fn build_registry<L>(
    introspection: &IntrospectionResult,
    options: &RegistryOptions,
    nested: &L,
) -> Vec<FieldDefinition>
where
    L: TypeLookup + ?Sized,
{
    let mut fields = Vec::new();
    collect(
        introspection,
        &Prefix::default(),
        options.max_depth,
        options,
        nested,
        &mut fields,
    );
    apply_labels(fields, &options.labels)
}

fn collect<L>(
    introspection: &IntrospectionResult,
    prefix: &Prefix,
    depth: usize,
    options: &RegistryOptions,
    nested: &L,
    fields: &mut Vec<FieldDefinition>,
) where
    L: TypeLookup + ?Sized,
{
    for field in &introspection.fields {
        match classify(field, prefix, depth, options) {
            Step::Emit(def) => push_field(fields, def),
            Step::Descend { type_name, prefix } => match nested.lookup(&type_name) {
                Some(inner) => collect(inner, &prefix, depth - 1, options, nested, fields),
                None => {
                    tracing::debug!(
                        path = %prefix.path,
                        %type_name,
                        "skipping field: nested type unavailable"
                    );
                }
            },
            Step::Skip(reason) => {
                tracing::debug!(
                    ty = %introspection.name,
                    field = %field.name,
                    reason,
                    "skipping field"
                );
            }
        }
    }
}

/// derive the field registry, introspecting nested object types on demand
///
/// each nested type is introspected at most once per call. a nested type the
/// schema does not know is skipped; any other gateway failure is returned.
pub async fn build_registry_async<T>(
    gateway: &Gateway<T>,
    introspection: &IntrospectionResult,
    options: &RegistryOptions,
) -> Result<Vec<FieldDefinition>>
where
    T: Transport,
{
    let mut fields = Vec::new();
    let mut seen = HashMap::new();
    collect_async(
        gateway,
        introspection,
        Prefix::default(),
        options.max_depth,
        options,
        &mut seen,
        &mut fields,
    )
    .await?;
    Ok(apply_labels(fields, &options.labels))
}

fn collect_async<'a, T>(
    gateway: &'a Gateway<T>,
    introspection: &'a IntrospectionResult,
    prefix: Prefix,
    depth: usize,
    options: &'a RegistryOptions,
    seen: &'a mut HashMap<String, Option<IntrospectionResult>>,
    fields: &'a mut Vec<FieldDefinition>,
) -> BoxFuture<'a, Result<()>>
where
    T: Transport,
{
    async move {
        for field in &introspection.fields {
            match classify(field, &prefix, depth, options) {
                Step::Emit(def) => push_field(fields, def),
                Step::Descend {
                    type_name,
                    prefix: child,
                } => {
                    if !seen.contains_key(&type_name) {
                        let fetched = match gateway.introspect(&type_name).await {
                            Ok(result) => Some(result),
                            Err(Error::SchemaLookup { .. }) => None,
                            Err(err) => return Err(err),
                        };
                        seen.insert(type_name.clone(), fetched);
                    }
                    match seen.get(&type_name).cloned().flatten() {
                        Some(inner) => {
                            collect_async(gateway, &inner, child, depth - 1, options, seen, fields)
                                .await?
                        }
                        None => {
                            tracing::debug!(
                                path = %child.path,
                                %type_name,
                                "skipping field: nested type unavailable"
                            );
                        }
                    }
                }
                Step::Skip(reason) => {
                    tracing::debug!(
                        ty = %introspection.name,
                        field = %field.name,
                        reason,
                        "skipping field"
                    );
                }
            }
        }
        Ok(())
    }
    .boxed()
}
