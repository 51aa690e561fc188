//! query and mutation documents
//!
//! deterministic document text built from field definitions. `id` is always
//! selected and is never expected in the field list.

use crate::field::FieldDefinition;
use crate::naming::{capitalize, input_type_name, mutation_name, MutationKind};
use crate::selection::selection_block;

/// optional parts of a list query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// type of the `$filter` variable, e.g. `OrderFilter`
    pub filter_type_name: Option<String>,
    /// extra variable declaration appended verbatim, e.g. `$first: Int`
    pub extra_variables: Option<String>,
}

impl QueryOptions {
    pub fn with_filter_type(mut self, type_name: impl Into<String>) -> Self {
        self.filter_type_name = Some(type_name.into());
        self
    }

    pub fn with_extra_variables(mut self, declaration: impl Into<String>) -> Self {
        self.extra_variables = Some(declaration.into());
        self
    }
}

fn selection_paths(fields: &[FieldDefinition]) -> Vec<&str> {
    std::iter::once("id")
        .chain(fields.iter().map(|f| f.graphql_path.as_str()))
        .collect()
}

/// `query Orders($filter: OrderFilter) { orders(filter: $filter) { id ... } }`
pub fn build_query(query_name: &str, fields: &[FieldDefinition], options: &QueryOptions) -> String {
    let mut declarations = Vec::new();
    if let Some(filter) = &options.filter_type_name {
        declarations.push(format!("$filter: {filter}"));
    }
    if let Some(extra) = &options.extra_variables {
        declarations.push(extra.clone());
    }

    let header = if declarations.is_empty() {
        format!("query {}", capitalize(query_name))
    } else {
        format!("query {}({})", capitalize(query_name), declarations.join(", "))
    };
    let arguments = if options.filter_type_name.is_some() {
        "(filter: $filter)"
    } else {
        ""
    };

    format!(
        "{header} {{ {query_name}{arguments} {} }}",
        selection_block(&selection_paths(fields))
    )
}

/// update mutation taking `$id: ID!` and `$input: UpdateOrderInput!`
///
/// ```text
/// mutation UpdateOrder($id: ID!, $input: UpdateOrderInput!) {
///   updateOrder(id: $id, input: $input) { id ... }
/// }
/// ```
///
/// `input_type` overrides the conventional input type name.
pub fn build_update_mutation(
    type_name: &str,
    return_fields: &[FieldDefinition],
    input_type: Option<&str>,
) -> String {
    let name = mutation_name(type_name, MutationKind::Update);
    let input = input_type
        .map(str::to_string)
        .unwrap_or_else(|| input_type_name(type_name, MutationKind::Update));
    format!(
        "mutation {}($id: ID!, $input: {input}!) {{ {name}(id: $id, input: $input) {} }}",
        capitalize(&name),
        selection_block(&selection_paths(return_fields))
    )
}

/// like [`build_update_mutation`] without any `id` argument
pub fn build_create_mutation(
    type_name: &str,
    return_fields: &[FieldDefinition],
    input_type: Option<&str>,
) -> String {
    let name = mutation_name(type_name, MutationKind::Create);
    let input = input_type
        .map(str::to_string)
        .unwrap_or_else(|| input_type_name(type_name, MutationKind::Create));
    format!(
        "mutation {}($input: {input}!) {{ {name}(input: $input) {} }}",
        capitalize(&name),
        selection_block(&selection_paths(return_fields))
    )
}

/// `mutation DeleteOrder($id: ID!) { deleteOrder(id: $id) { id } }`
pub fn build_delete_mutation(type_name: &str, return_fields: &[FieldDefinition]) -> String {
    let name = mutation_name(type_name, MutationKind::Delete);
    format!(
        "mutation {}($id: ID!) {{ {name}(id: $id) {} }}",
        capitalize(&name),
        selection_block(&selection_paths(return_fields))
    )
}
