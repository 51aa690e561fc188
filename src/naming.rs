//! naming conventions
//!
//! derived operation and input type names. these are conventions only:
//! nothing here checks that the schema actually defines the name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// mutation operation kinds, ordered update, create, delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Update,
    Create,
    Delete,
}

impl MutationKind {
    pub const ALL: [MutationKind; 3] = [
        MutationKind::Update,
        MutationKind::Create,
        MutationKind::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Update => "update",
            MutationKind::Create => "create",
            MutationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `("Order", update)` -> `updateOrder`
pub fn mutation_name(type_name: &str, kind: MutationKind) -> String {
    format!("{}{}", kind.as_str(), type_name)
}

/// `("Order", update)` -> `UpdateOrderInput`
pub fn input_type_name(type_name: &str, kind: MutationKind) -> String {
    format!("{}{}Input", capitalize(kind.as_str()), type_name)
}

/// `Order` -> `orders`
pub fn default_query_name(type_name: &str) -> String {
    format!("{}s", type_name.to_lowercase())
}

pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
