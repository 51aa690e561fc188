//! graphql wire types
//!
//! the response envelope returned by a graphql endpoint.

use serde::{Deserialize, Serialize};

/// graphql response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    /// response data or null if errors
    pub data: Option<T>,
    /// graphql errors array
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// true if the response contains graphql errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl GraphQlResponse<serde_json::Value> {
    /// top-level `data` payload, null when the server sent none
    pub fn into_data(self) -> serde_json::Value {
        self.data.unwrap_or(serde_json::Value::Null)
    }
}

/// graphql error entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<GraphQlLocation>,
    /// response path
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

/// graphql error location (1-based)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlLocation {
    pub line: i64,
    pub column: i64,
}
