//! error types
//!
//! structured errors for config, transport, schema lookup, and value coercion.

use crate::field::FieldType;
use crate::graphql::GraphQlError;
use std::fmt;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for the client, gateway, and row helpers
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema parse error: {0}")]
    SchemaParse(String),

    #[error("transport error: {message}")]
    Transport {
        /// http status if available
        status: Option<u16>,
        /// graphql error list
        errors: Vec<GraphQlError>,
        /// raw response body
        body: String,
        /// joined error messages or the http status
        message: String,
    },

    #[error("type not found in schema: {type_name}")]
    SchemaLookup { type_name: String },

    #[error("input type not found in schema: {type_name}")]
    InputTypeNotFound { type_name: String },

    #[error("mutation discovery failed for {type_name}: {source}")]
    MutationDiscovery {
        type_name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("malformed input for {key}: {value:?} is not a valid {expected}")]
    MalformedInput {
        key: String,
        value: String,
        expected: FieldType,
    },
}

impl Error {
    /// true if the error looks like an auth failure
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Transport { status, .. } => matches!(status, Some(401 | 403)),
            Error::Http(err) => err.status() == Some(reqwest::StatusCode::UNAUTHORIZED),
            _ => false,
        }
    }

    /// true if a requested type does not exist in the schema
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::SchemaLookup { .. } | Error::InputTypeNotFound { .. }
        )
    }

    pub(crate) fn transport(status: Option<u16>, errors: Vec<GraphQlError>, body: String) -> Self {
        let message = if errors.is_empty() {
            match status {
                Some(status) => format!("http status {status}"),
                None => "empty response".to_string(),
            }
        } else {
            errors
                .iter()
                .map(|err| err.message.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        };
        Error::Transport {
            status,
            errors,
            body,
            message,
        }
    }
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
