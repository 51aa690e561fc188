//! graphql field registries, documents, and rows
//!
//! this crate turns a graphql type's introspection metadata into a flat,
//! serializable list of [`FieldDefinition`]s, then uses that list to build
//! query and mutation documents and to move data between nested responses
//! and flat rows.
//!
//! ## quick start
//!
//! ```no_run
//! use graphrow::{
//!     build_query, flatten, Client, ClientConfig, Gateway, QueryOptions, RegistryOptions,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::new("https://api.example.com/graphql"))?;
//! let gateway = Gateway::new(client.clone());
//! let order = gateway.resolve_type("Order", &RegistryOptions::default()).await?;
//!
//! let query = build_query("orders", order.fields(), &QueryOptions::default());
//! let response = client.execute_raw(&query, None).await?.into_data();
//! for item in response["orders"].as_array().into_iter().flatten() {
//!     println!("{:?}", flatten(item, order.fields()));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## offline registries
//!
//! [`sdl::parse_types`] reads schema text into the same metadata, and
//! [`build_registry`] derives fields from it without any network access.

mod cache;
mod client;
mod config;
mod error;
mod field;
mod gateway;
mod graphql;
mod introspection;
mod naming;
mod query;
mod registry;
mod resolved;
mod row;
mod selection;
pub mod sdl;

pub use cache::TypeCache;
pub use client::Client;
pub use config::{ClientConfig, RegistryOptions};
pub use error::{Error, Result};
pub use field::{key_from_path, label_from_name, FieldDefinition, FieldType};
pub use gateway::{
    transport_fn, FnTransport, Gateway, Transport, MUTATION_ROOT_QUERY, TYPE_INTROSPECTION_QUERY,
};
pub use graphql::{GraphQlError, GraphQlLocation, GraphQlResponse};
pub use introspection::{
    unwrap_type, IntrospectionEnumValue, IntrospectionField, IntrospectionResult,
    IntrospectionType, TypeKind, TypeLookup,
};
pub use naming::{default_query_name, input_type_name, mutation_name, MutationKind};
pub use query::{
    build_create_mutation, build_delete_mutation, build_query, build_update_mutation,
    QueryOptions,
};
pub use registry::{apply_labels, build_registry, build_registry_async, ScalarMap};
pub use resolved::{editable_fields, ResolvedType};
pub use row::{coerce_value, flatten, unflatten, Row};
pub use selection::build_selections;
