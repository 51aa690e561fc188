//! introspection gateway
//!
//! issues fixed introspection documents through a [`Transport`] and turns
//! the answers into typed metadata, field registries, and [`ResolvedType`]s.

use crate::config::RegistryOptions;
use crate::error::{Error, Result};
use crate::field::FieldDefinition;
use crate::introspection::{IntrospectionResult, RawIntrospectedType};
use crate::naming::{input_type_name, mutation_name, MutationKind};
use crate::registry::build_registry_async;
use crate::resolved::ResolvedType;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::sync::Arc;

/// introspects one named type; three `ofType` levels cover `[T!]!`
pub const TYPE_INTROSPECTION_QUERY: &str = r#"query IntrospectType($name: String!) {
  __type(name: $name) {
    name
    kind
    fields {
      name
      type { ...TypeRef }
    }
    inputFields {
      name
      type { ...TypeRef }
    }
  }
}

fragment TypeRef on __Type {
  name
  kind
  enumValues { name }
  ofType {
    name
    kind
    enumValues { name }
    ofType {
      name
      kind
      enumValues { name }
      ofType {
        name
        kind
        enumValues { name }
      }
    }
  }
}
"#;

/// lists the fields of the schema's mutation root
pub const MUTATION_ROOT_QUERY: &str = r#"query MutationRoot {
  __schema {
    mutationType {
      name
      fields { name }
    }
  }
}
"#;

/// executes a graphql document and returns the top-level `data` payload
///
/// implementations report http failures and graphql error lists as
/// [`Error::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, document: &str, variables: Value) -> Result<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
        (**self).execute(document, variables).await
    }
}

/// transport backed by a closure, see [`transport_fn`]
#[derive(Clone)]
pub struct FnTransport<F> {
    f: F,
}

/// adapt `Fn(document, variables) -> Future<Output = Result<Value>>` into a [`Transport`]
pub fn transport_fn<F, Fut>(f: F) -> FnTransport<F>
where
    F: Fn(String, Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    FnTransport { f }
}

#[async_trait]
impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(String, Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
        (self.f)(document.to_string(), variables).await
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeData {
    #[serde(rename = "__type")]
    ty: Option<RawIntrospectedType>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaData {
    #[serde(rename = "__schema")]
    schema: MutationSchema,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationSchema {
    mutation_type: Option<MutationRoot>,
}

#[derive(Deserialize)]
struct MutationRoot {
    #[serde(default)]
    fields: Vec<NamedField>,
}

#[derive(Deserialize)]
struct NamedField {
    name: String,
}

/// schema access over a transport
///
/// holds no state besides the transport; repeated calls re-issue requests.
/// wrap calls in a [`crate::TypeCache`] for at-most-once resolution.
#[derive(Debug, Clone)]
pub struct Gateway<T> {
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// fetch the fields (or input fields) of a named type
    pub async fn introspect(&self, type_name: &str) -> Result<IntrospectionResult> {
        tracing::debug!(%type_name, "introspecting type");
        let data = self
            .transport
            .execute(
                TYPE_INTROSPECTION_QUERY,
                serde_json::json!({ "name": type_name }),
            )
            .await?;
        // a null payload without errors means the same as a null `__type`
        let data: Option<TypeData> = serde_json::from_value(data)?;
        data.and_then(|data| data.ty)
            .map(IntrospectionResult::from)
            .ok_or_else(|| Error::SchemaLookup {
                type_name: type_name.to_string(),
            })
    }

    /// which conventional mutations exist for a type
    ///
    /// a schema without a mutation root yields an empty map.
    pub async fn discover_mutations(
        &self,
        type_name: &str,
    ) -> Result<BTreeMap<MutationKind, String>> {
        let discovery_error = |source: Error| Error::MutationDiscovery {
            type_name: type_name.to_string(),
            source: Box::new(source),
        };

        tracing::debug!(%type_name, "discovering mutations");
        let data = self
            .transport
            .execute(MUTATION_ROOT_QUERY, serde_json::json!({}))
            .await
            .map_err(discovery_error)?;
        let data: SchemaData =
            serde_json::from_value(data).map_err(|err| discovery_error(err.into()))?;

        let available: HashSet<String> = data
            .schema
            .mutation_type
            .map(|root| root.fields.into_iter().map(|f| f.name).collect())
            .unwrap_or_default();

        Ok(MutationKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let name = mutation_name(type_name, kind);
                available.contains(&name).then_some((kind, name))
            })
            .collect())
    }

    /// field registry of a type, introspecting nested types as needed
    pub async fn build_registry(
        &self,
        type_name: &str,
        options: &RegistryOptions,
    ) -> Result<Vec<FieldDefinition>> {
        let introspection = self.introspect(type_name).await?;
        build_registry_async(self, &introspection, options).await
    }

    /// field registry of the type's conventional update input type
    pub async fn build_input_registry(
        &self,
        type_name: &str,
        options: &RegistryOptions,
    ) -> Result<Vec<FieldDefinition>> {
        let input_name = input_type_name(type_name, MutationKind::Update);
        match self.build_registry(&input_name, options).await {
            Err(Error::SchemaLookup { type_name }) if type_name == input_name => {
                Err(Error::InputTypeNotFound { type_name })
            }
            other => other,
        }
    }

    /// fields, mutations, and editable fields of a type
    ///
    /// a missing input type is a normal schema shape and yields empty
    /// input and editable lists.
    pub async fn resolve_type(
        &self,
        type_name: &str,
        options: &RegistryOptions,
    ) -> Result<ResolvedType> {
        let fields = self.build_registry(type_name, options).await?;
        let mutations = self.discover_mutations(type_name).await?;
        let input_fields = match self.build_input_registry(type_name, options).await {
            Ok(fields) => fields,
            Err(Error::InputTypeNotFound { type_name: input }) => {
                tracing::debug!(%type_name, %input, "no input type, nothing editable");
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        Ok(ResolvedType::new(type_name, fields, mutations, input_fields))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// canned schema answering `__type` and `__schema` documents, counting requests
    #[derive(Default)]
    pub(crate) struct FakeSchema {
        pub(crate) types: BTreeMap<String, Value>,
        pub(crate) mutations: Option<Vec<&'static str>>,
        pub(crate) requests: Mutex<Vec<String>>,
        pub(crate) fail_schema: bool,
    }

    impl FakeSchema {
        pub(crate) fn with_type(mut self, name: &str, ty: Value) -> Self {
            self.types.insert(name.to_string(), ty);
            self
        }

        pub(crate) fn request_count(&self, name: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.as_str() == name)
                .count()
        }
    }

    #[async_trait]
    impl Transport for FakeSchema {
        async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
            if document == MUTATION_ROOT_QUERY {
                self.requests.lock().unwrap().push("__schema".to_string());
                if self.fail_schema {
                    return Err(Error::transport(Some(500), vec![], String::new()));
                }
                let root = self.mutations.as_ref().map(|names| {
                    json!({
                        "name": "Mutation",
                        "fields": names.iter().map(|n| json!({"name": n})).collect::<Vec<_>>(),
                    })
                });
                return Ok(json!({"__schema": {"mutationType": root}}));
            }
            let name = variables["name"].as_str().unwrap_or_default().to_string();
            self.requests.lock().unwrap().push(name.clone());
            Ok(json!({"__type": self.types.get(&name).cloned()}))
        }
    }

    fn scalar(name: &str) -> Value {
        json!({"name": name, "kind": "SCALAR", "ofType": null})
    }

    fn non_null(inner: Value) -> Value {
        json!({"name": null, "kind": "NON_NULL", "ofType": inner})
    }

    pub(crate) fn order_schema() -> FakeSchema {
        FakeSchema {
            mutations: Some(vec!["updateOrder", "createOrder", "archiveOrder"]),
            ..Default::default()
        }
        .with_type(
            "Order",
            json!({
                "name": "Order",
                "kind": "OBJECT",
                "fields": [
                    {"name": "id", "type": non_null(scalar("ID"))},
                    {"name": "orderNumber", "type": non_null(scalar("String"))},
                    {"name": "status", "type": {
                        "name": "OrderStatus",
                        "kind": "ENUM",
                        "enumValues": [{"name": "PENDING"}, {"name": "SHIPPED"}]
                    }},
                    {"name": "shippingAddress", "type": {"name": "Address", "kind": "OBJECT"}},
                    {"name": "billingAddress", "type": {"name": "Address", "kind": "OBJECT"}}
                ],
                "inputFields": null
            }),
        )
        .with_type(
            "Address",
            json!({
                "name": "Address",
                "kind": "OBJECT",
                "fields": [
                    {"name": "city", "type": scalar("String")},
                    {"name": "country", "type": scalar("String")}
                ]
            }),
        )
        .with_type(
            "UpdateOrderInput",
            json!({
                "name": "UpdateOrderInput",
                "kind": "INPUT_OBJECT",
                "fields": null,
                "inputFields": [
                    {"name": "status", "type": {"name": "OrderStatus", "kind": "ENUM"}},
                    {"name": "shippingAddress", "type": {"name": "AddressInput", "kind": "INPUT_OBJECT"}}
                ]
            }),
        )
        .with_type(
            "AddressInput",
            json!({
                "name": "AddressInput",
                "kind": "INPUT_OBJECT",
                "inputFields": [
                    {"name": "city", "type": scalar("String")}
                ]
            }),
        )
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_introspect_missing_type() {
        let gateway = Gateway::new(FakeSchema::default());
        let err = gateway.introspect("Ghost").await.unwrap_err();
        assert!(matches!(err, Error::SchemaLookup { ref type_name } if type_name == "Ghost"));
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_introspect_null_payload_names_type() {
        let gateway = Gateway::new(transport_fn(|_document: String, _variables: Value| async {
            Ok::<_, Error>(Value::Null)
        }));
        let err = gateway.introspect("Order").await.unwrap_err();
        assert!(matches!(err, Error::SchemaLookup { ref type_name } if type_name == "Order"));
        assert!(err.to_string().contains("Order"));
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_build_registry_fetches_nested_type_once() {
        let gateway = Gateway::new(order_schema());
        let fields = gateway
            .build_registry("Order", &RegistryOptions::default())
            .await
            .unwrap();

        let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            [
                "orderNumber",
                "status",
                "shippingAddressCity",
                "shippingAddressCountry",
                "billingAddressCity",
                "billingAddressCountry",
            ]
        );
        assert_eq!(fields[5].graphql_path, "billingAddress.country");
        assert_eq!(gateway.transport().request_count("Address"), 1);
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_build_registry_depth_zero_skips_nested() {
        let gateway = Gateway::new(order_schema());
        let options = RegistryOptions::default().with_max_depth(0);
        let fields = gateway.build_registry("Order", &options).await.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(gateway.transport().request_count("Address"), 0);
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_discover_mutations() {
        let gateway = Gateway::new(order_schema());
        let mutations = gateway.discover_mutations("Order").await.unwrap();
        assert_eq!(
            mutations.into_iter().collect::<Vec<_>>(),
            [
                (MutationKind::Update, "updateOrder".to_string()),
                (MutationKind::Create, "createOrder".to_string()),
            ]
        );
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_discover_mutations_without_root() {
        let gateway = Gateway::new(FakeSchema::default());
        let mutations = gateway.discover_mutations("Order").await.unwrap();
        assert!(mutations.is_empty());
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_discover_mutations_failure_is_surfaced() {
        let gateway = Gateway::new(FakeSchema {
            fail_schema: true,
            ..order_schema()
        });
        let err = gateway.discover_mutations("Order").await.unwrap_err();
        assert!(matches!(err, Error::MutationDiscovery { .. }));

        let err = gateway
            .resolve_type("Order", &RegistryOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MutationDiscovery { .. }));
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_input_registry_missing() {
        let gateway = Gateway::new(FakeSchema::default().with_type(
            "Order",
            json!({"name": "Order", "fields": []}),
        ));
        let err = gateway
            .build_input_registry("Order", &RegistryOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InputTypeNotFound { ref type_name } if type_name == "UpdateOrderInput"
        ));
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_resolve_type() {
        let gateway = Gateway::new(order_schema());
        let resolved = gateway
            .resolve_type("Order", &RegistryOptions::default())
            .await
            .unwrap();

        assert_eq!(resolved.type_name(), "Order");
        assert_eq!(resolved.fields().len(), 6);
        assert_eq!(resolved.mutation(MutationKind::Update), Some("updateOrder"));
        assert_eq!(resolved.mutation(MutationKind::Delete), None);

        let input_keys: Vec<_> = resolved.input_fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(input_keys, ["status", "shippingAddressCity"]);
        let editable: Vec<_> = resolved
            .editable_fields()
            .iter()
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(editable, ["status", "shippingAddressCity"]);
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_resolve_type_without_input_type() {
        let mut schema = order_schema();
        schema.types.remove("UpdateOrderInput");
        let gateway = Gateway::new(schema);
        let resolved = gateway
            .resolve_type("Order", &RegistryOptions::default())
            .await
            .unwrap();
        assert_eq!(resolved.fields().len(), 6);
        assert!(resolved.input_fields().is_empty());
        assert!(resolved.editable_fields().is_empty());
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_transport_fn_and_arc() {
        let transport = transport_fn(|document: String, variables: Value| async move {
            assert!(document.contains("__type(name: $name)"));
            Ok::<_, Error>(json!({"__type": {"name": variables["name"], "fields": []}}))
        });
        let gateway = Gateway::new(Arc::new(transport));
        let result = gateway.introspect("Order").await.unwrap();
        assert_eq!(result, IntrospectionResult::new("Order", vec![]));
    }
}
