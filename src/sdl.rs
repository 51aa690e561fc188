//! schema sdl as a type source
//!
//! parses schema text into introspection-shaped metadata so registries can
//! be built offline with [`crate::build_registry`].

use crate::error::{Error, Result};
use crate::introspection::{
    IntrospectionEnumValue, IntrospectionField, IntrospectionResult, IntrospectionType, TypeKind,
};
use graphql_parser::schema::{parse_schema, Definition, Document, Type, TypeDefinition};
use std::collections::BTreeMap;

const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// parse sdl and return object and input object types keyed by name
pub fn parse_types(sdl: &str) -> Result<BTreeMap<String, IntrospectionResult>> {
    let document =
        parse_schema::<String>(sdl).map_err(|err| Error::SchemaParse(err.to_string()))?;
    let index = TypeIndex::new(&document);

    let mut types = BTreeMap::new();
    for def in &document.definitions {
        let Definition::TypeDefinition(ty) = def else {
            continue;
        };
        let result = match ty {
            TypeDefinition::Object(obj) => IntrospectionResult::new(
                obj.name.clone(),
                obj.fields
                    .iter()
                    .map(|f| IntrospectionField::new(f.name.clone(), index.resolve(&f.field_type)))
                    .collect(),
            ),
            TypeDefinition::InputObject(input) => IntrospectionResult::new(
                input.name.clone(),
                input
                    .fields
                    .iter()
                    .map(|f| IntrospectionField::new(f.name.clone(), index.resolve(&f.value_type)))
                    .collect(),
            ),
            _ => continue,
        };
        types.insert(result.name.clone(), result);
    }
    Ok(types)
}

/// kind and enum values of every named type in a document
struct TypeIndex {
    kinds: BTreeMap<String, TypeKind>,
    enum_values: BTreeMap<String, Vec<IntrospectionEnumValue>>,
}

impl TypeIndex {
    fn new(document: &Document<'_, String>) -> Self {
        let mut kinds: BTreeMap<String, TypeKind> = BUILTIN_SCALARS
            .iter()
            .map(|name| (name.to_string(), TypeKind::Scalar))
            .collect();
        let mut enum_values = BTreeMap::new();

        for def in &document.definitions {
            let Definition::TypeDefinition(ty) = def else {
                continue;
            };
            let (name, kind) = match ty {
                TypeDefinition::Scalar(t) => (&t.name, TypeKind::Scalar),
                TypeDefinition::Object(t) => (&t.name, TypeKind::Object),
                TypeDefinition::Interface(t) => (&t.name, TypeKind::Interface),
                TypeDefinition::Union(t) => (&t.name, TypeKind::Union),
                TypeDefinition::InputObject(t) => (&t.name, TypeKind::InputObject),
                TypeDefinition::Enum(t) => {
                    let values = t
                        .values
                        .iter()
                        .map(|v| IntrospectionEnumValue {
                            name: v.name.clone(),
                        })
                        .collect();
                    enum_values.insert(t.name.clone(), values);
                    (&t.name, TypeKind::Enum)
                }
            };
            kinds.insert(name.clone(), kind);
        }

        Self { kinds, enum_values }
    }

    fn resolve(&self, ty: &Type<'_, String>) -> IntrospectionType {
        match ty {
            Type::NonNullType(inner) => self.resolve(inner).non_null(),
            Type::ListType(inner) => self.resolve(inner).list(),
            Type::NamedType(name) => {
                let kind = self.kinds.get(name).copied().unwrap_or(TypeKind::Other);
                IntrospectionType {
                    enum_values: self.enum_values.get(name).cloned(),
                    ..IntrospectionType::named(name.clone(), kind)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryOptions;
    use crate::field::FieldType;
    use crate::introspection::unwrap_type;
    use crate::registry::build_registry;
    use crate::resolved::editable_fields;

    const SCHEMA: &str = r#"
        scalar DateTime

        enum OrderStatus { PENDING SHIPPED }

        type Address {
            city: String
            country: String
        }

        type Order {
            id: ID!
            orderNumber: String!
            status: OrderStatus!
            placedAt: DateTime
            tags: [String!]!
            shippingAddress: Address
        }

        input AddressInput {
            city: String
        }

        input UpdateOrderInput {
            status: OrderStatus
            shippingAddress: AddressInput
        }
    "#;

    #[test]
    fn test_parse_types() {
        let types = parse_types(SCHEMA).unwrap();
        assert_eq!(
            types.keys().map(String::as_str).collect::<Vec<_>>(),
            ["Address", "AddressInput", "Order", "UpdateOrderInput"]
        );

        let order = &types["Order"];
        let status = unwrap_type(&order.fields[2].field_type);
        assert_eq!(status.kind, TypeKind::Enum);
        assert_eq!(status.enum_value_names(), ["PENDING", "SHIPPED"]);

        let tags = &order.fields[4].field_type;
        assert_eq!(tags.kind, TypeKind::NonNull);
        assert_eq!(unwrap_type(tags).name.as_deref(), Some("String"));
    }

    #[test]
    fn test_registry_from_sdl() {
        let types = parse_types(SCHEMA).unwrap();
        let options = RegistryOptions::default();
        let fields = build_registry(&types["Order"], &options, &types);

        let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            [
                "orderNumber",
                "status",
                "placedAt",
                "tags",
                "shippingAddressCity",
                "shippingAddressCountry",
            ]
        );
        assert_eq!(fields[2].field_type, FieldType::Date);

        let inputs = build_registry(&types["UpdateOrderInput"], &options, &types);
        let editable: Vec<_> = editable_fields(&fields, &inputs)
            .into_iter()
            .map(|f| f.key)
            .collect();
        assert_eq!(editable, ["status", "shippingAddressCity"]);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_types("type Broken {").unwrap_err();
        assert!(matches!(err, Error::SchemaParse(_)));
    }
}
