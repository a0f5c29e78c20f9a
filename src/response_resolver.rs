use crate::model::{ResponseDeclaration, TypeReference};
use crate::schema_generator::{Schema, SchemaGenerator};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

/// Swagger 2.0 response object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseObject {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

static VOID: TypeReference = TypeReference::Void;

/// Responses of one operation, keyed by status code
pub type Responses = IndexMap<String, ResponseObject>;

/// Response resolver - turns a return type and response declarations into
/// the `responses` map of an operation
pub struct ResponseResolver;

impl ResponseResolver {
    /// Build the responses map.
    ///
    /// One level of generic wrapping is unwrapped from `return_type`; an
    /// opaque framework result is replaced by `response_type_override` when
    /// one is declared. A structured response type is registered in the
    /// definitions whatever the declarations say.
    pub fn resolve(
        return_type: &TypeReference,
        response_type_override: Option<&TypeReference>,
        declarations: &[ResponseDeclaration],
        schema_gen: &mut SchemaGenerator,
    ) -> Responses {
        let effective = Self::effective_type(return_type, response_type_override);
        debug!("Effective response type: {}", effective.type_name());

        // Registered even when every declaration hides it.
        let schema = Self::response_schema(effective, schema_gen);

        let mut responses = Responses::new();
        for declaration in declarations {
            let key = declaration.status_code.to_string();
            let response = ResponseObject {
                description: declaration.description.clone(),
                schema: if declaration.show_schema {
                    schema.clone()
                } else {
                    None
                },
            };

            if responses.insert(key.clone(), response).is_some() {
                warn!(
                    "Status {} declared more than once, keeping the last declaration",
                    key
                );
            }
        }

        responses
    }

    fn effective_type<'a>(
        return_type: &'a TypeReference,
        response_type_override: Option<&'a TypeReference>,
    ) -> &'a TypeReference {
        let unwrapped = match return_type {
            TypeReference::Generic(generic) => generic.argument.as_ref(),
            other => other,
        };

        match unwrapped {
            TypeReference::FrameworkResult => response_type_override.unwrap_or(&VOID),
            other => other,
        }
    }

    fn response_schema(effective: &TypeReference, schema_gen: &mut SchemaGenerator) -> Option<Schema> {
        match effective {
            TypeReference::Void => None,
            TypeReference::Generic(generic) if generic.argument.is_primitive_shaped() => {
                Some(SchemaGenerator::inline_object(&generic.properties))
            }
            other => Some(schema_gen.generate_schema(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GenericType, ObjectType, PropertyDeclaration};
    use serde_json::json;

    fn widget() -> TypeReference {
        TypeReference::Object(
            ObjectType::new("Widget")
                .with_property(PropertyDeclaration::new("Id", TypeReference::string()).required()),
        )
    }

    fn resolve(
        return_type: &TypeReference,
        response_type_override: Option<&TypeReference>,
        declarations: &[ResponseDeclaration],
    ) -> (Responses, SchemaGenerator) {
        let mut schema_gen = SchemaGenerator::new();
        let responses =
            ResponseResolver::resolve(return_type, response_type_override, declarations, &mut schema_gen);
        (responses, schema_gen)
    }

    #[test]
    fn test_object_response_is_referenced() {
        let (responses, schema_gen) =
            resolve(&widget(), None, &[ResponseDeclaration::new(200, "Found")]);

        assert_eq!(
            serde_json::to_value(&responses).unwrap(),
            json!({"200": {"description": "Found", "schema": {"$ref": "#/definitions/Widget"}}})
        );
        assert!(schema_gen.definitions().contains("Widget"));
    }

    #[test]
    fn test_show_schema_false_omits_schema() {
        let declarations = vec![
            ResponseDeclaration::new(200, "Found"),
            ResponseDeclaration::new(404, "Not found").without_schema(),
        ];
        let (responses, _) = resolve(&widget(), None, &declarations);

        let json = serde_json::to_value(&responses).unwrap();
        assert_eq!(json["404"], json!({"description": "Not found"}));
        assert!(json["200"].get("schema").is_some());
    }

    #[test]
    fn test_no_declarations_still_registers_return_type() {
        let (responses, schema_gen) = resolve(&widget(), None, &[]);
        assert!(responses.is_empty());
        assert!(schema_gen.definitions().contains("Widget"));
    }

    #[test]
    fn test_hidden_schemas_still_register_return_type() {
        let (responses, schema_gen) = resolve(
            &widget(),
            None,
            &[ResponseDeclaration::new(404, "Not found").without_schema()],
        );

        assert_eq!(
            serde_json::to_value(&responses).unwrap(),
            json!({"404": {"description": "Not found"}})
        );
        assert_eq!(schema_gen.definitions().names().collect::<Vec<_>>(), vec!["Widget"]);
    }

    #[test]
    fn test_void_has_no_schema() {
        let (responses, _) = resolve(
            &TypeReference::Void,
            None,
            &[ResponseDeclaration::new(204, "Deleted")],
        );
        assert_eq!(responses["204"].schema, None);
    }

    #[test]
    fn test_generic_wrapper_is_unwrapped() {
        let result = TypeReference::Generic(GenericType::new("Result", widget()));
        let (responses, _) = resolve(&result, None, &[ResponseDeclaration::new(200, "Found")]);

        assert_eq!(
            responses["200"].schema,
            Some(Schema::Reference("Widget".to_string()))
        );
    }

    #[test]
    fn test_primitive_response_is_inline() {
        let result = TypeReference::Generic(GenericType::new("Result", TypeReference::int64()));
        let (responses, schema_gen) =
            resolve(&result, None, &[ResponseDeclaration::new(200, "Count")]);

        assert_eq!(
            serde_json::to_value(&responses["200"]).unwrap(),
            json!({"description": "Count", "schema": {"type": "integer", "format": "int64"}})
        );
        assert!(schema_gen.definitions().is_empty());
    }

    #[test]
    fn test_framework_result_uses_override() {
        let (responses, _) = resolve(
            &TypeReference::FrameworkResult,
            Some(&widget()),
            &[ResponseDeclaration::new(200, "Found")],
        );
        assert_eq!(
            responses["200"].schema,
            Some(Schema::Reference("Widget".to_string()))
        );

        let (responses, _) = resolve(
            &TypeReference::FrameworkResult,
            None,
            &[ResponseDeclaration::new(200, "Done")],
        );
        assert_eq!(responses["200"].schema, None);
    }

    #[test]
    fn test_wrapper_around_primitive_is_inline_object() {
        let envelope = TypeReference::Generic(
            GenericType::new("Envelope", TypeReference::string())
                .with_property(PropertyDeclaration::new("Data", TypeReference::string()))
                .with_property(PropertyDeclaration::new("Status", TypeReference::int32())),
        );
        let wrapped = TypeReference::Generic(GenericType::new("Result", envelope));

        let (responses, schema_gen) =
            resolve(&wrapped, None, &[ResponseDeclaration::new(200, "Ok")]);

        let json = serde_json::to_value(&responses["200"]).unwrap();
        assert_eq!(json["schema"]["type"], "object");
        assert!(json["schema"]["properties"].get("Data").is_some());
        assert!(schema_gen.definitions().is_empty());
    }

    #[test]
    fn test_responses_are_independent_entries() {
        let declarations = vec![
            ResponseDeclaration::new(200, "Found"),
            ResponseDeclaration::new(201, "Created"),
        ];
        let (responses, _) = resolve(&widget(), None, &declarations);

        assert_eq!(responses["200"].description, "Found");
        assert_eq!(responses["201"].description, "Created");
    }

    #[test]
    fn test_duplicate_status_last_wins() {
        let declarations = vec![
            ResponseDeclaration::new(200, "First"),
            ResponseDeclaration::new(200, "Second").without_schema(),
        ];
        let (responses, _) = resolve(&widget(), None, &declarations);

        assert_eq!(responses.len(), 1);
        assert_eq!(responses["200"].description, "Second");
        assert_eq!(responses["200"].schema, None);
    }
}
