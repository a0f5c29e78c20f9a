//! Decides where each declared parameter lives in the HTTP request.
//!
//! Rules, first match wins:
//!
//! 1. framework-injected parameters (request, logger, injected services and
//!    the trigger parameter) are left out;
//! 2. a parameter named by a `{placeholder}` in the route is a path parameter;
//! 3. a query-bound scalar, enum or array of those is a query parameter;
//! 4. a query-bound structured type is flattened into one query parameter per
//!    leaf property, named with the dot-joined property path; leaves that
//!    cannot be sent in a query string (arrays of objects) are skipped;
//! 5. anything else is the request body.

use crate::model::{ParameterDeclaration, PropertyDeclaration, TypeReference};
use crate::schema_generator::{Schema, SchemaGenerator};
use log::{debug, warn};
use serde::Serialize;

/// Name of the tenant header every operation requires.
pub const TOUCHPOINT_HEADER: &str = "TouchpointId";

/// The location of a parameter in a Swagger 2.0 operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
}

/// Swagger 2.0 parameter object.
///
/// Non-body parameters carry their type fragment inline (`type`, `format`,
/// `items`, `enum`); body parameters carry it under `schema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSchema {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub type_schema: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl ParameterSchema {
    fn inline(name: String, location: ParameterLocation, required: bool, type_schema: Schema) -> Self {
        Self {
            name,
            location,
            required,
            description: None,
            type_schema: Some(type_schema),
            schema: None,
        }
    }
}

pub struct ParameterClassifier;

impl ParameterClassifier {
    /// All parameters of one operation: the tenant header first, then every
    /// declared parameter in order.
    pub fn operation_parameters(
        parameters: &[ParameterDeclaration],
        route: &str,
        schema_gen: &mut SchemaGenerator,
    ) -> Vec<ParameterSchema> {
        let mut signature = vec![Self::touchpoint_header()];
        for parameter in parameters {
            signature.extend(Self::classify(parameter, route, schema_gen));
        }
        signature
    }

    /// The header parameter prepended to every operation.
    pub fn touchpoint_header() -> ParameterSchema {
        ParameterSchema::inline(
            TOUCHPOINT_HEADER.to_string(),
            ParameterLocation::Header,
            true,
            Schema::string(),
        )
    }

    /// Classify one declared parameter; yields zero or more entries.
    pub fn classify(
        parameter: &ParameterDeclaration,
        route: &str,
        schema_gen: &mut SchemaGenerator,
    ) -> Vec<ParameterSchema> {
        if parameter.is_framework_injected {
            debug!("Skipping framework-injected parameter: {}", parameter.name);
            return Vec::new();
        }

        let declared = &parameter.declared_type;

        if route_placeholders(route).contains(&parameter.name.as_str()) {
            debug!("{} is a path parameter", parameter.name);
            return vec![ParameterSchema::inline(
                parameter.name.clone(),
                ParameterLocation::Path,
                true,
                SchemaGenerator::inline_schema(declared),
            )];
        }

        if parameter.is_query_bound() {
            if let Some(properties) = structured_properties(declared) {
                debug!("Flattening query parameter: {}", parameter.name);
                let mut flattened = Vec::new();
                flatten_properties(properties, "", schema_gen, &mut flattened);
                return flattened;
            }
            if is_query_value(declared) {
                return vec![ParameterSchema::inline(
                    parameter.name.clone(),
                    ParameterLocation::Query,
                    parameter.is_required,
                    schema_gen.generate_schema(declared),
                )];
            }
            debug!(
                "{} cannot be sent in the query string, documenting it as the body",
                parameter.name
            );
        }

        debug!("{} is the request body", parameter.name);
        vec![ParameterSchema {
            name: parameter.name.clone(),
            location: ParameterLocation::Body,
            required: true,
            description: None,
            type_schema: None,
            schema: Some(schema_gen.generate_schema(declared)),
        }]
    }
}

fn structured_properties(type_ref: &TypeReference) -> Option<&[PropertyDeclaration]> {
    match type_ref {
        TypeReference::Object(object) => Some(&object.properties),
        TypeReference::Generic(generic) if type_ref.is_structured() => Some(&generic.properties),
        _ => None,
    }
}

/// Scalars, enums, and arrays of those; the types a query parameter can carry.
fn is_query_value(type_ref: &TypeReference) -> bool {
    match type_ref {
        TypeReference::Primitive(_) | TypeReference::Enum(_) => true,
        TypeReference::Array(element) => is_query_value(element),
        TypeReference::Generic(generic) => generic.argument.is_primitive_shaped(),
        _ => false,
    }
}

fn flatten_properties(
    properties: &[PropertyDeclaration],
    prefix: &str,
    schema_gen: &mut SchemaGenerator,
    flattened: &mut Vec<ParameterSchema>,
) {
    for property in properties {
        let name = if prefix.is_empty() {
            property.name.clone()
        } else {
            format!("{}.{}", prefix, property.name)
        };

        match structured_properties(&property.declared_type) {
            Some(nested) => flatten_properties(nested, &name, schema_gen, flattened),
            None if !is_query_value(&property.declared_type) => {
                warn!(
                    "Skipping query property {}: {} cannot be sent in the query string",
                    name,
                    property.declared_type.type_name()
                );
            }
            None => {
                let mut query = ParameterSchema::inline(
                    name,
                    ParameterLocation::Query,
                    property.is_required,
                    schema_gen.generate_schema(&property.declared_type),
                );
                query.description = Some(property.description_or_default());
                flattened.push(query);
            }
        }
    }
}

/// Placeholder names in a route template.
///
/// Handles constrained (`{id:int}`), optional (`{id?}`), defaulted
/// (`{page=1}`) and catch-all (`{*rest}`) placeholders.
pub fn route_placeholders(route: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = route;

    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let inner = after[..end].trim_start_matches('*');
        let name = inner.split([':', '=', '?']).next().unwrap_or("").trim();
        if !name.is_empty() {
            names.push(name);
        }
        rest = &after[end + 1..];
    }

    names
}
