//! Functions Swagger - Swagger 2.0 documents for HTTP-triggered functions.
//!
//! This library turns a pool of endpoint candidates (functions with an HTTP
//! trigger, their parameters, return types and response annotations) into a
//! single Swagger 2.0 document. Candidates can be declared directly with the
//! [`model`] builders, or discovered from annotated Rust source.
//!
//! # Architecture
//!
//! Document generation:
//!
//! 1. [`model`] - Endpoint candidates and the declared types they carry
//! 2. [`schema_generator`] - Converts declared types to schemas and registers shared definitions
//! 3. [`parameter_classifier`] - Places each parameter in the path, query, header or body
//! 4. [`response_resolver`] - Builds the responses map of an operation
//! 5. [`operation_builder`] - Renders one operation
//! 6. [`path_assembler`] - Groups operations into the `paths` object
//! 7. [`document_builder`] - Validates the settings and assembles the document
//! 8. [`serializer`] - Serializes the document to JSON or YAML
//!
//! Source discovery:
//!
//! 1. [`source`] - Scans a project directory and parses its Rust files
//! 2. [`attributes`] - Reads the endpoint annotations
//! 3. [`type_resolver`] - Resolves Rust types to declared types
//! 4. [`extractor`] - Builds endpoint candidates from annotated functions
//!
//! # Example Usage
//!
//! ```
//! use functions_swagger::model::{
//!     EndpointCandidate, HttpMethod, HttpTrigger, ParameterDeclaration, RequestContext,
//!     ResponseDeclaration, TypeReference,
//! };
//! use functions_swagger::generate_swagger_document;
//!
//! let trigger = HttpTrigger::new()
//!     .with_route("widgets/{id}")
//!     .with_methods([HttpMethod::Get]);
//! let candidate = EndpointCandidate::new("GetWidget")
//!     .with_parameter(ParameterDeclaration::trigger("req", trigger))
//!     .with_parameter(ParameterDeclaration::new("id", TypeReference::string()))
//!     .with_response(ResponseDeclaration::new(200, "Found"))
//!     .returning(TypeReference::string());
//!
//! let json = generate_swagger_document(
//!     &RequestContext::new("localhost:7071"),
//!     "Widget API",
//!     "Widgets",
//!     "ApiDefinition",
//!     &[candidate],
//! )
//! .unwrap();
//! assert!(json.contains("/api/widgets/{id}"));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod attributes;
pub mod cli;
pub mod document_builder;
pub mod error;
pub mod extractor;
pub mod model;
pub mod operation_builder;
pub mod parameter_classifier;
pub mod path_assembler;
pub mod response_resolver;
pub mod schema_generator;
pub mod serializer;
pub mod source;
pub mod type_resolver;

use document_builder::DocumentAssembler;
use error::Result;
use model::{EndpointCandidate, RequestContext};

/// Generate a compact JSON Swagger 2.0 document for `candidates`.
///
/// Shorthand for a [`DocumentAssembler`] configured with the given settings.
/// Every call starts from an empty definition registry.
pub fn generate_swagger_document(
    request: &RequestContext,
    api_title: &str,
    api_description: &str,
    api_definition_name: &str,
    candidates: &[EndpointCandidate],
) -> Result<String> {
    DocumentAssembler::new()
        .with_request(request.clone())
        .with_title(api_title)
        .with_description(api_description)
        .with_definition_name(api_definition_name)
        .generate(candidates)
}
