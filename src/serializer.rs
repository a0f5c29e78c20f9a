//! Serialization of Swagger documents to JSON or YAML, and writing them out.
//!
//! JSON is the document's wire format; YAML is offered for the command line.

use crate::document_builder::SwaggerDocument;
use crate::error::Result;
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a Swagger document to compact JSON.
pub fn serialize_json(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to JSON");
    Ok(serde_json::to_string(doc)?)
}

/// Serializes a Swagger document to JSON with indentation, for human review
/// and version control.
pub fn serialize_json_pretty(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to pretty JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Serializes a Swagger document to YAML.
///
/// # Example
///
/// ```
/// use functions_swagger::document_builder::DocumentAssembler;
/// use functions_swagger::model::{EndpointCandidate, HttpTrigger, ParameterDeclaration, RequestContext};
/// use functions_swagger::serializer::serialize_yaml;
///
/// let candidates = vec![EndpointCandidate::new("Ping")
///     .with_parameter(ParameterDeclaration::trigger("req", HttpTrigger::new()))];
/// let doc = DocumentAssembler::new()
///     .with_request(RequestContext::new("localhost"))
///     .with_title("Ping API")
///     .with_description("Health checks")
///     .with_definition_name("ApiDefinition")
///     .build(&candidates)
///     .unwrap();
///
/// let yaml = serialize_yaml(&doc).unwrap();
/// assert!(yaml.contains("swagger: '2.0'"));
/// ```
pub fn serialize_yaml(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Writes string content to a file, creating parent directories as needed
/// and overwriting any existing file.
pub fn write_to_file(content: &str, path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
