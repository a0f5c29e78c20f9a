use crate::error::{Error, Result};
use crate::model::{EndpointCandidate, RequestContext};
use crate::operation_builder::API_KEY_SCHEME;
use crate::path_assembler::{PathAssembler, PathItem};
use crate::schema_generator::{DefinitionRegistry, SchemaGenerator};
use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;

/// Swagger version written into every document.
pub const SWAGGER_VERSION: &str = "2.0";

/// API version used unless one is configured.
pub const DEFAULT_API_VERSION: &str = "1.0.0";

/// Swagger 2.0 info object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    pub description: String,
}

/// Swagger 2.0 security scheme object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    /// Name of the query parameter carrying the key
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
}

impl SecurityScheme {
    /// The function-key scheme: `?code=<key>`.
    pub fn api_key_query() -> Self {
        Self {
            scheme_type: "apiKey".to_string(),
            name: "code".to_string(),
            location: "query".to_string(),
        }
    }
}

/// Complete Swagger 2.0 document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwaggerDocument {
    /// Always "2.0"
    pub swagger: String,
    /// API info
    pub info: Info,
    /// Host the document was requested from
    pub host: String,
    pub base_path: String,
    pub schemes: Vec<String>,
    /// API paths, keyed by route
    pub paths: IndexMap<String, PathItem>,
    /// Shared object schemas referenced through `$ref`
    pub definitions: DefinitionRegistry,
    pub security_definitions: IndexMap<String, SecurityScheme>,
}

/// Swagger document builder
///
/// Collects the document settings, validates them, and renders a pool of
/// endpoint candidates into a [`SwaggerDocument`]. Every call to
/// [`build`](Self::build) starts from an empty definition registry, so one
/// builder can be shared across threads.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    request: Option<RequestContext>,
    title: Option<String>,
    description: Option<String>,
    definition_name: Option<String>,
    version: String,
}

impl DocumentAssembler {
    pub fn new() -> Self {
        debug!("Initializing DocumentAssembler");
        Self {
            request: None,
            title: None,
            description: None,
            definition_name: None,
            version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// The request the document is served for; its host selects the scheme.
    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Name of the function serving the document; it is excluded from the paths.
    pub fn with_definition_name(mut self, definition_name: impl Into<String>) -> Self {
        self.definition_name = Some(definition_name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Build the document.
    ///
    /// Fails with [`Error::InvalidArgument`] naming the first missing input,
    /// or with [`Error::DuplicateOperation`] when two candidates claim the
    /// same verb on one route.
    pub fn build(&self, candidates: &[EndpointCandidate]) -> Result<SwaggerDocument> {
        let request = self.request.as_ref().ok_or(Error::InvalidArgument("request"))?;
        let title = required(self.title.as_deref(), "api_title")?;
        let description = required(self.description.as_deref(), "api_description")?;
        let definition_name = required(self.definition_name.as_deref(), "api_definition_name")?;
        if candidates.is_empty() {
            return Err(Error::InvalidArgument("candidates"));
        }

        let host = request.host.clone().unwrap_or_default();
        debug!("Building document for host '{}'", host);

        let mut schema_gen = SchemaGenerator::new();
        let paths =
            PathAssembler::new(title, definition_name).assemble(candidates, &mut schema_gen)?;
        let definitions = schema_gen.into_definitions();

        info!(
            "Built document with {} path(s) and {} definition(s)",
            paths.len(),
            definitions.len()
        );

        let mut security_definitions = IndexMap::new();
        security_definitions.insert(
            API_KEY_SCHEME.to_string(),
            SecurityScheme::api_key_query(),
        );

        Ok(SwaggerDocument {
            swagger: SWAGGER_VERSION.to_string(),
            info: Info {
                title: title.to_string(),
                version: self.version.clone(),
                description: description.to_string(),
            },
            schemes: vec![scheme_for_host(&host).to_string()],
            host,
            base_path: "/".to_string(),
            paths,
            definitions,
            security_definitions,
        })
    }

    /// Build the document and serialize it as compact JSON.
    pub fn generate(&self, candidates: &[EndpointCandidate]) -> Result<String> {
        let document = self.build(candidates)?;
        Ok(serde_json::to_string(&document)?)
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::InvalidArgument(name)),
    }
}

/// `http` for local hosts, `https` for everything else.
pub fn scheme_for_host(host: &str) -> &'static str {
    if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    }
}
