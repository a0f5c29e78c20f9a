//! Endpoint metadata consumed by the document generator.
//!
//! Every type here is plain data. Candidates can be registered by hand with
//! the builder methods, or produced from annotated Rust source by the
//! [`extractor`](crate::extractor) module.
//!
//! # Example
//!
//! ```
//! use functions_swagger::model::{
//!     EndpointCandidate, HttpMethod, HttpTrigger, ObjectType, ParameterDeclaration,
//!     PropertyDeclaration, ResponseDeclaration, TypeReference,
//! };
//!
//! let widget = ObjectType::new("Widget")
//!     .with_property(PropertyDeclaration::new("Id", TypeReference::string()).required());
//!
//! let candidate = EndpointCandidate::new("GetWidget")
//!     .with_parameter(ParameterDeclaration::trigger(
//!         "req",
//!         HttpTrigger::new()
//!             .with_route("widgets/{id}")
//!             .with_methods([HttpMethod::Get]),
//!     ))
//!     .with_parameter(ParameterDeclaration::new("id", TypeReference::string()))
//!     .returning(TypeReference::Object(widget))
//!     .with_response(ResponseDeclaration::new(200, "Widget found"));
//!
//! assert_eq!(candidate.triggers().count(), 1);
//! ```

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// HTTP methods an endpoint can be triggered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
    Head,
    Patch,
    Put,
    Options,
}

impl HttpMethod {
    /// The verbs used when a trigger does not list any.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Put,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Put => "put",
            HttpMethod::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a method token is not one of the seven standard verbs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown HTTP method: {0}")]
pub struct ParseMethodError(pub String);

impl FromStr for HttpMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "delete" => Ok(HttpMethod::Delete),
            "head" => Ok(HttpMethod::Head),
            "patch" => Ok(HttpMethod::Patch),
            "put" => Ok(HttpMethod::Put),
            "options" => Ok(HttpMethod::Options),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

/// The incoming request the document is generated for.
///
/// Only the host is used; it fills the `host` field and selects the scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub host: Option<String>,
    pub content_type: Option<String>,
}

impl RequestContext {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Scalar type tags understood by the schema mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Date,
    Int32,
    Int64,
    Float,
    Boolean,
    /// A scalar with no dedicated mapping (e.g. `f64`, `Uuid`); rendered as a string.
    Other(String),
}

impl PrimitiveType {
    pub fn type_name(&self) -> &str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Date => "Date",
            PrimitiveType::Int32 => "Int32",
            PrimitiveType::Int64 => "Int64",
            PrimitiveType::Float => "Float",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Other(name) => name,
        }
    }
}

/// A declared type, as far as the document is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeReference {
    Primitive(PrimitiveType),
    Array(Box<TypeReference>),
    Enum(EnumType),
    Object(ObjectType),
    Generic(GenericType),
    /// An opaque framework response (`HttpResponse`, `impl Responder`, ...).
    FrameworkResult,
    Void,
}

impl TypeReference {
    pub fn string() -> Self {
        TypeReference::Primitive(PrimitiveType::String)
    }

    pub fn date() -> Self {
        TypeReference::Primitive(PrimitiveType::Date)
    }

    pub fn int32() -> Self {
        TypeReference::Primitive(PrimitiveType::Int32)
    }

    pub fn int64() -> Self {
        TypeReference::Primitive(PrimitiveType::Int64)
    }

    pub fn float() -> Self {
        TypeReference::Primitive(PrimitiveType::Float)
    }

    pub fn boolean() -> Self {
        TypeReference::Primitive(PrimitiveType::Boolean)
    }

    pub fn array(element: TypeReference) -> Self {
        TypeReference::Array(Box::new(element))
    }

    /// True for scalars and arrays of scalars.
    pub fn is_primitive_shaped(&self) -> bool {
        match self {
            TypeReference::Primitive(_) => true,
            TypeReference::Array(element) => element.is_primitive_shaped(),
            _ => false,
        }
    }

    /// True for types whose properties get their own schema: objects, and
    /// generic wrappers around anything but a scalar.
    pub fn is_structured(&self) -> bool {
        match self {
            TypeReference::Object(_) => true,
            TypeReference::Generic(generic) => !generic.argument.is_primitive_shaped(),
            _ => false,
        }
    }

    /// Name used in generated descriptions ("This returns Widget").
    pub fn type_name(&self) -> String {
        match self {
            TypeReference::Primitive(primitive) => primitive.type_name().to_string(),
            TypeReference::Array(element) => format!("{}[]", element.type_name()),
            TypeReference::Enum(enum_type) => enum_type.name.clone(),
            TypeReference::Object(object) => object.name.clone(),
            TypeReference::Generic(generic) => generic.name.clone(),
            TypeReference::FrameworkResult => "FrameworkResult".to_string(),
            TypeReference::Void => "Void".to_string(),
        }
    }
}

/// An enumeration with numeric members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<EnumMember>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: EnumMember) -> Self {
        self.members.push(member);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub value: i64,
    pub name: String,
    pub description: Option<String>,
}

impl EnumMember {
    pub fn new(value: i64, name: impl Into<String>) -> Self {
        Self {
            value,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description if one is declared and not blank, the symbolic name otherwise.
    pub fn label(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description,
            _ => &self.name,
        }
    }
}

/// A named structured type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub properties: Vec<PropertyDeclaration>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PropertyDeclaration) -> Self {
        self.properties.push(property);
        self
    }
}

/// A wrapper type instantiated with one type argument, e.g. `Paged<Widget>`.
///
/// `properties` are the wrapper's own fields with the argument substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericType {
    pub name: String,
    pub argument: Box<TypeReference>,
    pub properties: Vec<PropertyDeclaration>,
}

impl GenericType {
    pub fn new(name: impl Into<String>, argument: TypeReference) -> Self {
        Self {
            name: name.into(),
            argument: Box::new(argument),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PropertyDeclaration) -> Self {
        self.properties.push(property);
        self
    }
}

/// Length bounds on a string property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLength {
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDeclaration {
    pub name: String,
    pub declared_type: TypeReference,
    pub is_required: bool,
    pub description: Option<String>,
    pub example: Option<String>,
    pub string_length: Option<StringLength>,
    pub pattern: Option<String>,
}

impl PropertyDeclaration {
    pub fn new(name: impl Into<String>, declared_type: TypeReference) -> Self {
        Self {
            name: name.into(),
            declared_type,
            is_required: false,
            description: None,
            example: None,
            string_length: None,
            pattern: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn with_string_length(mut self, min: usize, max: usize) -> Self {
        self.string_length = Some(StringLength { min, max });
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Declared description, or "This returns <type>" when none is set.
    pub fn description_or_default(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => description.to_string(),
            _ => format!("This returns {}", self.declared_type.type_name()),
        }
    }
}

/// Where a parameter was explicitly bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceHint {
    Query,
}

/// The routing-trigger marker: route template and accepted verbs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpTrigger {
    pub route: Option<String>,
    pub methods: Option<Vec<HttpMethod>>,
}

impl HttpTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        self.methods = Some(methods.into_iter().collect());
        self
    }

    /// Declared verbs in order, or all seven when none are declared.
    ///
    /// Repeats are kept; the path assembler rejects them as duplicate operations.
    pub fn methods(&self) -> Vec<HttpMethod> {
        match &self.methods {
            Some(methods) => methods.clone(),
            None => HttpMethod::ALL.to_vec(),
        }
    }

    /// Route template if one is set and not blank.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref().filter(|route| !route.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDeclaration {
    pub name: String,
    pub declared_type: TypeReference,
    pub is_required: bool,
    pub source_hint: Option<SourceHint>,
    pub is_framework_injected: bool,
    pub trigger: Option<HttpTrigger>,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, declared_type: TypeReference) -> Self {
        Self {
            name: name.into(),
            declared_type,
            is_required: false,
            source_hint: None,
            is_framework_injected: false,
            trigger: None,
        }
    }

    /// The framework request parameter carrying the routing trigger.
    pub fn trigger(name: impl Into<String>, trigger: HttpTrigger) -> Self {
        Self {
            is_framework_injected: true,
            trigger: Some(trigger),
            ..Self::new(name, TypeReference::FrameworkResult)
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn from_query(mut self) -> Self {
        self.source_hint = Some(SourceHint::Query);
        self
    }

    pub fn injected(mut self) -> Self {
        self.is_framework_injected = true;
        self
    }

    pub fn is_query_bound(&self) -> bool {
        self.source_hint == Some(SourceHint::Query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDeclaration {
    pub status_code: u16,
    pub description: String,
    pub show_schema: bool,
}

impl ResponseDeclaration {
    pub fn new(status_code: u16, description: impl Into<String>) -> Self {
        Self {
            status_code,
            description: description.into(),
            show_schema: true,
        }
    }

    pub fn without_schema(mut self) -> Self {
        self.show_schema = false;
        self
    }
}

/// One discoverable HTTP-triggered function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCandidate {
    pub name: String,
    pub disabled: bool,
    pub parameters: Vec<ParameterDeclaration>,
    pub return_type: TypeReference,
    pub response_type_override: Option<TypeReference>,
    pub responses: Vec<ResponseDeclaration>,
    pub display_name: Option<String>,
    pub display_description: Option<String>,
}

impl EndpointCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            disabled: false,
            parameters: Vec::new(),
            return_type: TypeReference::Void,
            response_type_override: None,
            responses: Vec::new(),
            display_name: None,
            display_description: None,
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterDeclaration) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returning(mut self, return_type: TypeReference) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_response_type(mut self, response_type: TypeReference) -> Self {
        self.response_type_override = Some(response_type);
        self
    }

    pub fn with_response(mut self, response: ResponseDeclaration) -> Self {
        self.responses.push(response);
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_display_description(mut self, description: impl Into<String>) -> Self {
        self.display_description = Some(description.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Routing-trigger markers declared across the parameters.
    pub fn triggers(&self) -> impl Iterator<Item = &HttpTrigger> {
        self.parameters.iter().filter_map(|p| p.trigger.as_ref())
    }
}
