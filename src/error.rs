use crate::model::HttpMethod;
use thiserror::Error;

/// Result type alias for document generation
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while generating a Swagger document.
///
/// Generation never produces a partial document: any of these aborts the
/// whole build.
#[derive(Debug, Error)]
pub enum Error {
    /// A required input was missing or empty. Carries the argument name.
    #[error("invalid argument: `{0}` must be provided and not empty")]
    InvalidArgument(&'static str),

    /// Two endpoint candidates declare the same verb on the same route.
    #[error("duplicate operation: `{verb}` is declared more than once for route `{route}`")]
    DuplicateOperation { route: String, verb: HttpMethod },

    /// The finished document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML: {}", err))
    }
}
