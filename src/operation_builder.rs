use crate::model::EndpointCandidate;
use crate::parameter_classifier::{ParameterClassifier, ParameterSchema};
use crate::response_resolver::{ResponseResolver, Responses};
use crate::schema_generator::SchemaGenerator;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

/// Media type produced and consumed by every operation.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Name of the API-key security scheme.
pub const API_KEY_SCHEME: &str = "apikeyQuery";

/// Longest summary emitted, in characters.
pub const MAX_SUMMARY_CHARS: usize = 80;

/// Swagger 2.0 operation object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
    pub parameters: Vec<ParameterSchema>,
    pub summary: String,
    pub description: String,
    pub responses: Responses,
    pub tags: Vec<String>,
    pub security: Vec<IndexMap<String, Vec<String>>>,
}

/// Operation builder - renders one operation for a candidate under a route
pub struct OperationBuilder;

impl OperationBuilder {
    pub fn build(
        candidate: &EndpointCandidate,
        route: &str,
        api_title: &str,
        schema_gen: &mut SchemaGenerator,
    ) -> Operation {
        debug!("Building operation {} for {}", candidate.name, route);

        let parameters =
            ParameterClassifier::operation_parameters(&candidate.parameters, route, schema_gen);
        let responses = ResponseResolver::resolve(
            &candidate.return_type,
            candidate.response_type_override.as_ref(),
            &candidate.responses,
            schema_gen,
        );

        let mut api_key = IndexMap::new();
        api_key.insert(API_KEY_SCHEME.to_string(), Vec::new());

        Operation {
            operation_id: to_title_case(&candidate.name),
            produces: vec![JSON_MEDIA_TYPE.to_string()],
            consumes: vec![JSON_MEDIA_TYPE.to_string()],
            parameters,
            summary: summary(candidate),
            description: description(candidate),
            responses,
            tags: vec![api_title.to_string()],
            security: vec![api_key],
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn summary(candidate: &EndpointCandidate) -> String {
    match non_blank(candidate.display_name.as_deref()) {
        Some(name) => name.chars().take(MAX_SUMMARY_CHARS).collect(),
        None => format!("Run {}", candidate.name),
    }
}

fn description(candidate: &EndpointCandidate) -> String {
    match non_blank(candidate.display_description.as_deref()) {
        Some(description) => description.to_string(),
        None => format!("This function will run {}", candidate.name),
    }
}

/// Word-wise title case: each word gets an upper-case first letter and a
/// lower-case remainder, except words already entirely in upper case.
pub fn to_title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut word = String::new();

    for ch in value.chars() {
        if ch.is_alphanumeric() || ch == '\'' {
            word.push(ch);
        } else {
            push_title_word(&mut result, &word);
            word.clear();
            result.push(ch);
        }
    }
    push_title_word(&mut result, &word);

    result
}

fn push_title_word(result: &mut String, word: &str) {
    let has_lower = word.chars().any(char::is_lowercase);
    if !has_lower {
        result.push_str(word);
        return;
    }

    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        result.extend(first.to_uppercase());
        for ch in chars {
            result.extend(ch.to_lowercase());
        }
    }
}
