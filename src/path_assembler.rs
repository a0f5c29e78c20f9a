use crate::error::{Error, Result};
use crate::model::{EndpointCandidate, HttpMethod, HttpTrigger};
use crate::operation_builder::{Operation, OperationBuilder};
use crate::schema_generator::SchemaGenerator;
use indexmap::IndexMap;
use log::{debug, info, warn};

/// Operations under one route, keyed by verb
pub type PathItem = IndexMap<HttpMethod, Operation>;

/// Route prefix every path is mounted under.
pub const ROUTE_PREFIX: &str = "/api/";

/// Path assembler - groups candidate operations by route
pub struct PathAssembler<'a> {
    api_title: &'a str,
    definition_name: &'a str,
}

impl<'a> PathAssembler<'a> {
    /// `definition_name` names the candidate serving this document; it is
    /// left out of the paths.
    pub fn new(api_title: &'a str, definition_name: &'a str) -> Self {
        Self {
            api_title,
            definition_name,
        }
    }

    /// Build the `paths` object.
    ///
    /// Operations are collected first, then grouped by route; a verb declared
    /// twice under the same route fails the whole build.
    pub fn assemble(
        &self,
        candidates: &[EndpointCandidate],
        schema_gen: &mut SchemaGenerator,
    ) -> Result<IndexMap<String, PathItem>> {
        let mut operations = Vec::new();

        for candidate in candidates {
            let Some(trigger) = self.discoverable_trigger(candidate) else {
                continue;
            };

            let route = route_key(candidate, trigger);
            for verb in trigger.methods() {
                let operation = OperationBuilder::build(candidate, &route, self.api_title, schema_gen);
                operations.push((route.clone(), verb, operation));
            }
        }

        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        for (route, verb, operation) in operations {
            let path = paths.entry(route.clone()).or_default();
            if path.contains_key(&verb) {
                return Err(Error::DuplicateOperation { route, verb });
            }
            path.insert(verb, operation);
        }

        info!("Assembled {} path(s)", paths.len());
        Ok(paths)
    }

    fn discoverable_trigger<'c>(&self, candidate: &'c EndpointCandidate) -> Option<&'c HttpTrigger> {
        if candidate.disabled {
            debug!("Skipping disabled function: {}", candidate.name);
            return None;
        }
        if candidate.name == self.definition_name {
            debug!("Skipping the definition function itself: {}", candidate.name);
            return None;
        }

        let mut triggers = candidate.triggers();
        match (triggers.next(), triggers.next()) {
            (Some(trigger), None) => Some(trigger),
            (None, _) => {
                debug!("Skipping {}: no HTTP trigger", candidate.name);
                None
            }
            (Some(_), Some(_)) => {
                warn!("Skipping {}: more than one HTTP trigger", candidate.name);
                None
            }
        }
    }
}

fn route_key(candidate: &EndpointCandidate, trigger: &HttpTrigger) -> String {
    let route = trigger.route().unwrap_or(&candidate.name);
    format!("{}{}", ROUTE_PREFIX, route.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectType, ParameterDeclaration, PropertyDeclaration, TypeReference};

    fn endpoint(name: &str, trigger: HttpTrigger) -> EndpointCandidate {
        EndpointCandidate::new(name).with_parameter(ParameterDeclaration::trigger("req", trigger))
    }

    fn assemble(candidates: &[EndpointCandidate]) -> Result<IndexMap<String, PathItem>> {
        let mut schema_gen = SchemaGenerator::new();
        PathAssembler::new("Widget API", "ApiDefinition").assemble(candidates, &mut schema_gen)
    }

    #[test]
    fn test_declared_verbs() {
        let candidates = vec![endpoint(
            "Widgets",
            HttpTrigger::new()
                .with_route("widgets")
                .with_methods([HttpMethod::Get, HttpMethod::Post]),
        )];

        let paths = assemble(&candidates).unwrap();

        assert_eq!(paths.len(), 1);
        let verbs: Vec<HttpMethod> = paths["/api/widgets"].keys().copied().collect();
        assert_eq!(verbs, vec![HttpMethod::Get, HttpMethod::Post]);
    }

    #[test]
    fn test_missing_verbs_default_to_all() {
        let candidates = vec![endpoint("Widgets", HttpTrigger::new().with_route("widgets"))];
        let paths = assemble(&candidates).unwrap();

        let verbs: Vec<HttpMethod> = paths["/api/widgets"].keys().copied().collect();
        assert_eq!(verbs, HttpMethod::ALL.to_vec());
    }

    #[test]
    fn test_route_falls_back_to_name() {
        let candidates = vec![endpoint(
            "ListWidgets",
            HttpTrigger::new().with_methods([HttpMethod::Get]),
        )];
        let paths = assemble(&candidates).unwrap();
        assert!(paths.contains_key("/api/ListWidgets"));
    }

    #[test]
    fn test_leading_slash_is_not_doubled() {
        let candidates = vec![endpoint(
            "Widgets",
            HttpTrigger::new()
                .with_route("/widgets")
                .with_methods([HttpMethod::Get]),
        )];
        let paths = assemble(&candidates).unwrap();
        assert!(paths.contains_key("/api/widgets"));
    }

    #[test]
    fn test_same_route_different_verbs_are_merged() {
        let candidates = vec![
            endpoint(
                "GetWidget",
                HttpTrigger::new()
                    .with_route("widgets")
                    .with_methods([HttpMethod::Get]),
            ),
            endpoint(
                "CreateWidget",
                HttpTrigger::new()
                    .with_route("widgets")
                    .with_methods([HttpMethod::Post]),
            ),
        ];

        let paths = assemble(&candidates).unwrap();

        assert_eq!(paths.len(), 1);
        let path = &paths["/api/widgets"];
        assert_eq!(path[&HttpMethod::Get].operation_id, "Getwidget");
        assert_eq!(path[&HttpMethod::Post].operation_id, "Createwidget");
    }

    #[test]
    fn test_duplicate_verb_is_an_error() {
        let trigger = HttpTrigger::new()
            .with_route("widgets")
            .with_methods([HttpMethod::Get]);
        let candidates = vec![endpoint("First", trigger.clone()), endpoint("Second", trigger)];

        match assemble(&candidates) {
            Err(Error::DuplicateOperation { route, verb }) => {
                assert_eq!(route, "/api/widgets");
                assert_eq!(verb, HttpMethod::Get);
            }
            other => panic!("Expected duplicate operation error, got {:?}", other),
        }
    }

    #[test]
    fn test_verb_repeated_in_one_trigger_is_an_error() {
        let candidates = vec![endpoint(
            "Widgets",
            HttpTrigger::new()
                .with_route("widgets")
                .with_methods([HttpMethod::Get, HttpMethod::Post, HttpMethod::Get]),
        )];

        match assemble(&candidates) {
            Err(Error::DuplicateOperation { route, verb }) => {
                assert_eq!(route, "/api/widgets");
                assert_eq!(verb, HttpMethod::Get);
            }
            other => panic!("Expected duplicate operation error, got {:?}", other),
        }
    }

    #[test]
    fn test_skipped_candidates() {
        let candidates = vec![
            endpoint("Disabled", HttpTrigger::new()).disabled(),
            endpoint("ApiDefinition", HttpTrigger::new()),
            EndpointCandidate::new("NoTrigger"),
            EndpointCandidate::new("TwoTriggers")
                .with_parameter(ParameterDeclaration::trigger("a", HttpTrigger::new()))
                .with_parameter(ParameterDeclaration::trigger("b", HttpTrigger::new())),
        ];

        let paths = assemble(&candidates).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_each_operation_has_touchpoint_header() {
        let candidates = vec![endpoint(
            "Widgets",
            HttpTrigger::new().with_methods([HttpMethod::Get, HttpMethod::Put]),
        )];
        let paths = assemble(&candidates).unwrap();

        for operation in paths["/api/Widgets"].values() {
            assert_eq!(operation.parameters[0].name, "TouchpointId");
        }
    }

    #[test]
    fn test_shared_type_registered_once() {
        let widget = TypeReference::Object(
            ObjectType::new("Widget")
                .with_property(PropertyDeclaration::new("Id", TypeReference::string())),
        );
        let candidates = vec![
            endpoint(
                "CreateWidget",
                HttpTrigger::new()
                    .with_route("widgets")
                    .with_methods([HttpMethod::Post]),
            )
            .with_parameter(ParameterDeclaration::new("widget", widget.clone())),
            endpoint(
                "UpdateWidget",
                HttpTrigger::new()
                    .with_route("widgets/{id}")
                    .with_methods([HttpMethod::Put]),
            )
            .with_parameter(ParameterDeclaration::new("id", TypeReference::string()))
            .with_parameter(ParameterDeclaration::new("widget", widget)),
        ];

        let mut schema_gen = SchemaGenerator::new();
        PathAssembler::new("Widget API", "ApiDefinition")
            .assemble(&candidates, &mut schema_gen)
            .unwrap();

        assert_eq!(schema_gen.definitions().len(), 1);
    }
}
