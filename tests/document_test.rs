use functions_swagger::{
    document_builder::DocumentAssembler,
    error::Error,
    generate_swagger_document,
    model::{
        EndpointCandidate, EnumMember, EnumType, HttpMethod, HttpTrigger, ObjectType,
        ParameterDeclaration, PropertyDeclaration, RequestContext, ResponseDeclaration,
        TypeReference,
    },
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn endpoint(name: &str, route: &str, methods: &[HttpMethod]) -> EndpointCandidate {
    let trigger = HttpTrigger::new()
        .with_route(route)
        .with_methods(methods.iter().copied());
    EndpointCandidate::new(name).with_parameter(ParameterDeclaration::trigger("req", trigger))
}

fn widget() -> TypeReference {
    TypeReference::Object(
        ObjectType::new("Widget")
            .with_property(PropertyDeclaration::new("Id", TypeReference::string()).required())
            .with_property(PropertyDeclaration::new("Count", TypeReference::int32())),
    )
}

fn generate(host: &str, candidates: &[EndpointCandidate]) -> Value {
    let json = generate_swagger_document(
        &RequestContext::new(host),
        "Widget API",
        "Manages widgets",
        "ApiDefinition",
        candidates,
    )
    .expect("Failed to generate document");
    serde_json::from_str(&json).expect("Generated JSON should parse")
}

#[test]
fn test_document_header() {
    let document = generate(
        "localhost:7071",
        &[endpoint("Ping", "ping", &[HttpMethod::Get])],
    );

    assert_eq!(document["swagger"], json!("2.0"));
    assert_eq!(
        document["info"],
        json!({"title": "Widget API", "version": "1.0.0", "description": "Manages widgets"})
    );
    assert_eq!(document["host"], json!("localhost:7071"));
    assert_eq!(document["basePath"], json!("/"));
    assert_eq!(
        document["securityDefinitions"],
        json!({"apikeyQuery": {"type": "apiKey", "name": "code", "in": "query"}})
    );
}

#[test]
fn test_scheme_follows_host() {
    let candidates = [endpoint("Ping", "ping", &[HttpMethod::Get])];

    assert_eq!(generate("localhost", &candidates)["schemes"], json!(["http"]));
    assert_eq!(generate("127.0.0.1:7071", &candidates)["schemes"], json!(["http"]));
    assert_eq!(
        generate("widgets.azurewebsites.net", &candidates)["schemes"],
        json!(["https"])
    );
}

#[test]
fn test_missing_inputs_are_named() {
    let candidates = [endpoint("Ping", "ping", &[HttpMethod::Get])];
    let complete = DocumentAssembler::new()
        .with_request(RequestContext::new("localhost"))
        .with_title("Widget API")
        .with_description("Manages widgets")
        .with_definition_name("ApiDefinition");

    let cases = vec![
        (
            DocumentAssembler::new()
                .with_title("Widget API")
                .with_description("Manages widgets")
                .with_definition_name("ApiDefinition"),
            "request",
        ),
        (complete.clone().with_title(""), "api_title"),
        (complete.clone().with_description(""), "api_description"),
        (complete.clone().with_definition_name(""), "api_definition_name"),
    ];

    for (assembler, expected) in cases {
        match assembler.build(&candidates) {
            Err(Error::InvalidArgument(name)) => assert_eq!(name, expected),
            other => panic!("Expected invalid {}, got {:?}", expected, other),
        }
    }

    assert!(matches!(
        complete.build(&[]),
        Err(Error::InvalidArgument("candidates"))
    ));
}

#[test]
fn test_verbs_on_one_route() {
    let document = generate(
        "localhost",
        &[endpoint("SaveWidget", "widgets", &[HttpMethod::Get, HttpMethod::Post])],
    );

    let paths = document["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 1);

    let widgets = document["paths"]["/api/widgets"].as_object().unwrap();
    assert_eq!(widgets.len(), 2);
    for verb in ["get", "post"] {
        assert_eq!(
            widgets[verb]["parameters"][0],
            json!({"name": "TouchpointId", "in": "header", "required": true, "type": "string"})
        );
    }
}

#[test]
fn test_candidates_sharing_a_route_are_merged() {
    let document = generate(
        "localhost",
        &[
            endpoint("ListWidgets", "widgets", &[HttpMethod::Get]),
            endpoint("CreateWidget", "widgets", &[HttpMethod::Post]),
        ],
    );

    let widgets = &document["paths"]["/api/widgets"];
    assert_eq!(widgets["get"]["operationId"], json!("Listwidgets"));
    assert_eq!(widgets["post"]["operationId"], json!("Createwidget"));
}

#[test]
fn test_duplicate_verb_fails() {
    let candidates = [
        endpoint("ListWidgets", "widgets", &[HttpMethod::Get]),
        endpoint("SearchWidgets", "/widgets", &[HttpMethod::Get]),
    ];

    let result = DocumentAssembler::new()
        .with_request(RequestContext::new("localhost"))
        .with_title("Widget API")
        .with_description("Manages widgets")
        .with_definition_name("ApiDefinition")
        .generate(&candidates);

    match result {
        Err(Error::DuplicateOperation { route, verb }) => {
            assert_eq!(route, "/api/widgets");
            assert_eq!(verb, HttpMethod::Get);
        }
        other => panic!("Expected a duplicate operation, got {:?}", other),
    }
}

#[test]
fn test_skipped_candidates() {
    let document = generate(
        "localhost",
        &[
            endpoint("Ping", "ping", &[HttpMethod::Get]),
            endpoint("ApiDefinition", "swagger", &[HttpMethod::Get]),
            endpoint("Legacy", "legacy", &[HttpMethod::Get]).disabled(),
            EndpointCandidate::new("Tick"),
        ],
    );

    let paths: Vec<&String> = document["paths"].as_object().unwrap().keys().collect();
    assert_eq!(paths, vec!["/api/ping"]);
}

#[test]
fn test_structured_query_parameter_is_flattened() {
    let parent = TypeReference::Object(
        ObjectType::new("Parent")
            .with_property(PropertyDeclaration::new("Bar", TypeReference::string())),
    );
    let filter = TypeReference::Object(
        ObjectType::new("Filter")
            .with_property(PropertyDeclaration::new("Bar", TypeReference::int32()).required())
            .with_property(PropertyDeclaration::new("Parent", parent)),
    );
    let candidate = endpoint("Search", "search", &[HttpMethod::Get])
        .with_parameter(ParameterDeclaration::new("filter", filter).from_query());

    let document = generate("localhost", &[candidate]);
    let parameters = &document["paths"]["/api/search"]["get"]["parameters"];

    assert_eq!(
        parameters[1],
        json!({
            "name": "Bar",
            "in": "query",
            "required": true,
            "description": "This returns Int32",
            "type": "integer",
            "format": "int32",
        })
    );
    assert_eq!(parameters[2]["name"], json!("Parent.Bar"));
    assert_eq!(parameters[2]["required"], json!(false));
    assert_eq!(parameters.as_array().unwrap().len(), 3);
}

#[test]
fn test_shared_type_defined_once() {
    let document = generate(
        "localhost",
        &[
            endpoint("GetWidget", "widgets/{id}", &[HttpMethod::Get])
                .with_parameter(ParameterDeclaration::new("id", TypeReference::string()))
                .with_response(ResponseDeclaration::new(200, "Found"))
                .returning(widget()),
            endpoint("CreateWidget", "widgets", &[HttpMethod::Post])
                .with_parameter(ParameterDeclaration::new("widget", widget()))
                .with_response(ResponseDeclaration::new(201, "Created"))
                .returning(widget()),
        ],
    );

    assert_eq!(
        document["definitions"],
        json!({
            "Widget": {
                "type": "object",
                "properties": {
                    "Id": {"description": "This returns String", "type": "string"},
                    "Count": {
                        "description": "This returns Int32",
                        "type": "integer",
                        "format": "int32",
                    },
                },
                "required": ["Id"],
            },
        })
    );
    assert_eq!(
        document["paths"]["/api/widgets/{id}"]["get"]["parameters"][1],
        json!({"name": "id", "in": "path", "required": true, "type": "string"})
    );
}

#[test]
fn test_enum_values_are_labelled() {
    let colour = TypeReference::Enum(
        EnumType::new("Colour")
            .with_member(EnumMember::new(1, "Red").with_description("Red color"))
            .with_member(EnumMember::new(2, "Blue")),
    );
    let candidate = endpoint("Paint", "paint", &[HttpMethod::Post])
        .with_parameter(ParameterDeclaration::new("colour", colour).from_query());

    let document = generate("localhost", &[candidate]);

    assert_eq!(
        document["paths"]["/api/paint"]["post"]["parameters"][1],
        json!({
            "name": "colour",
            "in": "query",
            "required": false,
            "type": "string",
            "enum": ["1 - Red color", "2 - Blue"],
        })
    );
}

#[test]
fn test_hidden_response_schema() {
    let candidate = endpoint("GetWidget", "widgets/{id}", &[HttpMethod::Get])
        .with_response(ResponseDeclaration::new(200, "Found"))
        .with_response(ResponseDeclaration::new(404, "Not found").without_schema())
        .returning(widget());

    let document = generate("localhost", &[candidate]);

    assert_eq!(
        document["paths"]["/api/widgets/{id}"]["get"]["responses"],
        json!({
            "200": {"description": "Found", "schema": {"$ref": "#/definitions/Widget"}},
            "404": {"description": "Not found"},
        })
    );
}

#[test]
fn test_return_type_defined_without_visible_schema() {
    let document = generate(
        "localhost",
        &[
            endpoint("GetWidget", "widgets/{id}", &[HttpMethod::Get])
                .with_response(ResponseDeclaration::new(404, "Not found").without_schema())
                .returning(widget()),
            endpoint("TouchWidget", "widgets/touch", &[HttpMethod::Post]).returning(widget()),
        ],
    );

    assert_eq!(
        document["paths"]["/api/widgets/{id}"]["get"]["responses"],
        json!({"404": {"description": "Not found"}})
    );
    assert_eq!(document["paths"]["/api/widgets/touch"]["post"]["responses"], json!({}));

    let definitions: Vec<&String> = document["definitions"].as_object().unwrap().keys().collect();
    assert_eq!(definitions, vec!["Widget"]);
    assert_eq!(document["definitions"]["Widget"]["required"], json!(["Id"]));
}

#[test]
fn test_concurrent_generation_over_shared_pool() {
    let candidates = vec![
        endpoint("GetWidget", "widgets/{id}", &[HttpMethod::Get])
            .with_response(ResponseDeclaration::new(200, "Found"))
            .returning(widget()),
        EndpointCandidate::new("Ping").with_parameter(ParameterDeclaration::trigger(
            "req",
            HttpTrigger::new().with_route("ping"),
        )),
    ];
    let assembler = DocumentAssembler::new()
        .with_request(RequestContext::new("localhost"))
        .with_title("Widget API")
        .with_description("Manages widgets")
        .with_definition_name("ApiDefinition");

    let expected = assembler.generate(&candidates).unwrap();

    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| assembler.generate(&candidates).unwrap()))
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    for output in outputs {
        assert_eq!(output, expected);
    }

    let document: Value = serde_json::from_str(&expected).unwrap();
    assert_eq!(document["paths"]["/api/ping"].as_object().unwrap().len(), 7);
}
