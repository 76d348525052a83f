//! Integration tests for endpoint extraction, DTO resolution and payload
//! synthesis against the `testdata/nest-app` fixture.

use std::path::PathBuf;

use osprey::config::{Config, Conventions};
use osprey::endpoints::HttpMethod;
use osprey::payload::PayloadNode;
use osprey::{AnalysisSession, EndpointExtractor, SchemaResolver, Workspace};

fn testdata_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata/nest-app")
        .join(relative)
}

/// 1-indexed line of the first occurrence of `needle` in a fixture file.
fn line_of(relative: &str, needle: &str) -> usize {
    let text = std::fs::read_to_string(testdata_path(relative)).unwrap();
    text.lines()
        .position(|line| line.contains(needle))
        .map(|index| index + 1)
        .unwrap_or_else(|| panic!("{:?} not found in {}", needle, relative))
}

const USERS: &str = "src/users/users.controller.ts";
const ORDERS: &str = "src/orders/orders.controller.ts";

// =============================================================================
// Extraction
// =============================================================================

#[test]
fn test_users_controller_endpoints() {
    let session = AnalysisSession::new();
    let conventions = Conventions::default();
    let extractor = EndpointExtractor::new(&session, &conventions);

    let endpoints = extractor.extract(testdata_path(USERS));
    let summary: Vec<(HttpMethod, &str, &str)> = endpoints
        .iter()
        .map(|e| (e.http_method, e.route.as_str(), e.handler.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (HttpMethod::Post, "/users", "create"),
            (HttpMethod::Get, "/users", "findAll"),
            (HttpMethod::Get, "/users/:id", "findOne"),
            (HttpMethod::Patch, "/users/:id", "update"),
            (HttpMethod::Delete, "/users/:id", "remove"),
        ]
    );

    let find_all = &endpoints[1];
    assert_eq!(find_all.query_params, vec!["page", "limit"]);
    assert!(find_all.request_body.is_none());
    assert_eq!(find_all.decl_line, line_of(USERS, "@Get()"));

    let find_one = &endpoints[2];
    assert_eq!(find_one.path_params, vec!["id"]);
    assert!(find_one.query_params.is_empty());
}

#[test]
fn test_body_dto_and_entity_binding() {
    let session = AnalysisSession::new();
    let conventions = Conventions::default();
    let extractor = EndpointExtractor::new(&session, &conventions);
    let endpoints = extractor.extract(testdata_path(USERS));

    let create = &endpoints[0];
    let dto = create.request_body.as_ref().unwrap();
    assert_eq!(dto.class_name, "CreateUserDto");
    assert_eq!(
        dto.declaration_path,
        testdata_path("src/users/dto/create-user.dto.ts")
    );

    let entity = create.entity.as_ref().unwrap();
    assert_eq!(entity.class_name, "User");
    assert_eq!(create.table_name.as_deref(), Some("app_users"));

    // `Promise<User[]>` binds to the same entity.
    assert_eq!(endpoints[1].table_name.as_deref(), Some("app_users"));

    // No return annotation, no entity.
    let update = &endpoints[3];
    assert!(update.entity.is_none());
    assert_eq!(
        update.request_body.as_ref().map(|d| d.class_name.as_str()),
        Some("UpdateUserDto")
    );
}

#[test]
fn test_naming_convention_fallback_and_barrel_import() {
    let session = AnalysisSession::new();
    let conventions = Conventions::default();
    let extractor = EndpointExtractor::new(&session, &conventions);

    let endpoints = extractor.extract(testdata_path(ORDERS));
    let routes: Vec<&str> = endpoints.iter().map(|e| e.route.as_str()).collect();
    assert_eq!(routes, vec!["/recent", "/search", "/"]);

    let search = &endpoints[1];
    let dto = search.request_body.as_ref().unwrap();
    assert_eq!(dto.class_name, "PaginationDto");
    assert_eq!(
        dto.declaration_path,
        testdata_path("src/common/pagination.dto.ts")
    );
}

#[test]
fn test_non_controller_file_has_no_endpoints() {
    let session = AnalysisSession::new();
    let conventions = Conventions::default();
    let extractor = EndpointExtractor::new(&session, &conventions);

    assert!(extractor
        .extract(testdata_path("src/users/dto/create-user.dto.ts"))
        .is_empty());
    assert!(extractor
        .extract(testdata_path("src/users/missing.controller.ts"))
        .is_empty());
}

// =============================================================================
// Schema
// =============================================================================

#[test]
fn test_create_user_fields() {
    let session = AnalysisSession::new();
    let conventions = Conventions::default();
    let endpoints = EndpointExtractor::new(&session, &conventions).extract(testdata_path(USERS));
    let dto = endpoints[0].request_body.clone().unwrap();

    let fields = SchemaResolver::new(&session).resolve(&dto);
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "name",
            "email",
            "age",
            "isActive",
            "tags",
            "birthDate",
            "role",
            "address",
            "previousAddresses"
        ]
    );

    let tags = &fields[4];
    assert!(tags.is_array);
    assert_eq!(tags.declared_type, "string");
    assert!(tags.related_dto.is_none());

    // Enums are not DTOs.
    assert!(fields[6].related_dto.is_none());

    let address = fields[7].related_dto.as_ref().unwrap();
    assert_eq!(address.class_name, "AddressDto");
    let previous = &fields[8];
    assert!(previous.is_array);
    assert_eq!(
        previous.related_dto.as_ref().map(|d| d.class_name.as_str()),
        Some("AddressDto")
    );
}

#[test]
fn test_inferred_property_types() {
    let session = AnalysisSession::new();
    let dto = osprey::DtoRef::new(testdata_path("src/common/pagination.dto.ts"), "PaginationDto");
    let fields = SchemaResolver::new(&session).resolve(&dto);

    let types: Vec<(&str, &str)> = fields
        .iter()
        .map(|f| (f.name.as_str(), f.declared_type.as_str()))
        .collect();
    assert_eq!(
        types,
        vec![("page", "number"), ("limit", "number"), ("sort", "string")]
    );
}

// =============================================================================
// Payloads
// =============================================================================

#[test]
fn test_create_user_payload() {
    let mut workspace = Workspace::open(testdata_path(""), Config::default());
    let line = line_of(USERS, "@Post()");
    let endpoint = workspace.endpoint_at(testdata_path(USERS), line).unwrap();
    assert_eq!(endpoint.handler, "create");

    let preview = workspace.request_preview(&endpoint);
    let payload = preview.payload.unwrap();

    assert_eq!(payload.get("name"), Some(&PayloadNode::String("string".into())));
    assert_eq!(payload.get("age"), Some(&PayloadNode::Number(0)));
    assert_eq!(payload.get("isActive"), Some(&PayloadNode::Bool(true)));
    assert_eq!(
        payload.get("tags"),
        Some(&PayloadNode::Array(vec![PayloadNode::String("string".into())]))
    );
    assert_eq!(payload.get("role"), Some(&PayloadNode::Null));

    match payload.get("birthDate") {
        Some(PayloadNode::String(stamp)) => {
            assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
        }
        other => panic!("expected a timestamp, got {:?}", other),
    }

    let address = payload.get("address").unwrap();
    assert_eq!(address.get("city"), Some(&PayloadNode::String("string".into())));
    assert_eq!(address.get("zip"), Some(&PayloadNode::Number(0)));

    match payload.get("previousAddresses") {
        Some(PayloadNode::Array(items)) => {
            assert_eq!(items.len(), 1);
            assert!(items[0].get("street").is_some());
        }
        other => panic!("expected an array, got {:?}", other),
    }
}

#[test]
fn test_cyclic_dtos_terminate() {
    let mut workspace = Workspace::open(testdata_path(""), Config::default());
    let place = workspace
        .endpoints(testdata_path(ORDERS))
        .into_iter()
        .find(|e| e.handler == "place")
        .unwrap();

    let payload = workspace.payload_for(place.request_body.as_ref().unwrap());
    let customer = payload.get("customer").unwrap();
    match customer.get("orders") {
        Some(PayloadNode::Array(items)) => {
            assert!(items[0].get("customer").is_some());
        }
        other => panic!("expected an array, got {:?}", other),
    }
    assert!(payload.to_json_pretty().len() < 4096);
}

#[test]
fn test_cursor_selection_in_fixture() {
    let mut workspace = Workspace::open(testdata_path(""), Config::default());
    let path = testdata_path(USERS);

    let body_line = line_of(USERS, "return this.usersService.findOne");
    let endpoint = workspace.endpoint_at(&path, body_line).unwrap();
    assert_eq!(endpoint.handler, "findOne");

    let above = line_of(USERS, "@Delete(':id')") - 1;
    assert_eq!(
        workspace.endpoint_at(&path, above).map(|e| e.handler),
        Some("remove".to_string())
    );

    let import_line = line_of(USERS, "from '@nestjs/common'");
    assert!(workspace.endpoint_at(&path, import_line).is_none());
}

#[test]
fn test_get_preview_has_no_body() {
    let mut workspace = Workspace::open(testdata_path(""), Config::default());
    let endpoints = workspace.endpoints(testdata_path(USERS));
    let preview = workspace.request_preview(&endpoints[1]);

    assert!(preview.payload.is_none());
    let keys: Vec<&str> = preview.query_params.iter().map(|q| q.key.as_str()).collect();
    assert_eq!(keys, vec!["page", "limit"]);
    assert_eq!(preview.table_name.as_deref(), Some("app_users"));
}
