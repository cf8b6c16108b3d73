// Integration tests for `PolicyClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{basic_auth, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netprov_api::policy::models::Endpoint;
use netprov_api::{Error, PolicyClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PolicyClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let client = PolicyClient::with_client(
        reqwest::Client::new(),
        base,
        "ersadmin".into(),
        SecretString::from("secret".to_owned()),
    );
    (server, client)
}

fn endpoint(group: &str) -> Endpoint {
    Endpoint {
        id: None,
        name: "AA:BB:CC:DD:EE:FF".into(),
        description: Some("POS1".into()),
        mac: "AA:BB:CC:DD:EE:FF".into(),
        profile_id: Some("ffafa000-8bff-11e6-996c-525400b48521".into()),
        static_profile_assignment: false,
        group_id: Some(group.into()),
        static_group_assignment: true,
    }
}

// ── Endpoint groups ─────────────────────────────────────────────────

#[tokio::test]
async fn test_group_lookup_with_basic_auth() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ers/config/endpointgroup/name/POS"))
        .and(basic_auth("ersadmin", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "EndPointGroup": {
                "id": "grp-1",
                "name": "POS",
                "description": "Point of sale",
                "systemDefined": false
            }
        })))
        .mount(&server)
        .await;

    let group = client.get_endpoint_group_by_name("POS").await.unwrap().unwrap();
    assert_eq!(group.id, "grp-1");
    assert_eq!(group.system_defined, Some(false));
}

#[tokio::test]
async fn test_new_client_asks_for_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ers/config/endpointgroup/name/POS"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "EndPointGroup": { "id": "grp-1", "name": "POS" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = PolicyClient::new(
        Url::parse(&server.uri()).unwrap(),
        "ersadmin".into(),
        SecretString::from("secret".to_owned()),
        &TransportConfig::default(),
    )
    .unwrap();
    let group = client.get_endpoint_group_by_name("POS").await.unwrap().unwrap();
    assert_eq!(group.id, "grp-1");
}

#[tokio::test]
async fn test_group_lookup_404_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ers/config/endpointgroup/name/Nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(client.get_endpoint_group_by_name("Nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_group_lookup_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ers/config/endpointgroup/name/POS"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.get_endpoint_group_by_name("POS").await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }), "got: {err:?}");
}

// ── Endpoints ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_endpoint_lookup_by_mac() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ers/config/endpoint/name/AA:BB:CC:DD:EE:FF"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ERSEndPoint": {
                "id": "ep-1",
                "name": "AA:BB:CC:DD:EE:FF",
                "mac": "AA:BB:CC:DD:EE:FF",
                "groupId": "grp-1",
                "staticGroupAssignment": true
            }
        })))
        .mount(&server)
        .await;

    let found = client
        .get_endpoint_by_name("AA:BB:CC:DD:EE:FF")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id.as_deref(), Some("ep-1"));
    assert_eq!(found.group_id.as_deref(), Some("grp-1"));
}

#[tokio::test]
async fn test_create_endpoint_returns_201() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ers/config/endpoint"))
        .and(body_json(json!({
            "ERSEndPoint": {
                "name": "AA:BB:CC:DD:EE:FF",
                "description": "POS1",
                "mac": "AA:BB:CC:DD:EE:FF",
                "profileId": "ffafa000-8bff-11e6-996c-525400b48521",
                "staticProfileAssignment": false,
                "groupId": "grp-1",
                "staticGroupAssignment": true
            }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.create_endpoint(&endpoint("grp-1")).await.unwrap();
    assert_eq!(status, 201);
}

#[tokio::test]
async fn test_update_endpoint() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/ers/config/endpoint/ep-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "UpdatedFieldsList": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.update_endpoint("ep-1", &endpoint("grp-2")).await.unwrap();
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_create_endpoint_conflict_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ers/config/endpoint"))
        .respond_with(ResponseTemplate::new(400).set_body_string("already exists"))
        .mount(&server)
        .await;

    let err = client.create_endpoint(&endpoint("grp-1")).await.unwrap_err();
    match err {
        Error::Api { status, body, .. } => {
            assert_eq!(status, 400);
            assert!(body.contains("already exists"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
