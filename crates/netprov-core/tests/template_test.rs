// Project and template lifecycle against a wiremock intent controller.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netprov_api::{IntentClient, TransportConfig};
use netprov_core::{PollPolicy, TemplateManager, TemplateSettings};

const TP: &str = "/dna/intent/api/v1/template-programmer";

// ── Helpers ─────────────────────────────────────────────────────────

fn client(server: &MockServer) -> IntentClient {
    IntentClient::new(Url::parse(&server.uri()).unwrap(), &TransportConfig::default())
        .unwrap()
        .with_token(SecretString::from("tok".to_owned()))
}

fn poll() -> PollPolicy {
    PollPolicy {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        max_attempts: 8,
    }
}

fn task(data: Option<&str>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "response": {
            "isError": false,
            "progress": "done",
            "data": data,
            "endTime": 1_700_000_000_000_u64,
        }
    }))
}

fn task_ref(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(202).set_body_json(json!({ "response": { "taskId": id } }))
}

/// Template listing with `includeHead=true`, answered once at `priority`.
async fn mount_head_listing_once(server: &MockServer, priority: u8, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("{TP}/template")))
        .and(query_param("includeHead", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .with_priority(priority)
        .mount(server)
        .await;
}

/// Create (matched on content) and commit for one template id.
async fn mount_create_and_commit(server: &MockServer, content: &str, template_id: &str) {
    let create_task = format!("task-create-{template_id}");
    let commit_task = format!("task-commit-{template_id}");

    Mock::given(method("POST"))
        .and(path(format!("{TP}/project/p-1/template")))
        .and(body_partial_json(json!({
            "name": "vlan_template",
            "templateContent": content
        })))
        .respond_with(task_ref(&create_task))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/dna/intent/api/v1/task/{create_task}")))
        .respond_with(task(Some(template_id)))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{TP}/template/version")))
        .and(body_json(json!({ "templateId": template_id, "comments": "committed by netprov" })))
        .respond_with(task_ref(&commit_task))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/dna/intent/api/v1/task/{commit_task}")))
        .respond_with(task(None))
        .mount(server)
        .await;
}

/// Committed listing that still carries the old template next to the new one.
async fn mount_committed_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("{TP}/template")))
        .and(query_param("includeHead", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "vlan_template",
                "templateId": "t-old",
                "versionsInfo": [{ "id": "v-old", "version": "4" }]
            },
            {
                "name": "vlan_template",
                "templateId": "t-new",
                "versionsInfo": [{ "id": "v-new", "version": "1" }]
            }
        ])))
        .mount(server)
        .await;
}

// ── Projects ────────────────────────────────────────────────────────

#[tokio::test]
async fn created_project_id_matches_later_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{TP}/project")))
        .and(query_param("name", "IBN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{TP}/project")))
        .and(query_param("name", "IBN"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": "p-7", "name": "IBN" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{TP}/project")))
        .and(body_json(json!({ "name": "IBN" })))
        .respond_with(task_ref("task-project"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/task/task-project"))
        .respond_with(task(Some("p-7")))
        .mount(&server)
        .await;

    let client = client(&server);
    let settings = TemplateSettings::default();
    let manager = TemplateManager::new(&client, &settings, poll());

    let created = manager.ensure_project("IBN").await.unwrap();
    assert_eq!(created, "p-7");
    assert_eq!(manager.find_project("IBN").await.unwrap().as_deref(), Some("p-7"));
    // A second ensure finds the project instead of creating another.
    assert_eq!(manager.ensure_project("IBN").await.unwrap(), created);
}

// ── Templates ───────────────────────────────────────────────────────

#[tokio::test]
async fn publish_returns_version_of_new_template() {
    let server = MockServer::start().await;

    // Stale template listed once, then gone after the delete.
    mount_head_listing_once(
        &server,
        1,
        json!([{ "name": "vlan_template", "templateId": "t-old", "versionsInfo": [] }]),
    )
    .await;
    mount_head_listing_once(&server, 2, json!([])).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{TP}/template/t-old")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_create_and_commit(&server, "vlan $vlanId\n", "t-new").await;
    mount_committed_listing(&server).await;

    let client = client(&server);
    let settings = TemplateSettings::default();
    let manager = TemplateManager::new(&client, &settings, poll());

    let version = manager
        .publish_template("vlan_template", "p-1", "vlan $vlanId\n")
        .await
        .unwrap();
    assert_eq!(version, "v-new");
}

#[tokio::test]
async fn republishing_replaces_content_and_version() {
    let server = MockServer::start().await;

    // First publish: nothing listed. Second: the first template, then gone.
    mount_head_listing_once(&server, 1, json!([])).await;
    mount_head_listing_once(
        &server,
        2,
        json!([{ "name": "vlan_template", "templateId": "t-old", "versionsInfo": [] }]),
    )
    .await;
    mount_head_listing_once(&server, 3, json!([])).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{TP}/template/t-old")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_create_and_commit(&server, "vlan 10\n", "t-old").await;
    mount_create_and_commit(&server, "vlan 20\n", "t-new").await;
    mount_committed_listing(&server).await;

    let client = client(&server);
    let settings = TemplateSettings::default();
    let manager = TemplateManager::new(&client, &settings, poll());

    let first = manager
        .publish_template("vlan_template", "p-1", "vlan 10\n")
        .await
        .unwrap();
    assert_eq!(first, "v-old");

    let second = manager
        .publish_template("vlan_template", "p-1", "vlan 20\n")
        .await
        .unwrap();
    assert_eq!(second, "v-new");
}
