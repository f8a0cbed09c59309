use blokgen::{
    config::{PushConfig, PushMethod},
    push::{PushClient, PushOptions, remote_ids::RemoteIds},
    schema::{catalog::SchemaBuilder, model::Category, store::SchemaStore},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, body_json, header, method, path},
};

fn store_with_stat_item() -> (tempfile::TempDir, SchemaStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SchemaStore::new(dir.path());
    store
        .write(&SchemaBuilder::new().stat_item(), Category::Nested, false)
        .unwrap();
    (dir, store)
}

fn webhook_config(server: &MockServer) -> PushConfig {
    PushConfig {
        webhook_url: Some(format!("{}/webhook/schema", server.uri())),
        ..Default::default()
    }
}

fn direct_config(server: &MockServer) -> PushConfig {
    PushConfig {
        method: PushMethod::Direct,
        management_token: Some("secret-token".into()),
        space_id: Some("1".into()),
        management_base_url: format!("{}/v1", server.uri()),
        ..Default::default()
    }
}

const DIRECT: PushOptions = PushOptions {
    validate: true,
    method: PushMethod::Direct,
};

#[tokio::test]
async fn missing_schema_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = SchemaStore::new(dir.path());
    let config = webhook_config(&server);
    let client = PushClient::new(&config, &store).unwrap();

    let unvalidated = PushOptions {
        validate: false,
        method: PushMethod::N8n,
    };
    let outcome = client.push("ghost", unvalidated).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Schema file not found: ghost.json");

    let outcome = client.push("ghost", PushOptions::default()).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Validation failed");
}

#[tokio::test]
async fn webhook_receives_raw_schema() {
    let server = MockServer::start().await;
    let (_dir, store) = store_with_stat_item();
    let expected = serde_json::to_value(SchemaBuilder::new().stat_item()).unwrap();

    Mock::given(method("POST"))
        .and(path("/webhook/schema"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = webhook_config(&server);
    let outcome = PushClient::new(&config, &store)
        .unwrap()
        .push("stat_item", PushOptions::default())
        .await;
    assert!(outcome.success);
    assert_eq!(
        outcome.message,
        "Schema pushed successfully (n8n returned empty response)"
    );
}

#[tokio::test]
async fn webhook_error_status_is_reported() {
    let server = MockServer::start().await;
    let (_dir, store) = store_with_stat_item();
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let config = webhook_config(&server);
    let outcome = PushClient::new(&config, &store)
        .unwrap()
        .push("stat_item", PushOptions::default())
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "HTTP 500: boom");
}

#[tokio::test]
async fn webhook_require_ack_rejects_empty_reply() {
    let server = MockServer::start().await;
    let (_dir, store) = store_with_stat_item();
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = PushConfig {
        require_ack: true,
        ..webhook_config(&server)
    };
    let outcome = PushClient::new(&config, &store)
        .unwrap()
        .push("stat_item", PushOptions::default())
        .await;
    assert!(!outcome.success);
}

#[tokio::test]
async fn missing_credentials_are_reported() {
    let (_dir, store) = store_with_stat_item();
    let config = PushConfig::default();
    let client = PushClient::new(&config, &store).unwrap();

    let outcome = client.push("stat_item", PushOptions::default()).await;
    assert_eq!(
        outcome.message,
        "N8N_WEBHOOK_URL not set in environment variables"
    );
    let outcome = client.push("stat_item", DIRECT).await;
    assert_eq!(
        outcome.message,
        "STORYBLOK_MANAGEMENT_TOKEN or STORYBLOK_SPACE_ID not set"
    );
}

#[tokio::test]
async fn direct_create_then_update_by_stored_id() {
    let server = MockServer::start().await;
    let (dir, store) = store_with_stat_item();

    Mock::given(method("GET"))
        .and(path("/v1/spaces/1/components"))
        .and(header("Authorization", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"components": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/spaces/1/components"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"component": {"id": 77}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/spaces/1/components/77"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"component": {"id": 77}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = direct_config(&server);
    let client = PushClient::new(&config, &store).unwrap();

    let created = client.push("stat_item", DIRECT).await;
    assert!(created.success, "{}", created.message);
    assert_eq!(created.message, "Component 'stat_item' created successfully");
    assert_eq!(created.component_id.as_deref(), Some("77"));
    assert_eq!(RemoteIds::load(dir.path()).get("stat_item"), Some("77"));

    let updated = client.push("stat_item", DIRECT).await;
    assert!(updated.success, "{}", updated.message);
    assert_eq!(updated.message, "Component 'stat_item' updated successfully");
}

#[tokio::test]
async fn direct_name_scan_picks_smallest_id() {
    let server = MockServer::start().await;
    let (_dir, store) = store_with_stat_item();

    Mock::given(method("GET"))
        .and(path("/v1/spaces/1/components"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"components": [
            {"id": 30, "name": "stat_item"},
            {"id": 7, "name": "stat_item"},
            {"id": 1, "name": "stats_section"},
        ]})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/spaces/1/components/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let config = direct_config(&server);
    let outcome = PushClient::new(&config, &store)
        .unwrap()
        .push("stat_item", DIRECT)
        .await;
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.component_id.as_deref(), Some("7"));
}

#[tokio::test]
async fn direct_stale_id_falls_back_to_name_scan() {
    let server = MockServer::start().await;
    let (dir, store) = store_with_stat_item();
    let mut ids = RemoteIds::load(dir.path());
    ids.insert("stat_item", "5");
    ids.save().unwrap();

    Mock::given(method("PUT"))
        .and(path("/v1/spaces/1/components/5"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/spaces/1/components"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"components": [
            {"id": "9", "name": "stat_item"},
        ]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/spaces/1/components/9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = direct_config(&server);
    let outcome = PushClient::new(&config, &store)
        .unwrap()
        .push("stat_item", DIRECT)
        .await;
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(RemoteIds::load(dir.path()).get("stat_item"), Some("9"));
}

#[tokio::test]
async fn direct_list_failure_is_reported() {
    let server = MockServer::start().await;
    let (_dir, store) = store_with_stat_item();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let config = direct_config(&server);
    let outcome = PushClient::new(&config, &store)
        .unwrap()
        .push("stat_item", DIRECT)
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Failed to list components: Unauthorized");
}

#[tokio::test]
async fn push_all_counts_results() {
    let server = MockServer::start().await;
    let (_dir, store) = store_with_stat_item();
    store
        .write(&SchemaBuilder::new().stats_section(), Category::Bloks, false)
        .unwrap();
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(2)
        .mount(&server)
        .await;

    let config = PushConfig {
        batch_delay_ms: 0,
        ..webhook_config(&server)
    };
    let summary = PushClient::new(&config, &store)
        .unwrap()
        .push_all(PushOptions::default())
        .await
        .unwrap();
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
}
