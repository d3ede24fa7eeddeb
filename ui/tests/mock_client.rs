//! Browser tests for the mock data-access client
//!
//! Run with `wasm-pack test --headless --firefox ui`.

use std::cell::RefCell;
use std::rc::Rc;

use grist_manager_shared::{
    ApiError, CreateInstanceRequest, HttpsMode, InstanceStatus, InstanceStore,
};
use grist_manager_ui::client::{GristApi, Latency, MockClient};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn seeded_client() -> (Rc<RefCell<InstanceStore>>, MockClient) {
    let store = Rc::new(RefCell::new(InstanceStore::seeded()));
    let client = MockClient::with_shared_store(store.clone(), Latency::NONE);
    (store, client)
}

fn request() -> CreateInstanceRequest {
    CreateInstanceRequest {
        name: "QA Grist".to_string(),
        url: "https://qa.grist.example.com".to_string(),
        team: "qa-team".to_string(),
        email: "qa@example.com".to_string(),
        password: "secret123".to_string(),
        https: HttpsMode::Auto,
        trusted_proxy_ips: None,
        additional_users: Vec::new(),
    }
}

#[wasm_bindgen_test]
async fn test_list_returns_seeded_instances() {
    let (_, client) = seeded_client();
    let instances = client.list_instances().await.unwrap();
    assert_eq!(instances.len(), 3);
}

#[wasm_bindgen_test]
async fn test_get_unknown_instance_is_not_found() {
    let (_, client) = seeded_client();
    let err = client.get_instance("missing").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[wasm_bindgen_test]
async fn test_create_then_list_contains_pending_instance() {
    let (_, client) = seeded_client();
    let created = client.create_instance(request()).await.unwrap();
    assert_eq!(created.status, InstanceStatus::Pending);

    let instances = client.list_instances().await.unwrap();
    assert_eq!(instances.len(), 4);
    let listed = instances.iter().find(|i| i.id == created.id).unwrap();
    assert_eq!(listed.name, "QA Grist");
    assert_eq!(listed.team, "qa-team");
    assert_eq!(listed.url, "https://qa.grist.example.com");
}

#[wasm_bindgen_test]
async fn test_mutations_on_unknown_id_leave_store_unchanged() {
    let (store, client) = seeded_client();
    let before = store.borrow().list();

    client.start_instance("missing").await.unwrap();
    client.stop_instance("missing").await.unwrap();
    client.delete_instance("missing").await.unwrap();

    assert_eq!(store.borrow().list(), before);
}

#[wasm_bindgen_test]
async fn test_logs_narrow_to_instance() {
    let (_, client) = seeded_client();
    let all = client.get_logs(None).await.unwrap();
    let first = all[0].instance_id.clone();

    let narrowed = client.get_logs(Some(&first)).await.unwrap();
    assert!(!narrowed.is_empty());
    assert!(narrowed.iter().all(|log| log.instance_id == first));
}
