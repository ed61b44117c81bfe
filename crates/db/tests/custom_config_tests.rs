//! Integration tests for the custom config store.

mod common;

use common::TestStore;
use common::fixtures::cfg;
use parapet_core::{ContentHash, Method};
use parapet_db::{CustomConfigUpload, UpsertOutcome};

#[tokio::test]
async fn test_upsert_checksum_stability() {
    let test = TestStore::with_catalog().await.expect("store setup failed");
    let store = test.store();

    let outcome = store
        .upsert_custom_config(None, "http", "n1", b"data", Method::Ui, None)
        .await
        .expect("upsert failed");
    assert_eq!(outcome, UpsertOutcome::Created);

    // Identical bytes: no second write, and the outcome says so.
    let outcome = store
        .upsert_custom_config(None, "http", "n1", b"data", Method::Ui, None)
        .await
        .expect("second upsert failed");
    assert_eq!(outcome, UpsertOutcome::Unchanged);

    let row = store
        .get_custom_config(None, "http", "n1")
        .await
        .expect("get failed")
        .expect("config missing");
    assert_eq!(row.checksum, ContentHash::compute(b"data").to_hex());
    assert_eq!(row.method, "ui");
}

#[tokio::test]
async fn test_upsert_updates_content_and_owner() {
    let test = TestStore::with_catalog().await.expect("store setup failed");
    let store = test.store();

    store
        .upsert_custom_config(None, "http", "n1", b"v1", Method::Scheduler, None)
        .await
        .expect("create failed");

    // The owner may rewrite its own fragment.
    let outcome = store
        .upsert_custom_config(None, "http", "n1", b"v2", Method::Scheduler, None)
        .await
        .expect("update failed");
    assert_eq!(outcome, UpsertOutcome::Updated);

    // autoconf may take over a scheduler-owned fragment.
    let outcome = store
        .upsert_custom_config(None, "http", "n1", b"v3", Method::Autoconf, None)
        .await
        .expect("autoconf update failed");
    assert_eq!(outcome, UpsertOutcome::Updated);

    let row = store
        .get_custom_config(None, "http", "n1")
        .await
        .expect("get failed")
        .expect("config missing");
    assert_eq!(row.data, b"v3");
    assert_eq!(row.method, "autoconf");
}

#[tokio::test]
async fn test_upsert_method_conflict_is_distinct() {
    let test = TestStore::with_catalog().await.expect("store setup failed");
    let store = test.store();

    store
        .upsert_custom_config(None, "http", "n1", b"v1", Method::Autoconf, None)
        .await
        .expect("create failed");

    let err = store
        .upsert_custom_config(None, "http", "n1", b"v2", Method::Ui, None)
        .await
        .expect_err("ui must not rewrite an autoconf fragment");
    assert!(err.is_method_conflict());

    let row = store
        .get_custom_config(None, "http", "n1")
        .await
        .expect("get failed")
        .expect("config missing");
    assert_eq!(row.data, b"v1");
}

#[tokio::test]
async fn test_upsert_unknown_service_is_not_found() {
    let test = TestStore::with_catalog().await.expect("store setup failed");
    let store = test.store();

    let err = store
        .upsert_custom_config(Some("ghost"), "server_http", "n1", b"x", Method::Ui, None)
        .await
        .expect_err("unknown service must fail");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_failure_kinds() {
    let test = TestStore::with_catalog().await.expect("store setup failed");
    let store = test.store();

    let err = store
        .delete_custom_config(None, "http", "ghost", Method::Ui)
        .await
        .expect_err("missing fragment must fail");
    assert!(err.is_not_found());

    store
        .upsert_custom_config(None, "http", "n1", b"v1", Method::Autoconf, None)
        .await
        .expect("create failed");

    let err = store
        .delete_custom_config(None, "http", "n1", Method::Ui)
        .await
        .expect_err("ui must not delete an autoconf fragment");
    assert!(err.is_method_conflict());

    store
        .delete_custom_config(None, "http", "n1", Method::Autoconf)
        .await
        .expect("owner delete failed");
    assert!(
        store
            .get_custom_config(None, "http", "n1")
            .await
            .expect("get failed")
            .is_none()
    );
}

#[tokio::test]
async fn test_replace_all_for_method() {
    let test = TestStore::with_catalog().await.expect("store setup failed");
    let store = test.store();

    store
        .save_config(
            &cfg(&[("MULTISITE", "yes"), ("SERVER_NAME", "a")]),
            Method::Ui,
        )
        .await
        .expect("save failed");

    store
        .upsert_custom_config(None, "http", "ui-1", b"one", Method::Ui, None)
        .await
        .expect("create failed");
    store
        .upsert_custom_config(Some("a"), "server_http", "ui-2", b"two", Method::Ui, None)
        .await
        .expect("create failed");
    store
        .upsert_custom_config(None, "http", "sched-1", b"keep", Method::Scheduler, None)
        .await
        .expect("create failed");

    // The new ui set drops ui-1 and renames the payload of ui-2.
    let uploads = vec![
        CustomConfigUpload {
            service_id: Some("a".to_string()),
            config_type: "server_http".to_string(),
            name: "ui-2".to_string(),
            data: b"two-v2".to_vec(),
        },
        CustomConfigUpload {
            service_id: None,
            config_type: "http".to_string(),
            name: "ui-3".to_string(),
            data: b"three".to_vec(),
        },
    ];
    store
        .replace_custom_configs(&uploads, Method::Ui)
        .await
        .expect("replace failed");

    assert!(
        store
            .get_custom_config(None, "http", "ui-1")
            .await
            .expect("get failed")
            .is_none(),
        "retracted fragment must be gone"
    );
    let row = store
        .get_custom_config(Some("a"), "server_http", "ui-2")
        .await
        .expect("get failed")
        .expect("ui-2 missing");
    assert_eq!(row.data, b"two-v2");
    assert!(
        store
            .get_custom_config(None, "http", "ui-3")
            .await
            .expect("get failed")
            .is_some()
    );
    // Fragments owned by other methods survive the replace.
    assert!(
        store
            .get_custom_config(None, "http", "sched-1")
            .await
            .expect("get failed")
            .is_some()
    );
}

#[tokio::test]
async fn test_replace_skips_unknown_services() {
    let test = TestStore::with_catalog().await.expect("store setup failed");
    let store = test.store();

    let uploads = vec![
        CustomConfigUpload {
            service_id: Some("ghost".to_string()),
            config_type: "server_http".to_string(),
            name: "bad".to_string(),
            data: b"x".to_vec(),
        },
        CustomConfigUpload {
            service_id: None,
            config_type: "http".to_string(),
            name: "good".to_string(),
            data: b"y".to_vec(),
        },
    ];

    store
        .replace_custom_configs(&uploads, Method::Ui)
        .await
        .expect("replace must survive unknown services");

    assert!(
        store
            .get_custom_config(None, "http", "good")
            .await
            .expect("get failed")
            .is_some()
    );
    assert!(
        store
            .get_custom_config(Some("ghost"), "server_http", "bad")
            .await
            .expect("get failed")
            .is_none()
    );
}
