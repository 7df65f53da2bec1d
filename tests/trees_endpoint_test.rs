//! Endpoint tests for the mutating admin surface.

use affitree::api::{self, AppState};
use affitree::db::init_db;
use affitree::domain::Percent;
use affitree::engine::{DownlineAggregator, ForestReporter, TreeMutator};
use affitree::ledger::MockOrderLedger;
use affitree::{OrderLedger, Repository};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

async fn setup_test_app() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));
    let ledger: Arc<dyn OrderLedger> = Arc::new(MockOrderLedger::new());

    let mutator = Arc::new(TreeMutator::new(repo.clone(), Percent::zero()));
    let aggregator = Arc::new(DownlineAggregator::new(repo.clone(), ledger.clone()));
    let reporter = Arc::new(ForestReporter::new(repo, ledger));

    let state = AppState::new(mutator, aggregator, reporter);
    (api::create_router(state), temp_dir)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_create_tree_endpoint() {
    let (app, _temp) = setup_test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/trees",
        Some(json!({"rootWallet": "W1", "ceilingPercent": 10, "alias": "alpha"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["treeId"].is_i64());

    // Same root again conflicts.
    let (status, body) = send(
        &app,
        "POST",
        "/v1/trees",
        Some(json!({"rootWallet": "W1", "ceilingPercent": 20, "alias": "again"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already a member"));

    // Out-of-range ceiling is a bad request.
    let (status, _) = send(
        &app,
        "POST",
        "/v1/trees",
        Some(json!({"rootWallet": "W9", "ceilingPercent": 101, "alias": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Blank alias is rejected before touching the engine.
    let (status, _) = send(
        &app,
        "POST",
        "/v1/trees",
        Some(json!({"rootWallet": "W9", "ceilingPercent": 10, "alias": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_attach_member_endpoint() {
    let (app, _temp) = setup_test_app().await;

    send(
        &app,
        "POST",
        "/v1/trees",
        Some(json!({"rootWallet": "W1", "ceilingPercent": 10, "alias": "alpha"})),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/trees/members",
        Some(json!({"referrerWallet": "W1", "newWallet": "W2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["nodeId"].is_i64());

    let (status, _) = send(
        &app,
        "POST",
        "/v1/trees/members",
        Some(json!({"referrerWallet": "W2", "newWallet": "W2"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/v1/trees/members",
        Some(json!({"referrerWallet": "nobody", "newWallet": "W3"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_root_commission_endpoint() {
    let (app, _temp) = setup_test_app().await;

    send(
        &app,
        "POST",
        "/v1/trees",
        Some(json!({"rootWallet": "W1", "ceilingPercent": 10, "alias": "alpha"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/v1/trees/members",
        Some(json!({"referrerWallet": "W1", "newWallet": "W2"})),
    )
    .await;

    // The attached member sits at 10, so lowering the root to 5 conflicts.
    let (status, body) = send(
        &app,
        "PUT",
        "/v1/trees/root-commission",
        Some(json!({"rootWallet": "W1", "newPercent": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("descendant floor"));

    let (status, body) = send(
        &app,
        "PUT",
        "/v1/trees/root-commission",
        Some(json!({"rootWallet": "W1", "newPercent": 25})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["oldPercent"].as_f64(), Some(10.0));
    assert_eq!(body["newPercent"].as_f64(), Some(25.0));
    assert_eq!(body["descendantFloor"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn test_change_flow_endpoint() {
    let (app, _temp) = setup_test_app().await;

    send(
        &app,
        "POST",
        "/v1/trees",
        Some(json!({"rootWallet": "W1", "ceilingPercent": 10, "alias": "alpha"})),
    )
    .await;
    for (referrer, wallet) in [("W1", "W2"), ("W2", "W3"), ("W2", "W4")] {
        send(
            &app,
            "POST",
            "/v1/trees/members",
            Some(json!({"referrerWallet": referrer, "newWallet": wallet})),
        )
        .await;
    }

    // Moving W2 under its own descendant is a cycle.
    let (status, body) = send(
        &app,
        "PUT",
        "/v1/trees/flow",
        Some(json!({"wallet": "W2", "newParentWallet": "W3"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("cycle"));

    // Roots cannot be re-parented.
    let (status, _) = send(
        &app,
        "PUT",
        "/v1/trees/flow",
        Some(json!({"wallet": "W1", "newParentWallet": "W2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // W3 moves under W4 cleanly; it has no descendants to re-stamp.
    let (status, body) = send(
        &app,
        "PUT",
        "/v1/trees/flow",
        Some(json!({"wallet": "W3", "newParentWallet": "W4"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["descendantsMoved"].as_u64(), Some(0));
}

#[tokio::test]
async fn test_set_status_endpoint() {
    let (app, _temp) = setup_test_app().await;

    send(
        &app,
        "POST",
        "/v1/trees",
        Some(json!({"rootWallet": "W1", "ceilingPercent": 10, "alias": "alpha"})),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        "/v1/nodes/status",
        Some(json!({"wallet": "W1", "active": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["oldStatus"], "active");
    assert_eq!(body["newStatus"], "inactive");
    assert_eq!(body["rootWarning"], true);

    let (status, _) = send(
        &app,
        "PUT",
        "/v1/nodes/status",
        Some(json!({"wallet": "nobody", "active": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_record_reward_endpoint() {
    let (app, _temp) = setup_test_app().await;

    send(
        &app,
        "POST",
        "/v1/trees",
        Some(json!({"rootWallet": "W1", "ceilingPercent": 10, "alias": "alpha"})),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/rewards",
        Some(json!({"wallet": "W1", "amount": 2.5, "sourceEventId": "trade:1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recorded"], true);

    // Replaying the settlement event is a no-op.
    let (status, body) = send(
        &app,
        "POST",
        "/v1/rewards",
        Some(json!({"wallet": "W1", "amount": 2.5, "sourceEventId": "trade:1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recorded"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/v1/rewards",
        Some(json!({"wallet": "W1", "amount": -1, "sourceEventId": "trade:2"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/v1/rewards",
        Some(json!({"wallet": "nobody", "amount": 1, "sourceEventId": "trade:3"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_downline_and_wallet_info_endpoints() {
    let (app, _temp) = setup_test_app().await;

    send(
        &app,
        "POST",
        "/v1/trees",
        Some(json!({"rootWallet": "W1", "ceilingPercent": 10, "alias": "alpha"})),
    )
    .await;
    for (referrer, wallet) in [("W1", "W2"), ("W2", "W3")] {
        send(
            &app,
            "POST",
            "/v1/trees/members",
            Some(json!({"referrerWallet": referrer, "newWallet": wallet})),
        )
        .await;
    }

    let (status, body) = send(&app, "GET", "/v1/downline?wallet=W1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalMembers"].as_i64(), Some(2));
    assert_eq!(body["activeMembers"].as_i64(), Some(2));
    assert_eq!(body["downline"]["wallet"], "W1");
    assert_eq!(body["downline"]["children"][0]["wallet"], "W2");

    let (status, _) = send(&app, "GET", "/v1/downline?wallet=nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/v1/wallets/W3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"], true);
    assert_eq!(body["level"].as_i64(), Some(2));
    assert_eq!(body["parentWallet"], "W2");

    // Non-membership is a result, not an error.
    let (status, body) = send(&app, "GET", "/v1/wallets/nobody", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"], false);
    assert!(body.get("level").is_none());
}
