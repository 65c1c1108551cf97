use super::common::*;
use axum::body::{to_bytes, Body};
use axum::extract::{Path, State};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::lifecycle::domain::{ComplianceStatus, RfiPatch};
use crate::lifecycle::router::{self, project_router, SharedProjectStore};
use crate::lifecycle::store::ProjectStore;

fn shared(store: ProjectStore) -> SharedProjectStore {
    Arc::new(Mutex::new(store))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

async fn read_json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes")
}

#[tokio::test]
async fn create_route_returns_created_project() {
    let router = project_router(shared(ProjectStore::default()));

    let response = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/projects",
            json!({ "address": "1 Smith St", "name": "New Build", "with_checklist": true }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], "da-000001");
    assert_eq!(payload["current_stage"], "pre-lodgement");
    assert_eq!(payload["compliance_score"], 0);
    assert_eq!(payload["documents"].as_array().map(Vec::len), Some(12));

    let response = send(
        &router,
        Request::get("/api/v1/projects")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn patching_derived_metrics_is_unprocessable() {
    let router = project_router(shared(store_with_project()));

    let response = send(
        &router,
        json_request(
            Method::PATCH,
            "/api/v1/projects/active",
            json!({ "compliance_score": 95 }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], "compliance_score");
}

#[tokio::test]
async fn blocked_advance_reports_precondition() {
    let store = shared(store_with_project());
    store
        .lock()
        .expect("store lock")
        .record_compliance_items(mixed_compliance_items())
        .expect("recorded");
    let router = project_router(store.clone());

    let response = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/projects/active/advance",
            json!({ "on": "2024-04-01" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["precondition"]["kind"], "compliance_below_threshold");
    assert_eq!(payload["precondition"]["score"], 85);
    assert_eq!(
        store
            .lock()
            .expect("store lock")
            .active()
            .expect("active")
            .stage_history()
            .len(),
        0
    );
}

#[tokio::test]
async fn compliance_batch_route_opens_the_lodgement_gate() {
    let router = project_router(shared(store_with_project()));
    let items = serde_json::to_value(passing_compliance_items()).expect("serialize items");

    let response = send(
        &router,
        json_request(Method::POST, "/api/v1/projects/active/compliance-items", items),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["compliance_score"], 100);

    let response = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/projects/active/advance",
            json!({ "on": "2024-04-01" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["current_stage"], "lodgement");
}

#[tokio::test]
async fn active_route_without_project_is_not_found() {
    let router = project_router(shared(ProjectStore::default()));

    let response = send(
        &router,
        Request::get("/api/v1/projects/active")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_rfi_handler_returns_not_found_for_unknown_rfi() {
    let store = shared(store_in_assessment());

    let response = router::update_rfi_handler(
        State(store),
        Path("rfi-404".to_string()),
        axum::Json(RfiPatch::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rfi_routes_enforce_response_on_leaving_pending() {
    let router = project_router(shared(store_in_assessment()));
    let rfi = serde_json::to_value(new_rfi("rfi-1")).expect("serialize rfi");

    let response = send(
        &router,
        json_request(Method::POST, "/api/v1/projects/active/rfis", rfi),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &router,
        json_request(
            Method::PATCH,
            "/api/v1/projects/active/rfis/rfi-1",
            json!({ "status": "responded" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["precondition"]["kind"], "response_required");

    let response = send(
        &router,
        json_request(
            Method::PATCH,
            "/api/v1/projects/active/rfis/rfi-1",
            json!({ "status": "responded", "response": "Amended plan attached" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["rfis"][0]["status"], "responded");
}

#[tokio::test]
async fn dashboard_route_uses_requested_day() {
    let mut store = ProjectStore::default();
    store.load_demo_project();
    let router = project_router(shared(store));

    let response = send(
        &router,
        Request::get("/api/v1/projects/active/dashboard?today=2024-06-01")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["today"], "2024-06-01");
    assert_eq!(payload["current_stage"], "post-consent");
    assert_eq!(payload["timeline_risk"], "at-risk");
    assert_eq!(payload["compliance_gaps"][0]["status"], "variation");
    assert!(payload.get("next_gate_blocker").is_none());
}

#[tokio::test]
async fn demo_route_replaces_existing_demo() {
    let store = shared(ProjectStore::default());
    let router = project_router(store.clone());

    for _ in 0..2 {
        let response = send(
            &router,
            Request::post("/api/v1/projects/demo")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let guard = store.lock().expect("store lock");
    assert_eq!(guard.list().len(), 1);
    assert_eq!(
        guard
            .active()
            .expect("active")
            .compliance_items()
            .iter()
            .filter(|item| item.status == ComplianceStatus::Variation)
            .count(),
        1
    );
}
