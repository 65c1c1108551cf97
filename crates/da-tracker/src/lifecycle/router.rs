use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::checklist::DocumentChecklist;
use super::dashboard::ProjectDashboard;
use super::domain::{
    ComplianceItem, Condition, ConditionPatch, ConditionStatus, NewRfi, ProjectId, RfiPatch,
    UploadReceipt,
};
use super::project::ProjectPatch;
use super::store::{ProjectStore, StoreError};

/// The single store instance shared by every request handler.
pub type SharedProjectStore = Arc<Mutex<ProjectStore>>;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateProjectRequest {
    pub(crate) address: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) with_checklist: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectProjectRequest {
    #[serde(default)]
    pub(crate) project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdvanceDaysRequest {
    pub(crate) days: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RevertConditionRequest {
    pub(crate) status: ConditionStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LodgementRequest {
    pub(crate) reference: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AdvanceStageRequest {
    #[serde(default)]
    pub(crate) on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

/// Router builder exposing the project store over HTTP.
pub fn project_router(store: SharedProjectStore) -> Router {
    Router::new()
        .route(
            "/api/v1/projects",
            get(list_handler).post(create_handler),
        )
        .route("/api/v1/projects/demo", post(demo_handler))
        .route("/api/v1/projects/selection", put(select_handler))
        .route(
            "/api/v1/projects/active",
            get(active_handler).patch(update_project_handler),
        )
        .route("/api/v1/projects/active/days", post(advance_days_handler))
        .route("/api/v1/projects/active/dashboard", get(dashboard_handler))
        .route(
            "/api/v1/projects/active/conditions",
            post(add_condition_handler),
        )
        .route(
            "/api/v1/projects/active/conditions/:condition_id",
            patch(update_condition_handler),
        )
        .route(
            "/api/v1/projects/active/conditions/:condition_id/revert",
            post(revert_condition_handler),
        )
        .route(
            "/api/v1/projects/active/acceptance",
            post(accept_conditions_handler),
        )
        .route("/api/v1/projects/active/rfis", post(issue_rfi_handler))
        .route(
            "/api/v1/projects/active/rfis/:rfi_id",
            patch(update_rfi_handler),
        )
        .route(
            "/api/v1/projects/active/documents/:document_id/uploads",
            post(record_upload_handler),
        )
        .route(
            "/api/v1/projects/active/compliance-items",
            post(record_compliance_handler),
        )
        .route(
            "/api/v1/projects/active/lodgement",
            post(record_lodgement_handler),
        )
        .route("/api/v1/projects/active/advance", post(advance_stage_handler))
        .with_state(store)
}

pub(crate) async fn list_handler(State(store): State<SharedProjectStore>) -> Response {
    respond(&store, StatusCode::OK, |store| Ok(store.list()))
}

pub(crate) async fn create_handler(
    State(store): State<SharedProjectStore>,
    Json(request): Json<CreateProjectRequest>,
) -> Response {
    respond(&store, StatusCode::CREATED, |store| {
        let project = if request.with_checklist {
            store.create_project_with_checklist(
                &request.address,
                &request.name,
                &DocumentChecklist::standard(),
            )
        } else {
            store.create_project(&request.address, &request.name)
        };
        Ok(project.clone())
    })
}

pub(crate) async fn demo_handler(State(store): State<SharedProjectStore>) -> Response {
    respond(&store, StatusCode::OK, |store| {
        Ok(store.load_demo_project().clone())
    })
}

pub(crate) async fn select_handler(
    State(store): State<SharedProjectStore>,
    Json(request): Json<SelectProjectRequest>,
) -> Response {
    respond(&store, StatusCode::OK, |store| {
        let id = request.project_id.map(ProjectId);
        store.select_project(id.as_ref())?;
        Ok(json!({ "active_project_id": store.active_id() }))
    })
}

pub(crate) async fn active_handler(State(store): State<SharedProjectStore>) -> Response {
    respond(&store, StatusCode::OK, |store| store.active().cloned())
}

pub(crate) async fn update_project_handler(
    State(store): State<SharedProjectStore>,
    Json(patch): Json<ProjectPatch>,
) -> Response {
    respond(&store, StatusCode::OK, |store| {
        store.update_project(patch).cloned()
    })
}

pub(crate) async fn advance_days_handler(
    State(store): State<SharedProjectStore>,
    Json(request): Json<AdvanceDaysRequest>,
) -> Response {
    respond(&store, StatusCode::OK, |store| {
        store.advance_days(request.days).cloned()
    })
}

pub(crate) async fn dashboard_handler(
    State(store): State<SharedProjectStore>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    respond(&store, StatusCode::OK, |store| {
        let project = store.active()?;
        Ok(ProjectDashboard::build(project, store.policy(), today))
    })
}

pub(crate) async fn add_condition_handler(
    State(store): State<SharedProjectStore>,
    Json(condition): Json<Condition>,
) -> Response {
    respond(&store, StatusCode::OK, |store| {
        store.add_condition(condition).cloned()
    })
}

pub(crate) async fn update_condition_handler(
    State(store): State<SharedProjectStore>,
    Path(condition_id): Path<String>,
    Json(patch): Json<ConditionPatch>,
) -> Response {
    respond(&store, StatusCode::OK, |store| {
        store.update_condition(&condition_id, patch).cloned()
    })
}

pub(crate) async fn revert_condition_handler(
    State(store): State<SharedProjectStore>,
    Path(condition_id): Path<String>,
    Json(request): Json<RevertConditionRequest>,
) -> Response {
    respond(&store, StatusCode::OK, |store| {
        store
            .revert_condition(&condition_id, request.status)
            .cloned()
    })
}

pub(crate) async fn accept_conditions_handler(State(store): State<SharedProjectStore>) -> Response {
    respond(&store, StatusCode::OK, |store| {
        store.accept_conditions().cloned()
    })
}

pub(crate) async fn issue_rfi_handler(
    State(store): State<SharedProjectStore>,
    Json(rfi): Json<NewRfi>,
) -> Response {
    respond(&store, StatusCode::CREATED, |store| {
        store.issue_rfi(rfi).cloned()
    })
}

pub(crate) async fn update_rfi_handler(
    State(store): State<SharedProjectStore>,
    Path(rfi_id): Path<String>,
    Json(patch): Json<RfiPatch>,
) -> Response {
    respond(&store, StatusCode::OK, |store| {
        store.update_rfi(&rfi_id, patch).cloned()
    })
}

pub(crate) async fn record_upload_handler(
    State(store): State<SharedProjectStore>,
    Path(document_id): Path<String>,
    Json(receipt): Json<UploadReceipt>,
) -> Response {
    respond(&store, StatusCode::OK, |store| {
        store.record_document_upload(&document_id, receipt).cloned()
    })
}

pub(crate) async fn record_compliance_handler(
    State(store): State<SharedProjectStore>,
    Json(items): Json<Vec<ComplianceItem>>,
) -> Response {
    respond(&store, StatusCode::OK, |store| {
        store.record_compliance_items(items).cloned()
    })
}

pub(crate) async fn record_lodgement_handler(
    State(store): State<SharedProjectStore>,
    Json(request): Json<LodgementRequest>,
) -> Response {
    respond(&store, StatusCode::OK, |store| {
        store.record_lodgement(&request.reference).cloned()
    })
}

pub(crate) async fn advance_stage_handler(
    State(store): State<SharedProjectStore>,
    Json(request): Json<AdvanceStageRequest>,
) -> Response {
    let on = request.on.unwrap_or_else(|| Local::now().date_naive());
    respond(&store, StatusCode::OK, |store| {
        store.advance_stage(on).cloned()
    })
}

fn respond<T, F>(store: &SharedProjectStore, success: StatusCode, operation: F) -> Response
where
    T: Serialize,
    F: FnOnce(&mut ProjectStore) -> Result<T, StoreError>,
{
    let mut guard = match store.lock() {
        Ok(guard) => guard,
        Err(_) => {
            let payload = json!({ "error": "project store unavailable" });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    match operation(&mut *guard) {
        Ok(body) => (success, Json(body)).into_response(),
        Err(err) => store_error_response(err),
    }
}

pub(crate) fn store_error_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NoActiveProject | StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::PreconditionFailed(_) => StatusCode::CONFLICT,
        StoreError::InvalidPatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

pub(crate) fn store_error_response(err: StoreError) -> Response {
    let status = store_error_status(&err);
    let payload = match &err {
        StoreError::PreconditionFailed(precondition) => json!({
            "error": err.to_string(),
            "precondition": precondition,
        }),
        StoreError::InvalidPatch { field, .. } => json!({
            "error": err.to_string(),
            "field": field,
        }),
        _ => json!({ "error": err.to_string() }),
    };
    (status, Json(payload)).into_response()
}
