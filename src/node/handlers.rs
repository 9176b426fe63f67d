//! Client API Handlers
//!
//! Axum handlers mapping the HTTP surface onto [`NodeService`], plus the
//! router that wires them up.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
};

use super::protocol::{
    AckResponse, CountResponse, CreateRecordResponse, CreateStudentRequest, CreateTeacherRequest,
    EditRecordRequest, ENDPOINT_CREATE_STUDENT, ENDPOINT_CREATE_TEACHER, ENDPOINT_EDIT_RECORD,
    ENDPOINT_RECORD_COUNT, ENDPOINT_RECORDS, ENDPOINT_TRANSFER_RECORD, KindResponse, ManagerQuery,
    TransferRecordRequest,
};
use super::service::NodeService;

pub async fn handle_create_teacher(
    Extension(service): Extension<Arc<NodeService>>,
    Json(req): Json<CreateTeacherRequest>,
) -> (StatusCode, Json<CreateRecordResponse>) {
    match service
        .create_teacher_record(
            &req.manager_id,
            &req.first_name,
            &req.last_name,
            &req.address,
            &req.phone,
            &req.specialization,
            &req.location,
        )
        .await
    {
        Ok(id) => (
            StatusCode::OK,
            Json(CreateRecordResponse {
                record_id: Some(id.to_string()),
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to create teacher record: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(CreateRecordResponse { record_id: None }),
            )
        }
    }
}

pub async fn handle_create_student(
    Extension(service): Extension<Arc<NodeService>>,
    Json(req): Json<CreateStudentRequest>,
) -> (StatusCode, Json<CreateRecordResponse>) {
    match service
        .create_student_record(
            &req.manager_id,
            &req.first_name,
            &req.last_name,
            &req.courses_registered,
            &req.status,
        )
        .await
    {
        Ok(id) => (
            StatusCode::OK,
            Json(CreateRecordResponse {
                record_id: Some(id.to_string()),
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to create student record: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(CreateRecordResponse { record_id: None }),
            )
        }
    }
}

pub async fn handle_edit_record(
    Extension(service): Extension<Arc<NodeService>>,
    Json(req): Json<EditRecordRequest>,
) -> (StatusCode, Json<AckResponse>) {
    let success = service
        .edit_record(&req.manager_id, &req.record_id, &req.field_name, &req.new_value)
        .await;
    (StatusCode::OK, Json(AckResponse { success }))
}

pub async fn handle_transfer_record(
    Extension(service): Extension<Arc<NodeService>>,
    Json(req): Json<TransferRecordRequest>,
) -> (StatusCode, Json<AckResponse>) {
    let success = service
        .transfer_record(&req.manager_id, &req.record_id, &req.destination)
        .await;
    (StatusCode::OK, Json(AckResponse { success }))
}

pub async fn handle_record_count(
    Extension(service): Extension<Arc<NodeService>>,
    Query(query): Query<ManagerQuery>,
) -> (StatusCode, Json<CountResponse>) {
    let manager = query.manager.unwrap_or_default();
    let report = service.get_record_counts(&manager).await;
    (StatusCode::OK, Json(CountResponse { report }))
}

pub async fn handle_record_kind(
    Extension(service): Extension<Arc<NodeService>>,
    Path(record_id): Path<String>,
) -> (StatusCode, Json<KindResponse>) {
    let kind = service.record_kind(&record_id).to_string();
    (StatusCode::OK, Json(KindResponse { kind }))
}

pub async fn handle_print_all(Extension(service): Extension<Arc<NodeService>>) -> String {
    service.print_all_records().await
}

pub async fn handle_print_record(
    Extension(service): Extension<Arc<NodeService>>,
    Path(record_id): Path<String>,
    Query(query): Query<ManagerQuery>,
) -> String {
    let manager = query.manager.unwrap_or_default();
    service.print_record(&manager, &record_id).await
}

/// Builds the node's HTTP router with the service injected as an extension.
pub fn router(service: Arc<NodeService>) -> Router {
    Router::new()
        .route(ENDPOINT_CREATE_TEACHER, post(handle_create_teacher))
        .route(ENDPOINT_CREATE_STUDENT, post(handle_create_student))
        .route(ENDPOINT_EDIT_RECORD, post(handle_edit_record))
        .route(ENDPOINT_TRANSFER_RECORD, post(handle_transfer_record))
        .route(ENDPOINT_RECORD_COUNT, get(handle_record_count))
        .route("/records/kind/:record_id", get(handle_record_kind))
        .route(ENDPOINT_RECORDS, get(handle_print_all))
        .route("/records/:record_id", get(handle_print_record))
        .layer(Extension(service))
}
