//! HTTP surface for the report workflow.
//!
//! Authentication is delegated to an external identity provider; the
//! gateway forwards the resolved identity in `x-user-id` / `x-user-role`
//! (and optionally `x-user-name`, `x-user-email`) headers, which this
//! router trusts.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::assignment::Department;
use super::domain::{Category, NewReport, ReportId, Role, Status, User, WardId};
use super::projection::ReportFilter;
use super::service::{ReportService, ReportServiceError};
use super::store::{ReportStore, StoreError};

/// Router builder exposing the report workflow endpoints.
pub fn report_router<S>(service: Arc<ReportService<S>>) -> Router
where
    S: ReportStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/reports",
            post(submit_handler::<S>).get(list_handler::<S>),
        )
        .route("/api/v1/reports/:report_id", get(detail_handler::<S>))
        .route(
            "/api/v1/reports/:report_id/comments",
            post(comment_handler::<S>),
        )
        .route(
            "/api/v1/reports/:report_id/status",
            post(status_handler::<S>),
        )
        .route(
            "/api/v1/reports/:report_id/assign",
            post(assign_handler::<S>),
        )
        .route(
            "/api/v1/reports/:report_id/quick-assign",
            post(quick_assign_handler::<S>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .route("/api/v1/notifications", get(notifications_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct ReportListQuery {
    #[serde(default)]
    pub ward: Option<u8>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl ReportListQuery {
    fn into_filter(self) -> ReportFilter {
        ReportFilter {
            ward: self.ward.map(WardId),
            category: self.category,
            status: self.status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommentRequest {
    message: String,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: Status,
}

#[derive(Debug, Deserialize)]
struct AssignRequest {
    department: Department,
}

fn caller_identity(headers: &HeaderMap) -> Result<User, Response> {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let unauthorized = |detail: &str| {
        let payload = json!({ "error": detail });
        (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
    };

    let id = header_value("x-user-id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| unauthorized("missing x-user-id header"))?;

    let role = match header_value("x-user-role").as_deref() {
        Some(raw) if raw.eq_ignore_ascii_case("admin") => Role::Admin,
        Some(raw) if raw.eq_ignore_ascii_case("citizen") => Role::Citizen,
        Some(_) => return Err(unauthorized("x-user-role must be 'citizen' or 'admin'")),
        None => return Err(unauthorized("missing x-user-role header")),
    };

    Ok(User {
        id,
        name: header_value("x-user-name").unwrap_or_else(|| "Anonymous".to_string()),
        email: header_value("x-user-email").unwrap_or_default(),
        role,
    })
}

fn error_response(error: ReportServiceError) -> Response {
    let status = match &error {
        ReportServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ReportServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReportServiceError::Lifecycle(_) => StatusCode::CONFLICT,
        ReportServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ReportServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

async fn submit_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    headers: HeaderMap,
    axum::Json(new_report): axum::Json<NewReport>,
) -> Response
where
    S: ReportStore + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.submit(&user, new_report) {
        Ok(report) => (StatusCode::CREATED, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn list_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    Query(query): Query<ReportListQuery>,
    headers: HeaderMap,
) -> Response
where
    S: ReportStore + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.visible_reports(&user, &query.into_filter()) {
        Ok(reports) => (StatusCode::OK, axum::Json(reports)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn detail_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    Path(report_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: ReportStore + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.get(&user, &ReportId(report_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn comment_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    Path(report_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<CommentRequest>,
) -> Response
where
    S: ReportStore + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.add_comment(&user, &ReportId(report_id), &request.message) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn status_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    Path(report_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    S: ReportStore + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.transition_status(&user, &ReportId(report_id), request.status) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn assign_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    Path(report_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<AssignRequest>,
) -> Response
where
    S: ReportStore + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.assign(&user, &ReportId(report_id), request.department) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn quick_assign_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    Path(report_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: ReportStore + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.quick_assign(&user, &ReportId(report_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn dashboard_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    Query(query): Query<ReportListQuery>,
    headers: HeaderMap,
) -> Response
where
    S: ReportStore + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.dashboard(&user, &query.into_filter()) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Reading the signal as an administrator acknowledges it: the response
/// carries the pre-read state and the latch clears until the next
/// qualifying event.
async fn notifications_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: ReportStore + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let active = service.notifications_active();
    if user.role == Role::Admin {
        if let Err(error) = service.acknowledge_notifications(&user) {
            return error_response(error);
        }
    }

    let payload = json!({ "active": active });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
