use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::job_dto::{JobListQuery, JobPageResponse, JobPayload, JobResponse},
    error::{Error, Result},
    middleware::auth::CallerId,
    services::job_service::JobPage,
    AppState,
};

/// Ids that are not UUIDs cannot name any job.
fn parse_job_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn job_not_found(raw: &str) -> Error {
    Error::NotFound(format!("Job {} not found", raw))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = JobPayload,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Invalid or malformed payload"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    caller: CallerId,
    payload: std::result::Result<Json<JobPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    let job = state
        .job_service
        .create_job(caller.as_str(), payload)
        .await
        .ok_or_else(|| Error::BadRequest("Job could not be created".into()))?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on position or company"),
        ("status" = Option<String>, Query, description = "Job status, or `all`"),
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Page of jobs", body = JobPageResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    caller: CallerId,
    query: std::result::Result<Query<JobListQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let page = match query {
        Ok(Query(query)) => state.job_service.list_jobs(caller.as_str(), query).await,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "unreadable job list query");
            JobPage::empty()
        }
    };
    Ok(Json(JobPageResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = JobResponse),
        (status = 404, description = "Job not found"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    caller: CallerId,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_job_id(&raw_id).ok_or_else(|| job_not_found(&raw_id))?;
    let job = state.job_service.get_job(caller.as_str(), id).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = JobPayload,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 400, description = "Invalid payload or unknown job"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    caller: CallerId,
    Path(raw_id): Path<String>,
    payload: std::result::Result<Json<JobPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    let updated = match parse_job_id(&raw_id) {
        Some(id) => state.job_service.update_job(caller.as_str(), id, payload).await,
        None => None,
    };
    let job = updated.ok_or_else(|| Error::BadRequest("Job could not be updated".into()))?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Deleted job", body = JobResponse),
        (status = 404, description = "Job not found"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    caller: CallerId,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_job_id(&raw_id).ok_or_else(|| job_not_found(&raw_id))?;
    let job = state
        .job_service
        .delete_job(caller.as_str(), id)
        .await
        .ok_or_else(|| job_not_found(&raw_id))?;
    Ok(Json(JobResponse::from(job)))
}
