use axum::Json;
use utoipa::OpenApi;

use crate::dto::job_dto::{JobPageResponse, JobPayload, JobResponse};
use crate::models::job::{JobStats, JobStatus, MonthlyApplications};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::jobs::create_job,
        crate::routes::jobs::list_jobs,
        crate::routes::jobs::get_job,
        crate::routes::jobs::update_job,
        crate::routes::jobs::delete_job,
        crate::routes::stats::get_stats,
        crate::routes::stats::get_chart_data,
    ),
    components(schemas(
        JobPayload,
        JobResponse,
        JobPageResponse,
        JobStatus,
        JobStats,
        MonthlyApplications
    )),
    info(title = "Jobify API", description = "Job application tracking")
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/jobs",
            "/api/jobs/{id}",
            "/api/stats",
            "/api/stats/chart",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
