use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    error::Result,
    middleware::auth::CallerId,
    models::job::{JobStats, MonthlyApplications},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Job counts per status", body = JobStats),
        (status = 500, description = "Stats unavailable"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn get_stats(
    State(state): State<AppState>,
    caller: CallerId,
) -> Result<impl IntoResponse> {
    let stats: JobStats = state.job_service.get_stats(caller.as_str()).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/stats/chart",
    responses(
        (status = 200, description = "Applications per month over the last six months", body = [MonthlyApplications]),
        (status = 500, description = "Chart data unavailable"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn get_chart_data(
    State(state): State<AppState>,
    caller: CallerId,
) -> Result<impl IntoResponse> {
    let chart: Vec<MonthlyApplications> =
        state.job_service.get_chart_data(caller.as_str()).await?;
    Ok(Json(chart))
}
