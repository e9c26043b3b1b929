pub mod docs;
pub mod health;
pub mod jobs;
pub mod stats;

use axum::{extract::DefaultBodyLimit, middleware::from_fn_with_state, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    auth::{require_bearer_auth, BearerAuth},
    rate_limit::{caller_rate_limit, CallerRateLimiter},
};
use crate::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Full HTTP surface. Everything under `/api` needs a bearer token and is
/// rate limited per caller.
pub fn build_router(state: AppState, auth: BearerAuth, limiter: CallerRateLimiter) -> Router {
    let api = Router::new()
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/api/jobs/:id",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route("/api/stats", get(stats::get_stats))
        .route("/api/stats/chart", get(stats::get_chart_data))
        .layer(from_fn_with_state(limiter, caller_rate_limit))
        .layer(from_fn_with_state(auth, require_bearer_auth));

    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .merge(api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
