use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::database::models::job::Job;
use crate::error::ApiError;
use crate::services::job_service::NewJob;
use crate::services::JobService;

/// GET /api/v1/jobs - All job postings
pub async fn list() -> Result<Json<Vec<Job>>, ApiError> {
    Ok(Json(JobService::new().await?.list().await?))
}

/// POST /api/v1/jobs/seed - Replace all job postings with the given set
pub async fn seed(Json(jobs): Json<Vec<NewJob>>) -> Result<impl IntoResponse, ApiError> {
    let count = JobService::new().await?.seed(jobs).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Jobs seeded successfully", "count": count })),
    ))
}
