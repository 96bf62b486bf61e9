use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting. Not tenant-linked: postings are global and filtered only
/// by status, matching the platform's current architecture.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub work_policy: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub job_type: Option<String>,
    pub salary_range: Option<String>,
    pub job_slug: String,
    pub posted_days_ago: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
