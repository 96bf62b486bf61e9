use serde::Deserialize;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::job::Job;

/// Incoming job posting for the seed endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub work_policy: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    pub job_slug: String,
    #[serde(default)]
    pub posted_days_ago: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "open".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
}

pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub async fn new() -> Result<Self, JobError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Job>, JobError> {
        Ok(
            sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Open postings, what careers pages display.
    pub async fn list_open(&self) -> Result<Vec<Job>, JobError> {
        Ok(sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE status = 'open' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Destructive seed: replaces the whole jobs table. Demo tooling.
    pub async fn seed(&self, jobs: Vec<NewJob>) -> Result<usize, JobError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM jobs").execute(&mut *tx).await?;

        for job in &jobs {
            sqlx::query(
                r#"
                INSERT INTO jobs (
                    title, work_policy, location, department, employment_type,
                    experience_level, job_type, salary_range, job_slug,
                    posted_days_ago, status
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(&job.title)
            .bind(&job.work_policy)
            .bind(&job.location)
            .bind(&job.department)
            .bind(&job.employment_type)
            .bind(&job.experience_level)
            .bind(&job.job_type)
            .bind(&job.salary_range)
            .bind(&job.job_slug)
            .bind(&job.posted_days_ago)
            .bind(&job.status)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(jobs.len())
    }
}
