use axum::{extract::Path, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::services::{CompanyService, JobService, SectionService};

/// GET /:slug/careers - Public careers page payload
///
/// Unknown slug and unpublished page are the same 404: whether a company
/// exists is not revealed until it publishes.
pub async fn careers_page(Path(company_slug): Path<String>) -> Result<Json<Value>, ApiError> {
    let company = CompanyService::new()
        .await?
        .find_published_by_slug(&company_slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found"))?;

    let sections = SectionService::new().await?.list_visible(company.id).await?;
    let jobs = JobService::new().await?.list_open().await?;

    Ok(Json(json!({
        "company": company,
        "sections": sections,
        "jobs": jobs
    })))
}
