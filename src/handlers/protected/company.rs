use axum::{extract::Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::company::{Branding, Company};
use crate::error::ApiError;
use crate::middleware::AuthSession;
use crate::services::{CompanyService, JobService, SectionService};

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}

/// GET /api/company/me - The authenticated tenant's company document
pub async fn me(Extension(session): Extension<AuthSession>) -> Result<Json<Company>, ApiError> {
    CompanyService::new()
        .await?
        .find_by_id(session.company_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Company not found"))
}

/// PUT /api/company/branding - Replace the branding document
pub async fn update_branding(
    Extension(session): Extension<AuthSession>,
    Json(branding): Json<Branding>,
) -> Result<Json<Company>, ApiError> {
    Ok(Json(
        CompanyService::new()
            .await?
            .update_branding(session.company_id, &branding)
            .await?,
    ))
}

/// PUT /api/company/publish - Gate the public careers page
pub async fn publish(
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<PublishRequest>,
) -> Result<Json<Value>, ApiError> {
    let company = CompanyService::new()
        .await?
        .set_published(session.company_id, payload.published)
        .await?;

    let message = if payload.published {
        "Careers page published"
    } else {
        "Careers page unpublished"
    };

    Ok(Json(json!({ "message": message, "company": company })))
}

/// GET /api/company/preview - What the public page will render, whether or
/// not it is published yet
pub async fn preview(Extension(session): Extension<AuthSession>) -> Result<Json<Value>, ApiError> {
    let company = CompanyService::new()
        .await?
        .find_by_id(session.company_id)
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
