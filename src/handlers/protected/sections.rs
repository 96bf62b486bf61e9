use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::company::Company;
use crate::database::models::section::Section;
use crate::error::ApiError;
use crate::middleware::AuthSession;
use crate::services::section_service::{NewSection, SectionPatch};
use crate::services::{CompanyService, SectionService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub ordered_ids: Vec<Uuid>,
}

async fn own_company(session: &AuthSession) -> Result<Company, ApiError> {
    CompanyService::new()
        .await?
        .find_by_id(session.company_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found"))
}

/// POST /api/sections - Append a section to the tenant's page
pub async fn create(
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<NewSection>,
) -> Result<impl IntoResponse, ApiError> {
    let company = own_company(&session).await?;

    let section = SectionService::new()
        .await?
        .create(session.company_id, payload, &company.branding.0)
        .await?;

    Ok((StatusCode::CREATED, Json(section)))
}

/// GET /api/sections - All of the tenant's sections in display order,
/// hidden ones included. This is the editor's view.
pub async fn list(
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Vec<Section>>, ApiError> {
    Ok(Json(
        SectionService::new().await?.list(session.company_id).await?,
    ))
}

/// PUT /api/sections/reorder - Rewrite all order values from the given
/// id sequence
pub async fn reorder(
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<Value>, ApiError> {
    SectionService::new()
        .await?
        .reorder(session.company_id, &payload.ordered_ids)
        .await?;

    Ok(Json(json!({ "message": "Sections reordered" })))
}

/// PUT /api/sections/:id - Update any subset of a section's fields
pub async fn update(
    Extension(session): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SectionPatch>,
) -> Result<Json<Section>, ApiError> {
    let company = own_company(&session).await?;

    let section = SectionService::new()
        .await?
        .update(session.company_id, id, payload, &company.branding.0)
        .await?;

    Ok(Json(section))
}

/// DELETE /api/sections/:id - Remove a section; remaining order values
/// keep their gaps
pub async fn delete(
    Extension(session): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    SectionService::new()
        .await?
        .delete(session.company_id, id)
        .await?;

    Ok(Json(json!({ "message": "Section deleted" })))
}
