use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant. The slug is derived from the name at signup and never changes;
/// it is the public careers page URL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub branding: Json<Branding>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Branding sub-document, stored as JSONB and replaced wholesale by the
/// branding update endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_banner_pattern: Option<String>,
    /// Legacy singular field, kept as the fallback for video layouts that
    /// have no section-level video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture_video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub company_videos: Vec<CompanyVideo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyVideo {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Branding {
    /// True when `url` is one of the registered company videos, the legacy
    /// culture video included.
    pub fn has_video_url(&self, url: &str) -> bool {
        self.company_videos.iter().any(|v| v.url == url)
            || self.culture_video_url.as_deref() == Some(url)
    }
}
