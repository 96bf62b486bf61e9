use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::layout::Layout;

/// One ordered, visibility-togglable content block on a tenant's page.
///
/// `order` is 1-based and meaningful only relative to the other sections of
/// the same company. It is assigned on create and rewritten only by the
/// reorder operation; hidden sections keep their slot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: Uuid,
    pub company_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub section_type: String,
    pub content: String,
    pub image: String,
    pub layout: Layout,
    pub video_url: String,
    pub order: i32,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
