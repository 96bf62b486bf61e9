use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::company::Branding;
use crate::database::models::section::Section;
use crate::layout::Layout;

/// Fields accepted when creating a section. `order` and `visible` are not
/// client-settable on create: new sections append and start visible.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSection {
    #[serde(rename = "type")]
    pub section_type: String,
    pub content: String,
    pub image: String,
    pub layout: Layout,
    pub video_url: String,
}

/// Partial update; `None` leaves a field untouched. `order` is not
/// representable here; only the reorder operation rewrites order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionPatch {
    #[serde(rename = "type")]
    pub section_type: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub layout: Option<Layout>,
    pub video_url: Option<String>,
    pub visible: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
    #[error("{0}")]
    Validation(String),
    #[error("Section not found")]
    NotFound,
}

/// Persistence for a tenant's ordered content blocks.
///
/// Every query carries the company id in its predicate, so a section id
/// from another tenant behaves exactly like a missing id. None of the
/// methods accept a section id without the owning company id.
pub struct SectionService {
    pool: PgPool,
}

impl SectionService {
    pub async fn new() -> Result<Self, SectionError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Create a section at the end of the tenant's sequence.
    ///
    /// The rank read and the insert run in one statement inside a
    /// transaction holding a per-tenant advisory lock, so concurrent
    /// creates cannot observe the same count and collide on `"order"`.
    pub async fn create(
        &self,
        company_id: Uuid,
        new: NewSection,
        branding: &Branding,
    ) -> Result<Section, SectionError> {
        if new.section_type.trim().is_empty() {
            return Err(SectionError::Validation("type is required".into()));
        }
        if new.content.trim().is_empty() {
            return Err(SectionError::Validation("content is required".into()));
        }
        validate_video_reference(new.layout, &new.video_url, branding)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(company_id)
            .execute(&mut *tx)
            .await?;

        let section = sqlx::query_as::<_, Section>(
            r#"
            INSERT INTO sections (company_id, "type", content, image, layout, video_url, "order")
            SELECT $1, $2, $3, $4, $5, $6, (COUNT(*) + 1)::int
            FROM sections
            WHERE company_id = $1
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&new.section_type)
        .bind(&new.content)
        .bind(&new.image)
        .bind(new.layout)
        .bind(&new.video_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(section)
    }

    /// All sections for the tenant, hidden included, in display order.
    /// This is the admin view.
    pub async fn list(&self, company_id: Uuid) -> Result<Vec<Section>, SectionError> {
        Ok(sqlx::query_as::<_, Section>(
            r#"SELECT * FROM sections WHERE company_id = $1 ORDER BY "order" ASC"#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Visible sections only, same order. This is what the public page
    /// consumes; hidden sections keep their slot without appearing.
    pub async fn list_visible(&self, company_id: Uuid) -> Result<Vec<Section>, SectionError> {
        Ok(sqlx::query_as::<_, Section>(
            r#"SELECT * FROM sections WHERE company_id = $1 AND visible = true ORDER BY "order" ASC"#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Partial update. A section id owned by another tenant is `NotFound`,
    /// same as a missing one.
    pub async fn update(
        &self,
        company_id: Uuid,
        section_id: Uuid,
        patch: SectionPatch,
        branding: &Branding,
    ) -> Result<Section, SectionError> {
        // The video constraint applies to the merged result, so the current
        // row is needed before writing. Both reads carry the tenant filter.
        let current = sqlx::query_as::<_, Section>(
            "SELECT * FROM sections WHERE id = $1 AND company_id = $2",
        )
        .bind(section_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SectionError::NotFound)?;

        let layout = patch.layout.unwrap_or(current.layout);
        let video_url = patch.video_url.as_deref().unwrap_or(&current.video_url);
        validate_video_reference(layout, video_url, branding)?;

        sqlx::query_as::<_, Section>(
            r#"
            UPDATE sections SET
                "type"     = COALESCE($3, "type"),
                content    = COALESCE($4, content),
                image      = COALESCE($5, image),
                layout     = COALESCE($6, layout),
                video_url  = COALESCE($7, video_url),
                visible    = COALESCE($8, visible),
                updated_at = now()
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(section_id)
        .bind(company_id)
        .bind(patch.section_type)
        .bind(patch.content)
        .bind(patch.image)
        .bind(patch.layout)
        .bind(patch.video_url)
        .bind(patch.visible)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SectionError::NotFound)
    }

    /// Tenant-scoped and quiet: deleting a foreign or missing id is a
    /// no-op. Remaining sections keep their order values; gaps are allowed.
    pub async fn delete(&self, company_id: Uuid, section_id: Uuid) -> Result<(), SectionError> {
        sqlx::query("DELETE FROM sections WHERE id = $1 AND company_id = $2")
            .bind(section_id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Apply a client-declared total order: each listed section's `"order"`
    /// becomes its 1-based position in `ordered_ids`.
    ///
    /// The input is not checked to be a permutation of the tenant's section
    /// set. Every write carries the tenant filter, so foreign ids silently
    /// no-op instead of touching another tenant's rows. The batch commits
    /// as one transaction.
    pub async fn reorder(&self, company_id: Uuid, ordered_ids: &[Uuid]) -> Result<(), SectionError> {
        let mut tx = self.pool.begin().await?;

        for (id, order) in order_assignments(ordered_ids) {
            sqlx::query(
                r#"UPDATE sections SET "order" = $3, updated_at = now() WHERE id = $1 AND company_id = $2"#,
            )
            .bind(id)
            .bind(company_id)
            .bind(order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// 1-based order value for each id in the declared sequence.
fn order_assignments(ordered_ids: &[Uuid]) -> impl Iterator<Item = (Uuid, i32)> + '_ {
    ordered_ids
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index as i32 + 1))
}

/// Video layouts must point at one of the tenant's registered videos when
/// they carry a URL at all. An empty URL is allowed: rendering falls back
/// to the company-wide culture video, or disables the preview.
fn validate_video_reference(
    layout: Layout,
    video_url: &str,
    branding: &Branding,
) -> Result<(), SectionError> {
    if layout.is_video() && !video_url.is_empty() && !branding.has_video_url(video_url) {
        return Err(SectionError::Validation(
            "videoUrl must reference one of the company's videos".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::company::CompanyVideo;

    #[test]
    fn order_assignments_are_one_based_positions() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let assigned: Vec<(Uuid, i32)> = order_assignments(&ids).collect();

        assert_eq!(assigned, vec![(ids[0], 1), (ids[1], 2), (ids[2], 3)]);
    }

    #[test]
    fn order_assignments_are_idempotent() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let first: Vec<_> = order_assignments(&ids).collect();
        let second: Vec<_> = order_assignments(&ids).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn order_assignments_define_order_rather_than_validate_it() {
        // Swapping [a, b] to [b, a] gives b rank 1 and a rank 2, regardless
        // of what ranks they held before.
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let assigned: Vec<_> = order_assignments(&[b, a]).collect();

        assert_eq!(assigned, vec![(b, 1), (a, 2)]);
    }

    #[test]
    fn empty_reorder_assigns_nothing() {
        assert_eq!(order_assignments(&[]).count(), 0);
    }

    fn branding_with_video(url: &str) -> Branding {
        Branding {
            company_videos: vec![CompanyVideo {
                url: url.to_string(),
                title: None,
            }],
            ..Branding::default()
        }
    }

    #[test]
    fn video_layout_accepts_registered_video() {
        let branding = branding_with_video("https://youtu.be/dQw4w9WgXcQ");
        assert!(validate_video_reference(
            Layout::VideoBg,
            "https://youtu.be/dQw4w9WgXcQ",
            &branding
        )
        .is_ok());
    }

    #[test]
    fn video_layout_rejects_unregistered_video() {
        let branding = branding_with_video("https://youtu.be/dQw4w9WgXcQ");
        let result =
            validate_video_reference(Layout::VideoSplitLeft, "https://vimeo.com/1", &branding);

        assert!(matches!(result, Err(SectionError::Validation(_))));
    }

    #[test]
    fn video_layout_allows_empty_url() {
        // Empty means "fall back to the culture video at render time"
        assert!(validate_video_reference(Layout::VideoBg, "", &Branding::default()).is_ok());
    }

    #[test]
    fn non_video_layouts_ignore_the_url() {
        assert!(validate_video_reference(
            Layout::ImageLeft,
            "https://anything.example.com/x.mp4",
            &Branding::default()
        )
        .is_ok());
    }
}
