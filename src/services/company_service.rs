use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::company::{Branding, Company};

use super::is_unique_violation;

#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
    #[error("Company not found")]
    NotFound,
    #[error("Slug already taken: {0}")]
    SlugTaken(String),
}

/// Tenant directory: maps company identity to a unique slug and owns the
/// branding/publish fields. Everything tenant-scoped elsewhere resolves its
/// company through here.
pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub async fn new() -> Result<Self, CompanyError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Create a company at signup. The slug is derived from the name once
    /// and never changes. Collisions are not retried: the unique index
    /// reports a second company with the same name as `SlugTaken`.
    pub async fn create(&self, name: &str) -> Result<Company, CompanyError> {
        let slug = slugify(name);

        let result = sqlx::query_as::<_, Company>(
            "INSERT INTO companies (name, slug) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(&slug)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(company) => Ok(company),
            Err(e) if is_unique_violation(&e) => Err(CompanyError::SlugTaken(slug)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, CompanyError> {
        Ok(
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Slug lookup for the public page. Unpublished companies are invisible
    /// here, indistinguishable from nonexistent ones.
    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Company>, CompanyError> {
        Ok(sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE slug = $1 AND published = true",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Replace the whole branding document (the editor always sends the
    /// full form state).
    pub async fn update_branding(
        &self,
        company_id: Uuid,
        branding: &Branding,
    ) -> Result<Company, CompanyError> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET branding = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(company_id)
        .bind(sqlx::types::Json(branding))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CompanyError::NotFound)
    }

    pub async fn set_published(
        &self,
        company_id: Uuid,
        published: bool,
    ) -> Result<Company, CompanyError> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET published = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(company_id)
        .bind(published)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CompanyError::NotFound)
    }
}

/// Lowercase the name and join alphanumeric runs with '-':
/// "Acme Corp!" -> "acme-corp".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_joins_word_runs() {
        assert_eq!(slugify("Acme Corp"), "acme-corp");
        assert_eq!(slugify("  Hello --- World  "), "hello-world");
        assert_eq!(slugify("ACME"), "acme");
    }

    #[test]
    fn slugify_drops_punctuation() {
        assert_eq!(slugify("O'Neill & Sons, Ltd."), "o-neill-sons-ltd");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_is_deterministic() {
        // Two companies with the same name collide by design; the unique
        // index is what surfaces it.
        assert_eq!(slugify("Same Name"), slugify("Same Name"));
    }
}
