use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::user::User;

use super::is_unique_violation;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
    #[error("Email already registered")]
    EmailTaken,
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub async fn new() -> Result<Self, UserError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Create an account holder for a company. The signup handler checks
    /// for an existing email first; the unique index covers the race.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        company_id: Uuid,
    ) -> Result<User, UserError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, company_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(UserError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }
}
