//! # User Repository
//!
//! Identity resolution: external auth subjects map to internal user rows.
//! Authentication itself happens outside the core; this repository only
//! answers "which user is this subject" and "does this user exist".

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use pantry_core::User;

/// Repository for user records.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user record.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, subject = %user.subject, "inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, subject, display_name, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&user.id)
        .bind(&user.subject)
        .bind(&user.display_name)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a user by internal id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, subject, display_name, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Resolves an external auth subject to a user, if one exists.
    pub async fn resolve_subject(&self, subject: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, subject, display_name, created_at
            FROM users
            WHERE subject = ?1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a user id exists.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = ?1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(found != 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
