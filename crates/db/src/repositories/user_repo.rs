//! Repository for the `users` table.

use sqlx::PgExecutor;
use spinvault_core::status::UserStatus;
use spinvault_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, status, age_verified, \
                       self_excluded_until, ban_reason, created_at, updated_at";

/// Provides lookup and status operations for users. Users are never deleted.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new active user, returning the created row.
    ///
    /// A duplicate email fails with the `uq_users_email` unique violation.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, age_verified)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.age_verified)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Find a user by email (case-sensitive; callers lowercase first).
    pub async fn find_by_email(
        exec: impl PgExecutor<'_>,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(exec)
            .await
    }

    /// Set account status and ban reason. Returns `None` if the user is missing.
    pub async fn set_status(
        exec: impl PgExecutor<'_>,
        id: DbId,
        status: UserStatus,
        ban_reason: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET status = $2, ban_reason = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(ban_reason)
            .fetch_optional(exec)
            .await
    }

    pub async fn set_self_excluded_until(
        exec: impl PgExecutor<'_>,
        id: DbId,
        until: Timestamp,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET self_excluded_until = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(until)
            .fetch_optional(exec)
            .await
    }
}
