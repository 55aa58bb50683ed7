//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use spinvault_core::status::UserStatus;
use spinvault_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub status: String,
    pub age_verified: bool,
    pub self_excluded_until: Option<Timestamp>,
    pub ban_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parsed account status. The column is constrained, so an unknown
    /// literal only appears if the schema and this enum drift apart; treat it
    /// as not active.
    pub fn account_status(&self) -> Option<UserStatus> {
        UserStatus::parse(&self.status)
    }

    pub fn is_active(&self) -> bool {
        self.account_status() == Some(UserStatus::Active)
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub status: String,
    pub age_verified: bool,
    pub self_excluded_until: Option<Timestamp>,
    pub ban_reason: Option<String>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            status: u.status,
            age_verified: u.age_verified,
            self_excluded_until: u.self_excluded_until,
            ban_reason: u.ban_reason,
            created_at: u.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub age_verified: bool,
}
