//! Repository for the `probability_versions` table.

use sqlx::PgExecutor;
use spinvault_core::status::VersionStatus;
use spinvault_core::types::{DbId, Timestamp};

use crate::models::probability::ProbabilityVersion;

const COLUMNS: &str = "id, machine_id, version_number, notes, status, published_at, created_at";

/// Provides version-management operations for probability tables.
pub struct ProbabilityVersionRepo;

impl ProbabilityVersionRepo {
    /// Next version number for a machine (max existing + 1, or 1 if none).
    ///
    /// Only race-free while the caller holds the machine row lock.
    pub async fn next_version_number(
        exec: impl PgExecutor<'_>,
        machine_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version_number), 0) + 1 \
             FROM probability_versions WHERE machine_id = $1",
        )
        .bind(machine_id)
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }

    /// Insert a `DRAFT` version.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        machine_id: DbId,
        version_number: i32,
        notes: Option<&str>,
    ) -> Result<ProbabilityVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO probability_versions (machine_id, version_number, notes, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProbabilityVersion>(&query)
            .bind(machine_id)
            .bind(version_number)
            .bind(notes)
            .bind(VersionStatus::Draft.as_str())
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<ProbabilityVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM probability_versions WHERE id = $1");
        sqlx::query_as::<_, ProbabilityVersion>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// All versions of a machine, newest first.
    pub async fn list_by_machine(
        exec: impl PgExecutor<'_>,
        machine_id: DbId,
    ) -> Result<Vec<ProbabilityVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM probability_versions
             WHERE machine_id = $1
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, ProbabilityVersion>(&query)
            .bind(machine_id)
            .fetch_all(exec)
            .await
    }

    /// Archive every published version of the machine other than `keep_id`.
    pub async fn archive_published(
        exec: impl PgExecutor<'_>,
        machine_id: DbId,
        keep_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE probability_versions SET status = $3, updated_at = NOW() \
             WHERE machine_id = $1 AND status = $4 AND id <> $2",
        )
        .bind(machine_id)
        .bind(keep_id)
        .bind(VersionStatus::Archived.as_str())
        .bind(VersionStatus::Published.as_str())
        .execute(exec)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn mark_published(
        exec: impl PgExecutor<'_>,
        id: DbId,
        at: Timestamp,
    ) -> Result<ProbabilityVersion, sqlx::Error> {
        let query = format!(
            "UPDATE probability_versions SET status = $2, published_at = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProbabilityVersion>(&query)
            .bind(id)
            .bind(VersionStatus::Published.as_str())
            .bind(at)
            .fetch_one(exec)
            .await
    }

    /// Count of published versions for a machine.
    pub async fn count_published(
        exec: impl PgExecutor<'_>,
        machine_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM probability_versions WHERE machine_id = $1 AND status = $2",
        )
        .bind(machine_id)
        .bind(VersionStatus::Published.as_str())
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }
}
