//! Repository for the `payments` table.

use sqlx::PgExecutor;
use spinvault_core::status::PaymentStatus;
use spinvault_core::types::DbId;

use crate::models::payment::{CreatePayment, Payment};

const COLUMNS: &str = "id, user_id, provider, package_id, order_id, amount_krw, point_granted, \
                       status, provider_payload, paid_at, created_at, updated_at";

pub struct PaymentRepo;

impl PaymentRepo {
    /// Insert a payment in `CREATED` status.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreatePayment,
    ) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments
                (user_id, provider, package_id, order_id, amount_krw, point_granted, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.user_id)
            .bind(&input.provider)
            .bind(input.package_id)
            .bind(&input.order_id)
            .bind(input.amount_krw)
            .bind(input.point_granted)
            .bind(PaymentStatus::Created.as_str())
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_order_id(
        exec: impl PgExecutor<'_>,
        order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE order_id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(order_id)
            .fetch_optional(exec)
            .await
    }

    /// Lock the payment row for `(provider, order_id)` so concurrent
    /// webhooks for the same order serialize.
    pub async fn lock_for_provider(
        exec: impl PgExecutor<'_>,
        provider: &str,
        order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE order_id = $1 AND provider = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(order_id)
            .bind(provider)
            .fetch_optional(exec)
            .await
    }

    /// Most recent payments first.
    pub async fn list_by_user(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE user_id = $1 ORDER BY id DESC LIMIT $2"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(exec)
            .await
    }

    /// Move a `CREATED` payment to a terminal status, storing the provider
    /// payload. `paid_at` is stamped only for `PAID`.
    ///
    /// Returns `None` if the payment is not in `CREATED` anymore.
    pub async fn transition(
        exec: impl PgExecutor<'_>,
        order_id: &str,
        status: PaymentStatus,
        payload: &serde_json::Value,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments SET
                status = $2,
                provider_payload = $3,
                paid_at = CASE WHEN $2::TEXT = 'PAID' THEN NOW() ELSE paid_at END,
                updated_at = NOW()
             WHERE order_id = $1 AND status = 'CREATED'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(order_id)
            .bind(status.as_str())
            .bind(payload)
            .fetch_optional(exec)
            .await
    }
}
