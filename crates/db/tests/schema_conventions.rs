//! Schema-level guarantees: key types, seed data and the constraints the
//! engine leans on.

use assert_matches::assert_matches;
use sqlx::PgPool;

/// Every surrogate `id` column is BIGINT.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_ids_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name::TEXT, data_type::TEXT
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seed_catalog_present(pool: PgPool) {
    spinvault_db::health_check(&pool).await.unwrap();

    for (table, expected) in [("shop_packages", 3i64), ("reward_catalog", 6), ("machines", 1)] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, expected, "{table} seed count");
    }

    let live: (Option<i64>,) =
        sqlx::query_as("SELECT probability_version_id FROM machines WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(live.0, Some(1));

    let tier_total: (i64,) = sqlx::query_as(
        "SELECT SUM(weight)::BIGINT FROM probability_tiers WHERE probability_version_id = 1",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(tier_total.0, 100);
}

/// Seeded pool rows take their rarity from the catalog and keep the
/// declared order.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seed_pool_order_and_rarity(pool: PgPool) {
    let rows: Vec<(i64, String, i64)> = sqlx::query_as(
        "SELECT reward_id, rarity, weight FROM reward_pool_items
         WHERE probability_version_id = 1 ORDER BY id",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    let ids: Vec<i64> = rows.iter().map(|r| r.0).collect();
    assert_eq!(ids, vec![4, 6, 5, 1, 3, 2]);
    assert_eq!(rows[0].1, "Common");
    assert_eq!(rows[5].1, "Legendary");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_published_version_rejected(pool: PgPool) {
    let err = sqlx::query(
        "INSERT INTO probability_versions (machine_id, version_number, status)
         VALUES (1, 2, 'PUBLISHED')",
    )
    .execute(&pool)
    .await
    .unwrap_err();

    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("uq_probability_versions_one_published")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_balance_rejected_by_check(pool: PgPool) {
    let user: (i64,) = sqlx::query_as(
        "INSERT INTO users (email, password_hash) VALUES ('c@example.com', 'x') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO wallets (user_id) VALUES ($1)")
        .bind(user.0)
        .execute(&pool)
        .await
        .unwrap();

    let err = sqlx::query("UPDATE wallets SET balance_point = -1 WHERE user_id = $1")
        .bind(user.0)
        .execute(&pool)
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23514"));
}
