//! Repository for the `shop_packages` table.

use sqlx::PgExecutor;
use spinvault_core::types::DbId;

use crate::models::payment::ShopPackage;

const COLUMNS: &str = "id, name, amount_krw, point_granted, bonus_point, sort_order, \
                       is_active, created_at";

pub struct ShopPackageRepo;

impl ShopPackageRepo {
    /// Find a package that is currently on sale.
    pub async fn find_active(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<ShopPackage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shop_packages WHERE id = $1 AND is_active");
        sqlx::query_as::<_, ShopPackage>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    pub async fn list_active(exec: impl PgExecutor<'_>) -> Result<Vec<ShopPackage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shop_packages WHERE is_active ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, ShopPackage>(&query).fetch_all(exec).await
    }
}
