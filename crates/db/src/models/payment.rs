//! Point packages and payment orders.

use serde::Serialize;
use sqlx::FromRow;
use spinvault_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShopPackage {
    pub id: DbId,
    pub name: String,
    pub amount_krw: i64,
    pub point_granted: i64,
    pub bonus_point: i64,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl ShopPackage {
    /// Points credited when an order for this package is paid.
    pub fn total_points(&self) -> i64 {
        self.point_granted + self.bonus_point
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub user_id: DbId,
    pub provider: String,
    pub package_id: DbId,
    pub order_id: String,
    pub amount_krw: i64,
    pub point_granted: i64,
    pub status: String,
    pub provider_payload: Option<serde_json::Value>,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub user_id: DbId,
    pub provider: String,
    pub package_id: DbId,
    pub order_id: String,
    pub amount_krw: i64,
    pub point_granted: i64,
}
