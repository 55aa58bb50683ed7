//! Point purchases: order creation and provider webhooks.
//!
//! A `PAID` webhook marks the payment and credits the wallet in one
//! transaction. The payment row is locked first, then the wallet; nothing
//! else takes the two in the opposite order.

use chrono::Utc;
use serde::Serialize;
use spinvault_core::status::PaymentStatus;
use spinvault_core::types::DbId;
use spinvault_db::models::payment::{CreatePayment, Payment, ShopPackage};
use spinvault_db::models::wallet::LedgerRef;
use spinvault_db::repositories::{PaymentRepo, ShopPackageRepo, UserRepo, WalletRepo};
use uuid::Uuid;

use crate::guard::check_charge;
use crate::ledger::{self, REF_PAYMENT};
use crate::{Engine, EngineError, EngineResult};

/// Provider used when an order does not name one.
pub const DEFAULT_PROVIDER: &str = "mockpay";

#[derive(Debug, Clone, Serialize)]
pub struct WebhookOutcome {
    pub payment: Payment,
    /// The payment was already terminal; nothing changed.
    pub idempotent: bool,
    /// Balance after the credit, for a `PAID` transition.
    pub balance_after: Option<i64>,
}

/// Providers are matched case-insensitively.
pub fn normalize_provider(provider: Option<&str>) -> String {
    match provider.map(str::trim) {
        Some(p) if !p.is_empty() => p.to_ascii_lowercase(),
        _ => DEFAULT_PROVIDER.to_string(),
    }
}

/// `ORD-` followed by 16 uppercase hex digits.
pub fn new_order_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", hex[..16].to_ascii_uppercase())
}

impl Engine {
    pub async fn list_packages(&self) -> EngineResult<Vec<ShopPackage>> {
        Ok(ShopPackageRepo::list_active(self.pool()).await?)
    }

    /// Open a `CREATED` order for a package, if the charge fits the user's
    /// limits.
    pub async fn create_order(
        &self,
        user_id: DbId,
        package_id: DbId,
        provider: Option<&str>,
    ) -> EngineResult<Payment> {
        let provider = normalize_provider(provider);

        let (mut tx, _) = self.begin_for_user(user_id).await?;
        let user = UserRepo::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;
        if !user.is_active() {
            return Err(EngineError::AccountInactive {
                status: user.status,
            });
        }

        let package = ShopPackageRepo::find_active(&mut *tx, package_id)
            .await?
            .ok_or(EngineError::PackageNotFound(package_id))?;
        check_charge(&mut *tx, user_id, package.total_points(), Utc::now()).await?;

        let payment = PaymentRepo::create(
            &mut *tx,
            &CreatePayment {
                user_id,
                provider,
                package_id,
                order_id: new_order_id(),
                amount_krw: package.amount_krw,
                point_granted: package.total_points(),
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            user_id,
            order_id = %payment.order_id,
            package_id,
            points = payment.point_granted,
            "Payment order created"
        );
        Ok(payment)
    }

    /// Apply a provider's final status to an order.
    ///
    /// Replays of any terminal status are acknowledged without side effects.
    pub async fn apply_webhook(
        &self,
        provider: &str,
        order_id: &str,
        status: &str,
        payload: &serde_json::Value,
    ) -> EngineResult<WebhookOutcome> {
        let status = PaymentStatus::parse_webhook(status)
            .ok_or_else(|| EngineError::validation("status must be PAID, FAILED or CANCELED"))?;
        let provider = normalize_provider(Some(provider));
        let order_id = order_id.trim();

        let mut tx = self.begin().await?;
        let payment = PaymentRepo::lock_for_provider(&mut *tx, &provider, order_id)
            .await?
            .ok_or_else(|| EngineError::PaymentNotFound(order_id.to_string()))?;

        if PaymentStatus::parse(&payment.status).is_some_and(PaymentStatus::is_terminal) {
            tx.commit().await?;
            tracing::info!(order_id, status = %payment.status, "Webhook replay ignored");
            return Ok(WebhookOutcome {
                payment,
                idempotent: true,
                balance_after: None,
            });
        }

        let payment = PaymentRepo::transition(&mut *tx, order_id, status, payload)
            .await?
            .ok_or_else(|| EngineError::PaymentNotFound(order_id.to_string()))?;

        let balance_after = if status == PaymentStatus::Paid {
            WalletRepo::lock(&mut *tx, payment.user_id)
                .await?
                .ok_or(EngineError::UserNotFound(payment.user_id))?;
            let entry = ledger::charge(
                &mut *tx,
                payment.user_id,
                payment.point_granted,
                LedgerRef::new(REF_PAYMENT, order_id),
            )
            .await?;
            Some(entry.wallet.balance_point)
        } else {
            None
        };
        tx.commit().await?;

        tracing::info!(
            user_id = payment.user_id,
            order_id,
            status = %payment.status,
            points = payment.point_granted,
            "Payment webhook applied"
        );
        Ok(WebhookOutcome {
            payment,
            idempotent: false,
            balance_after,
        })
    }
}
