//! Request guards implemented as Axum extractors.
//!
//! - [`auth::AuthUser`] -- Bearer JWT resolved to an active account.
//! - [`keys::RequireAdmin`] -- `X-Admin-Key` shared secret.
//! - [`keys::RequireWebhookToken`] -- `X-Webhook-Token` shared secret.
//! - [`rate_limit`] -- Per-user sliding-window checks for hot endpoints.

pub mod auth;
pub mod keys;
pub mod rate_limit;
