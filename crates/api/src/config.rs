use std::time::Duration;

use spinvault_core::rate_limit::{DEFAULT_ORDER_LIMIT, DEFAULT_SPIN_LIMIT};
use spinvault_engine::{EngineConfig, DEFAULT_LOCK_TIMEOUT};

use crate::auth::token::{TokenConfig, DEFAULT_TOKEN_TTL_MINS};

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session token signing secret and lifetime.
    pub token: TokenConfig,
    /// Shared secret for the `X-Admin-Key` header.
    pub admin_key: String,
    /// Shared secret for the `X-Webhook-Token` header.
    pub webhook_token: String,
    /// HMAC key for spin result signatures.
    pub spin_signing_key: String,
    /// Bound on row-lock waits inside engine transactions.
    pub lock_timeout: Duration,
    /// Spins allowed per user per minute.
    pub spin_rate_limit: usize,
    /// Payment orders allowed per user per minute.
    pub order_rate_limit: usize,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn required(name: &str) -> String {
    let value = std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"));
    assert!(!value.is_empty(), "{name} must not be empty");
    value
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `JWT_SECRET`               | required                |
    /// | `JWT_TTL_MINS`             | `60`                    |
    /// | `ADMIN_KEY`                | required                |
    /// | `WEBHOOK_TOKEN`            | required                |
    /// | `SPIN_SIGNING_KEY`         | required                |
    /// | `LOCK_TIMEOUT_MS`          | `3000`                  |
    /// | `SPIN_RATE_LIMIT_PER_MIN`  | `60`                    |
    /// | `ORDER_RATE_LIMIT_PER_MIN` | `20`                    |
    ///
    /// # Panics
    ///
    /// Panics on a missing secret or an unparsable value.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let lock_timeout_ms: u64 = env_or(
            "LOCK_TIMEOUT_MS",
            &DEFAULT_LOCK_TIMEOUT.as_millis().to_string(),
        )
        .parse()
        .expect("LOCK_TIMEOUT_MS must be a valid u64");

        let spin_rate_limit: usize = env_or("SPIN_RATE_LIMIT_PER_MIN", &DEFAULT_SPIN_LIMIT.to_string())
            .parse()
            .expect("SPIN_RATE_LIMIT_PER_MIN must be a valid usize");

        let order_rate_limit: usize =
            env_or("ORDER_RATE_LIMIT_PER_MIN", &DEFAULT_ORDER_LIMIT.to_string())
                .parse()
                .expect("ORDER_RATE_LIMIT_PER_MIN must be a valid usize");

        let ttl_mins: i64 = env_or("JWT_TTL_MINS", &DEFAULT_TOKEN_TTL_MINS.to_string())
            .parse()
            .expect("JWT_TTL_MINS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            token: TokenConfig {
                secret: required("JWT_SECRET"),
                ttl_mins,
            },
            admin_key: required("ADMIN_KEY"),
            webhook_token: required("WEBHOOK_TOKEN"),
            spin_signing_key: required("SPIN_SIGNING_KEY"),
            lock_timeout: Duration::from_millis(lock_timeout_ms),
            spin_rate_limit,
            order_rate_limit,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            signing_key: self.spin_signing_key.clone(),
            lock_timeout: self.lock_timeout,
        }
    }
}
