use std::sync::Arc;

use spinvault_core::rate_limit::SlidingWindowLimiter;
use spinvault_engine::Engine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and engine are handles, the rest is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: spinvault_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Spin, ledger, payment and odds operations.
    pub engine: Engine,
    /// Per-instance request limiter for spins and orders.
    pub limiter: Arc<SlidingWindowLimiter>,
}

impl AppState {
    pub fn new(pool: spinvault_db::DbPool, config: ServerConfig) -> Self {
        let engine = Engine::new(pool.clone(), &config.engine_config());
        Self {
            pool,
            config: Arc::new(config),
            engine,
            limiter: Arc::new(SlidingWindowLimiter::new()),
        }
    }
}
