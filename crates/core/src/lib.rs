pub mod error;
pub mod guardrails;
pub mod rate_limit;
pub mod rewards;
pub mod selection;
pub mod signing;
pub mod status;
pub mod types;
