//! HTTP surface of the spin backend.
//!
//! The binary in `main.rs` wires configuration, the database pool and the
//! [`router`]; everything else lives here so integration tests can build the
//! same application.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
