//! Row structs and insert/update DTOs.
//!
//! Each submodule contains a `FromRow` entity matching a table plus the
//! `Create*`/`Update*` inputs its repository accepts.

pub mod inventory;
pub mod limit;
pub mod machine;
pub mod payment;
pub mod probability;
pub mod reward;
pub mod spin;
pub mod user;
pub mod wallet;
