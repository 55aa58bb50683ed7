pub mod admin;
pub mod auth;
pub mod inventory;
pub mod machines;
pub mod me;
pub mod payments;
pub mod wallet;
