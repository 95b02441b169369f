//! Infrastructure layer for Benefactor.
//!
//! Contains implementations of the repository traits defined in `benefactor-core`:
//! SQLite storage, the HMAC nonce issuer, and data directory helpers.

pub mod config;
pub mod crypto;
pub mod filesystem;
pub mod sqlite;
