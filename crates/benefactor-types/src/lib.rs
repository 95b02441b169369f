//! Shared domain types for Benefactor.
//!
//! This crate contains the core domain types used across the Benefactor service:
//! form fields and fieldsets, donors and user contexts, form submissions,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod donor;
pub mod error;
pub mod field;
pub mod submission;
