//! Form assembly, rendering, and repository trait definitions for Benefactor.
//!
//! This crate defines the "ports" (repository and nonce traits) that the
//! infrastructure layer implements. It depends only on `benefactor-types` --
//! never on `benefactor-infra` or any database/IO crate.

pub mod form;
pub mod render;
pub mod repository;
pub mod service;
