//! HTTP layer for Benefactor.
//!
//! HTML pages for the profile and donation forms, a JSON API under
//! `/api/v1/` using the envelope response format, and a health check.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
