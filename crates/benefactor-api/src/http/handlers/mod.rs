//! Route handlers.

pub mod donation;
pub mod fields;
pub mod login;
pub mod profile;
