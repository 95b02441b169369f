//! Profile form assembly.
//!
//! Built-in field declarations are passed through a [`filter::FilterPipeline`]
//! and ordered with [`sort::priority_sort`] before rendering.

pub mod filter;
pub mod location;
pub mod overrides;
pub mod profile;
pub mod sort;
