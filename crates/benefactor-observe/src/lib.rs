//! Observability for Benefactor: subscriber setup and trace export.

pub mod tracing_setup;
