//! Business logic services (use cases).
//!
//! Services orchestrate repository calls, nonce checks, and form assembly.
//! They depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod donor;
pub mod nonce;
pub mod profile;
