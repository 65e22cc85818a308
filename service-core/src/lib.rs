//! service-core: Shared infrastructure for the FD portal crates.
pub mod error;
pub mod middleware;
pub mod observability;
