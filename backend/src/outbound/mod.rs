//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **mongo**: MongoDB-backed document repository
//! - **memory**: in-process document repository for development and tests
//! - **stripe**: reqwest-backed payment gateway
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod mongo;
pub mod stripe;
