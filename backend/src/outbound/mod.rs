//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: document-store repositories
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod persistence;
