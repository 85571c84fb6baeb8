//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to interact with driven adapters.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod deadline_user_repository;
mod in_memory_user_repository;
mod user_repository;

pub use deadline_user_repository::{DeadlineUserRepository, RequestDeadlines};
pub use in_memory_user_repository::InMemoryUserRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
