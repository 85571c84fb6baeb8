//! Storage port for user records.
//!
//! The domain depends on this trait only. Outbound adapters (the document
//! store, the in-memory fixture) implement it; deadlines are layered on by
//! [`super::DeadlineUserRepository`].

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// No record matched the requested identifier.
        NotFound => "user not found",
        /// The operation did not finish before its deadline.
        Timeout { operation: String } => "user repository {operation} exceeded its deadline",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A stored document could not be converted into a user.
        Decode { message: String } => "user repository decode failed: {message}",
    }
}

/// Persistence contract for user records.
///
/// Every call may be cancelled by dropping its future.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return every stored user. An empty store yields an empty list.
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch one user, failing with [`UserPersistenceError::NotFound`] when
    /// no record has the identifier.
    async fn find_one(&self, id: &UserId) -> Result<User, UserPersistenceError>;

    /// Persist a new record and return the identifier storage assigned.
    async fn create(&self, user: NewUser) -> Result<UserId, UserPersistenceError>;

    /// Replace every attribute of the record with the same identifier.
    ///
    /// Fails with [`UserPersistenceError::NotFound`] when nothing matched.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove a record, failing with [`UserPersistenceError::NotFound`] when
    /// nothing was removed.
    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError>;
}
