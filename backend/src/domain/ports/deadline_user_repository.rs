//! Deadline-bound decorator for [`UserRepository`] implementations.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{NewUser, User, UserId};

use super::{UserPersistenceError, UserRepository};

/// Upper bounds applied to repository calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDeadlines {
    /// Bound for [`UserRepository::create`].
    pub create: Duration,
    /// Bound for every other operation.
    pub request: Duration,
}

impl RequestDeadlines {
    pub const DEFAULT_CREATE: Duration = Duration::from_millis(250);
    pub const DEFAULT_REQUEST: Duration = Duration::from_secs(5);
}

impl Default for RequestDeadlines {
    fn default() -> Self {
        Self {
            create: Self::DEFAULT_CREATE,
            request: Self::DEFAULT_REQUEST,
        }
    }
}

/// Wraps a repository so each call fails with
/// [`UserPersistenceError::Timeout`] once its deadline elapses.
///
/// The inner future is dropped on expiry, cancelling the pending work.
///
/// # Examples
/// ```
/// use user_service::domain::ports::{
///     DeadlineUserRepository, InMemoryUserRepository, RequestDeadlines,
/// };
///
/// let repo = DeadlineUserRepository::new(
///     InMemoryUserRepository::new(),
///     RequestDeadlines::default(),
/// );
/// assert_eq!(repo.deadlines(), RequestDeadlines::default());
/// ```
#[derive(Debug, Clone)]
pub struct DeadlineUserRepository<R> {
    inner: R,
    deadlines: RequestDeadlines,
}

impl<R> DeadlineUserRepository<R> {
    /// Wrap `inner`, bounding each call by `deadlines`.
    #[must_use]
    pub fn new(inner: R, deadlines: RequestDeadlines) -> Self {
        Self { inner, deadlines }
    }

    pub fn deadlines(&self) -> RequestDeadlines {
        self.deadlines
    }
}

async fn bounded<T, F>(
    operation: &'static str,
    limit: Duration,
    work: F,
) -> Result<T, UserPersistenceError>
where
    F: Future<Output = Result<T, UserPersistenceError>>,
{
    match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, limit_ms = limit.as_millis(), "user repository deadline exceeded");
            Err(UserPersistenceError::timeout(operation))
        }
    }
}

#[async_trait]
impl<R> UserRepository for DeadlineUserRepository<R>
where
    R: UserRepository,
{
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        bounded("find_all", self.deadlines.request, self.inner.find_all()).await
    }

    async fn find_one(&self, id: &UserId) -> Result<User, UserPersistenceError> {
        bounded("find_one", self.deadlines.request, self.inner.find_one(id)).await
    }

    async fn create(&self, user: NewUser) -> Result<UserId, UserPersistenceError> {
        bounded("create", self.deadlines.create, self.inner.create(user)).await
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        bounded("update", self.deadlines.request, self.inner.update(user)).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        bounded("delete", self.deadlines.request, self.inner.delete(id)).await
    }
}
