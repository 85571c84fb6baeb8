//! In-memory [`UserRepository`] used by tests and the `memory` storage
//! backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::domain::{NewUser, User, UserId};

use super::{UserPersistenceError, UserRepository};

/// Lock-protected map of users keyed by identifier.
///
/// Clones share the same underlying store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding the given users.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (*user.id(), user))
            .collect::<BTreeMap<_, _>>();
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// True when no users are stored.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn find_one(&self, id: &UserId) -> Result<User, UserPersistenceError> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(UserPersistenceError::NotFound)
    }

    async fn create(&self, user: NewUser) -> Result<UserId, UserPersistenceError> {
        let mut users = self.users.write().await;
        let mut id = UserId::generate();
        while users.contains_key(&id) {
            id = UserId::generate();
        }
        users.insert(id, User::from_new(id, user));
        trace!(%id, "stored user in memory");
        Ok(id)
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        let slot = users
            .get_mut(user.id())
            .ok_or(UserPersistenceError::NotFound)?;
        *slot = user.clone();
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(UserPersistenceError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn new_user() -> NewUser {
        NewUser {
            email: "ada@example.com".to_owned(),
            username: "ada".to_owned(),
            password_hash: "hunter2".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let repo = InMemoryUserRepository::new();
        assert_eq!(repo.find_all().await, Ok(Vec::new()));
        assert!(repo.is_empty().await);
    }

    #[rstest]
    #[tokio::test]
    async fn created_users_can_be_read_back(new_user: NewUser) {
        let repo = InMemoryUserRepository::new();

        let id = repo.create(new_user.clone()).await.expect("create");
        let stored = repo.find_one(&id).await.expect("find");

        assert_eq!(stored, User::from_new(id, new_user));
        assert_eq!(repo.len().await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_the_matching_record(new_user: NewUser) {
        let repo = InMemoryUserRepository::new();
        let id = repo.create(new_user).await.expect("create");
        let replacement = User::new(id, "x", "y", "z");

        repo.update(&replacement).await.expect("update");

        assert_eq!(repo.find_one(&id).await, Ok(replacement));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_records_report_not_found() {
        let repo = InMemoryUserRepository::new();
        let id = UserId::generate();

        assert_eq!(repo.find_one(&id).await, Err(UserPersistenceError::NotFound));
        assert_eq!(
            repo.update(&User::new(id, "x", "y", "z")).await,
            Err(UserPersistenceError::NotFound)
        );
        assert_eq!(repo.delete(&id).await, Err(UserPersistenceError::NotFound));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_only_the_target(new_user: NewUser) {
        let repo = InMemoryUserRepository::new();
        let kept = repo.create(new_user.clone()).await.expect("create");
        let removed = repo.create(new_user).await.expect("create");

        repo.delete(&removed).await.expect("delete");

        let ids: Vec<UserId> = repo
            .find_all()
            .await
            .expect("list")
            .iter()
            .map(|user| *user.id())
            .collect();
        assert_eq!(ids, vec![kept]);
    }
}
