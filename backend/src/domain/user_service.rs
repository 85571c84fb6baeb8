//! User management flows over the [`UserRepository`] port.
//!
//! Each operation translates storage outcomes into the domain [`Error`]
//! taxonomy at most once; the HTTP adapter decides the status code.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{CreateUserInput, Error, ErrorCode, NewUser, User, UserChanges, UserId};

/// Driving service for the user resource.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Build the service over a storage port.
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Every stored user.
    ///
    /// Any storage failure is reported as [`Error::NotFound`].
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        match self.repository.find_all().await {
            Ok(users) => {
                debug!(count = users.len(), "listed users");
                Ok(users)
            }
            Err(err) => {
                info!(error = %err, "listing users failed");
                Err(Error::NotFound)
            }
        }
    }

    /// Persist a new user and return the identifier storage assigned.
    pub async fn create(&self, input: CreateUserInput) -> Result<UserId, Error> {
        let username = input.username.clone();
        let id = self
            .repository
            .create(NewUser::from(input))
            .await
            .map_err(|err| {
                Error::domain(
                    ErrorCode::Create,
                    format!("error create user with name: {username}"),
                )
                .with_cause(err)
            })?;
        debug!(%id, %username, "created user");
        Ok(id)
    }

    /// Fetch one user.
    pub async fn get(&self, id: &UserId) -> Result<User, Error> {
        self.repository.find_one(id).await.map_err(|err| {
            Error::domain(ErrorCode::Lookup, format!("error find one user by id: {id}"))
                .with_cause(err)
        })
    }

    /// Overwrite every mutable attribute of a user.
    pub async fn replace(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        self.apply(id, changes, "error update user id").await
    }

    /// Overwrite only the attributes `changes` carries a value for.
    pub async fn patch(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        self.apply(id, changes, "error partially update user id").await
    }

    /// Remove a user.
    pub async fn delete(&self, id: &UserId) -> Result<(), Error> {
        self.repository.delete(id).await.map_err(|err| match err {
            UserPersistenceError::NotFound => Error::NotFound,
            other => Error::domain(ErrorCode::Delete, format!("error delete user id: {id}"))
                .with_cause(other),
        })?;
        debug!(%id, "deleted user");
        Ok(())
    }

    async fn apply(
        &self,
        id: &UserId,
        changes: UserChanges,
        context: &str,
    ) -> Result<User, Error> {
        let current = self.repository.find_one(id).await?;
        let updated = changes.apply_to(current);
        self.repository.update(&updated).await.map_err(|err| {
            Error::domain(ErrorCode::Update, format!("{context}: {id}")).with_cause(err)
        })?;
        debug!(%id, "updated user");
        Ok(updated)
    }
}
