//! User data model.
//!
//! Three shapes cover the lifecycle of a record: [`CreateUserInput`] is what a
//! caller submits, [`NewUser`] is what gets handed to storage before an id
//! exists, and [`User`] is the persisted record. [`UserChanges`] describes an
//! update with one optional value per mutable attribute.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Persisted user record.
///
/// ## Invariants
/// - `id` is assigned by storage and never changes afterwards.
/// - `password_hash` holds the submitted password verbatim; no hashing is
///   applied at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: String,
    username: String,
    password_hash: String,
}

impl User {
    /// Assemble a record read back from storage.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Attach a storage-assigned identifier to a new record.
    #[must_use]
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        let NewUser {
            email,
            username,
            password_hash,
        } = new_user;
        Self {
            id,
            email,
            username,
            password_hash,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }
}

/// A record that has not been persisted yet and therefore has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Creation view of a user as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl From<CreateUserInput> for NewUser {
    fn from(value: CreateUserInput) -> Self {
        let CreateUserInput {
            email,
            username,
            password,
        } = value;
        Self {
            email,
            username,
            password_hash: password,
        }
    }
}

/// Replacement values for the mutable attributes of a [`User`].
///
/// `None` leaves the attribute as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    /// Overwrite every mutable attribute.
    pub fn replace_all(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: Some(email.into()),
            username: Some(username.into()),
            password_hash: Some(password_hash.into()),
        }
    }

    /// Produce the updated record. The identifier is carried over untouched.
    #[must_use]
    pub fn apply_to(self, user: User) -> User {
        let Self {
            email,
            username,
            password_hash,
        } = self;
        User {
            id: user.id,
            email: email.unwrap_or(user.email),
            username: username.unwrap_or(user.username),
            password_hash: password_hash.unwrap_or(user.password_hash),
        }
    }
}
