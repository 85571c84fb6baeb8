//! Document-store implementation of the [`UserRepository`] port.
//!
//! Users are stored as `{ _id: ObjectId, email, username, password }`.
//! The identifier is assigned by the server on insert.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use mongodb::error::{Error as DriverError, ErrorKind};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId};

/// Stored shape of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    email: String,
    username: String,
    password: String,
}

impl UserDocument {
    fn from_new(user: NewUser) -> Self {
        let NewUser {
            email,
            username,
            password_hash,
        } = user;
        Self {
            id: None,
            email,
            username,
            password: password_hash,
        }
    }

    fn into_user(self) -> Result<User, UserPersistenceError> {
        let id = self
            .id
            .ok_or_else(|| UserPersistenceError::decode("document has no _id"))?;
        Ok(User::new(
            UserId::from_bytes(id.bytes()),
            self.email,
            self.username,
            self.password,
        ))
    }
}

fn object_id(id: &UserId) -> ObjectId {
    ObjectId::from_bytes(id.to_bytes())
}

fn id_filter(id: &UserId) -> Document {
    doc! { "_id": object_id(id) }
}

/// Every attribute except the identifier, as a `$set` update.
fn replacement(user: &User) -> Document {
    doc! {
        "$set": {
            "email": user.email(),
            "username": user.username(),
            "password": user.password_hash(),
        }
    }
}

fn map_driver_error(error: DriverError, context: &str) -> UserPersistenceError {
    debug!(%error, context, "document store operation failed");
    match &*error.kind {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::Io(_) => UserPersistenceError::connection(format!("{context}: {error}")),
        ErrorKind::BsonDeserialization(_) => {
            UserPersistenceError::decode(format!("{context}: {error}"))
        }
        _ => UserPersistenceError::query(format!("{context}: {error}")),
    }
}

/// [`UserRepository`] backed by a document-store collection.
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Bind the repository to `collection` in `database`.
    pub fn new(database: &Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let documents: Vec<UserDocument> = self
            .collection
            .find(doc! {})
            .await
            .map_err(|err| map_driver_error(err, "failed to find all users"))?
            .try_collect()
            .await
            .map_err(|err| map_driver_error(err, "failed to read all documents from cursor"))?;
        trace!(count = documents.len(), "read users");
        documents.into_iter().map(UserDocument::into_user).collect()
    }

    async fn find_one(&self, id: &UserId) -> Result<User, UserPersistenceError> {
        self.collection
            .find_one(id_filter(id))
            .await
            .map_err(|err| {
                map_driver_error(err, &format!("failed to find one user by id: {id}"))
            })?
            .ok_or(UserPersistenceError::NotFound)?
            .into_user()
    }

    async fn create(&self, user: NewUser) -> Result<UserId, UserPersistenceError> {
        debug!("create user");
        let result = self
            .collection
            .insert_one(UserDocument::from_new(user))
            .await
            .map_err(|err| map_driver_error(err, "failed to create user"))?;
        let inserted = result.inserted_id.as_object_id().ok_or_else(|| {
            UserPersistenceError::query(format!(
                "inserted id is not an object id: {}",
                result.inserted_id
            ))
        })?;
        Ok(UserId::from_bytes(inserted.bytes()))
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let result = self
            .collection
            .update_one(id_filter(user.id()), replacement(user))
            .await
            .map_err(|err| map_driver_error(err, "failed to execute update user query"))?;
        if result.matched_count == 0 {
            return Err(UserPersistenceError::NotFound);
        }
        trace!(
            matched = result.matched_count,
            modified = result.modified_count,
            "updated user documents"
        );
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        let result = self
            .collection
            .delete_one(id_filter(id))
            .await
            .map_err(|err| map_driver_error(err, "failed to execute delete query"))?;
        if result.deleted_count == 0 {
            return Err(UserPersistenceError::NotFound);
        }
        trace!(deleted = result.deleted_count, "deleted user documents");
        Ok(())
    }
}
