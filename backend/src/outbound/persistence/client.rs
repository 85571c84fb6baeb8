//! Document-store connection factory.

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Database};
use tracing::{debug, info};

/// Errors raised while establishing the document-store connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// The connection options could not be built.
    #[error("invalid document store options: {message}")]
    Options { message: String },

    /// The server did not answer the initial ping.
    #[error("document store unreachable: {message}")]
    Unreachable { message: String },
}

impl ConnectError {
    pub fn options(message: impl Into<String>) -> Self {
        Self::Options {
            message: message.into(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }
}

/// Where and how to reach the document store.
///
/// Credentials are only sent when both a username and a password are set;
/// they are checked against `auth_db`.
#[derive(Clone, PartialEq, Eq)]
pub struct MongoSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: String,
    pub auth_db: String,
    pub collection: String,
}

impl MongoSettings {
    /// Settings for an unauthenticated server, with the default database,
    /// authentication database and collection.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
            database: "users".to_owned(),
            auth_db: "admin".to_owned(),
            collection: "users".to_owned(),
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_auth_db(mut self, auth_db: impl Into<String>) -> Self {
        self.auth_db = auth_db.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Connection string without credentials.
    #[must_use]
    pub fn uri(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }

    fn credential(&self) -> Option<Credential> {
        let username = self.username.as_deref().filter(|value| !value.is_empty())?;
        let password = self.password.as_deref().filter(|value| !value.is_empty())?;
        let mut credential = Credential::default();
        credential.username = Some(username.to_owned());
        credential.password = Some(password.to_owned());
        credential.source = Some(self.auth_db.clone());
        Some(credential)
    }
}

impl std::fmt::Debug for MongoSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("auth_db", &self.auth_db)
            .field("collection", &self.collection)
            .finish()
    }
}

/// Build a client, ping the configured database and return its handle.
///
/// # Errors
///
/// [`ConnectError::Options`] when the options are rejected by the driver,
/// [`ConnectError::Unreachable`] when the ping fails.
pub async fn connect(settings: &MongoSettings) -> Result<Database, ConnectError> {
    let mut options = ClientOptions::parse(settings.uri())
        .await
        .map_err(|err| ConnectError::options(err.to_string()))?;
    options.credential = settings.credential();
    options.app_name = Some(env!("CARGO_PKG_NAME").to_owned());
    debug!(
        uri = %settings.uri(),
        authenticated = options.credential.is_some(),
        "connecting to document store"
    );

    let client =
        Client::with_options(options).map_err(|err| ConnectError::options(err.to_string()))?;
    let database = client.database(&settings.database);
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|err| ConnectError::unreachable(err.to_string()))?;

    info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        "connected to document store"
    );
    Ok(database)
}
