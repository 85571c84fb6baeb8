//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `USER_SERVICE_*` environment variables, a configuration
//! file, or command-line flags. Every key is optional; the accessors below
//! apply defaults and turn free-form strings into typed values.
//! [`Settings::resolve`] runs every accessor at once so that a bad value
//! stops start-up.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ports::RequestDeadlines;
use crate::inbound::http::error::{ErrorBodyPolicy, UnknownErrorBodyPolicy};
use crate::outbound::persistence::MongoSettings;

const DEFAULT_BIND_IP: &str = "127.0.0.1";
const DEFAULT_SOCKET_NAME: &str = "app.sock";
const DEFAULT_MONGODB_HOST: &str = "localhost";
const DEFAULT_MONGODB_PORT: u16 = 27017;

/// Errors raised when a configured value cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown listen type `{0}`; expected `tcp` or `sock`")]
    ListenType(String),
    #[error("invalid bind address `{0}`")]
    BindIp(String),
    #[error("unknown storage backend `{0}`; expected `mongodb` or `memory`")]
    Storage(String),
    #[error("unknown log format `{0}`; expected `json` or `pretty`")]
    LogFormat(String),
    #[error(transparent)]
    ErrorBodyPolicy(#[from] UnknownErrorBodyPolicy),
}

/// Where the HTTP server accepts connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listener {
    Tcp(SocketAddr),
    Unix(PathBuf),
}

/// Which [`UserRepository`](crate::domain::ports::UserRepository) backs the
/// service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo(MongoSettings),
    Memory,
}

/// Log line encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Typed start-up configuration, produced by [`Settings::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub listener: Listener,
    pub storage: StorageBackend,
    pub deadlines: RequestDeadlines,
    pub error_body_policy: ErrorBodyPolicy,
    pub log_format: LogFormat,
}

/// Configuration values for the user service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct Settings {
    /// `tcp` (default) or `sock`.
    #[ortho_config(cli_short = 'l')]
    pub listen_type: Option<String>,
    /// Address to bind in TCP mode.
    #[ortho_config(cli_short = 'b')]
    pub bind_ip: Option<String>,
    /// Port to bind in TCP mode.
    #[ortho_config(default = 8080, cli_short = 'p')]
    pub port: u16,
    /// Socket path in `sock` mode; defaults to `app.sock` beside the binary.
    #[ortho_config(cli_short = 's')]
    pub socket_path: Option<PathBuf>,
    /// `mongodb` (default) or `memory`.
    #[ortho_config(cli_short = 'S')]
    pub storage: Option<String>,
    /// Document-store host; defaults to `localhost`.
    #[ortho_config(cli_short = 'H')]
    pub mongodb_host: Option<String>,
    /// Document-store port; defaults to 27017.
    #[ortho_config(cli_short = 'P')]
    pub mongodb_port: Option<u16>,
    /// Username, sent only together with a password.
    #[ortho_config(cli_short = 'u')]
    pub mongodb_username: Option<String>,
    /// Password, sent only together with a username.
    #[ortho_config(cli_short = 'w')]
    pub mongodb_password: Option<String>,
    /// Database holding the users collection; defaults to `users`.
    #[ortho_config(cli_short = 'd')]
    pub mongodb_database: Option<String>,
    /// Database the credentials are checked against; defaults to `admin`.
    #[ortho_config(cli_short = 'a')]
    pub mongodb_auth_db: Option<String>,
    /// Collection storing user documents; defaults to `users`.
    #[ortho_config(cli_short = 'o')]
    pub mongodb_collection: Option<String>,
    /// Deadline for creating a user, in milliseconds.
    #[ortho_config(cli_short = 't')]
    pub create_timeout_ms: Option<u64>,
    /// Deadline for every other storage call, in milliseconds.
    #[ortho_config(cli_short = 'r')]
    pub request_timeout_ms: Option<u64>,
    /// `own` (default) or `collapse_to_not_found`.
    #[ortho_config(cli_short = 'e')]
    pub error_body_policy: Option<String>,
    /// `json` (default) or `pretty`.
    #[ortho_config(cli_short = 'f')]
    pub log_format: Option<String>,
}

fn normalised(value: Option<&str>) -> Option<String> {
    value.map(|raw| raw.trim().to_ascii_lowercase())
}

fn default_socket_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_SOCKET_NAME)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET_NAME))
}

impl Settings {
    /// Interpret every configured value, failing on the first one that
    /// cannot be understood.
    pub fn resolve(&self) -> Result<RuntimeSettings, SettingsError> {
        Ok(RuntimeSettings {
            listener: self.listener()?,
            storage: self.storage()?,
            deadlines: self.deadlines(),
            error_body_policy: self.error_body_policy()?,
            log_format: self.log_format()?,
        })
    }

    /// Resolve the listening endpoint.
    pub fn listener(&self) -> Result<Listener, SettingsError> {
        match normalised(self.listen_type.as_deref()).as_deref() {
            None | Some("tcp") => {
                let raw = self.bind_ip.as_deref().unwrap_or(DEFAULT_BIND_IP);
                let ip: IpAddr = raw
                    .trim()
                    .parse()
                    .map_err(|_| SettingsError::BindIp(raw.to_owned()))?;
                Ok(Listener::Tcp(SocketAddr::new(ip, self.port)))
            }
            Some("sock") => Ok(Listener::Unix(
                self.socket_path.clone().unwrap_or_else(default_socket_path),
            )),
            Some(other) => Err(SettingsError::ListenType(other.to_owned())),
        }
    }

    /// Resolve the storage backend.
    pub fn storage(&self) -> Result<StorageBackend, SettingsError> {
        match normalised(self.storage.as_deref()).as_deref() {
            None | Some("mongodb") => Ok(StorageBackend::Mongo(self.mongo_settings())),
            Some("memory") => Ok(StorageBackend::Memory),
            Some(other) => Err(SettingsError::Storage(other.to_owned())),
        }
    }

    /// Document-store connection settings with defaults applied.
    pub fn mongo_settings(&self) -> MongoSettings {
        let mut settings = MongoSettings::new(
            self.mongodb_host.as_deref().unwrap_or(DEFAULT_MONGODB_HOST),
            self.mongodb_port.unwrap_or(DEFAULT_MONGODB_PORT),
        );
        if let (Some(username), Some(password)) = (&self.mongodb_username, &self.mongodb_password)
        {
            settings = settings.with_credentials(username.as_str(), password.as_str());
        }
        if let Some(database) = &self.mongodb_database {
            settings = settings.with_database(database.as_str());
        }
        if let Some(auth_db) = &self.mongodb_auth_db {
            settings = settings.with_auth_db(auth_db.as_str());
        }
        if let Some(collection) = &self.mongodb_collection {
            settings = settings.with_collection(collection.as_str());
        }
        settings
    }

    /// Storage deadlines with defaults applied.
    pub fn deadlines(&self) -> RequestDeadlines {
        let defaults = RequestDeadlines::default();
        RequestDeadlines {
            create: self
                .create_timeout_ms
                .map_or(defaults.create, Duration::from_millis),
            request: self
                .request_timeout_ms
                .map_or(defaults.request, Duration::from_millis),
        }
    }

    /// Body written for domain failures.
    pub fn error_body_policy(&self) -> Result<ErrorBodyPolicy, SettingsError> {
        match self.error_body_policy.as_deref() {
            None => Ok(ErrorBodyPolicy::default()),
            Some(raw) => Ok(raw.parse()?),
        }
    }

    /// Log line encoding.
    pub fn log_format(&self) -> Result<LogFormat, SettingsError> {
        match normalised(self.log_format.as_deref()).as_deref() {
            None | Some("json") => Ok(LogFormat::Json),
            Some("pretty") => Ok(LogFormat::Pretty),
            Some(other) => Err(SettingsError::LogFormat(other.to_owned())),
        }
    }
}
