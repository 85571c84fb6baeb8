//! Domain-level error taxonomy.
//!
//! Errors are transport agnostic. The HTTP adapter classifies them once, at
//! the response boundary, into a status code and an error envelope.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::UserIdError;
use super::ports::UserPersistenceError;

/// Shared, type-erased cause attached to an [`Error`].
pub type ErrorCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Stable machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The requested record does not exist.
    #[serde(rename = "US-000003")]
    NotFound,
    /// An unexpected failure with no domain meaning.
    #[serde(rename = "US-000000")]
    System,
    /// Reading or serialising a record failed.
    #[serde(rename = "E-0990")]
    Lookup,
    /// Creating a record failed.
    #[serde(rename = "E-0991")]
    Create,
    /// A path identifier could not be decoded.
    #[serde(rename = "E-0992")]
    InvalidId,
    /// Replacing a record failed.
    #[serde(rename = "E-0993")]
    Update,
    /// Removing a record failed.
    #[serde(rename = "E-0994")]
    Delete,
}

impl ErrorCode {
    /// Wire token for the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "US-000003",
            Self::System => "US-000000",
            Self::Lookup => "E-0990",
            Self::Create => "E-0991",
            Self::InvalidId => "E-0992",
            Self::Update => "E-0993",
            Self::Delete => "E-0994",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying an [`Error`] at the response boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The error is, or wraps, an absent record.
    NotFound,
    /// A domain failure carrying its own code and message.
    Domain,
    /// Anything the domain does not recognise.
    Unclassified,
}

/// Closed set of failures surfaced by domain services.
///
/// # Examples
/// ```
/// use user_service::domain::{Error, ErrorClass, ErrorCode};
/// use user_service::domain::ports::UserPersistenceError;
///
/// let err = Error::domain(ErrorCode::Lookup, "error find one user")
///     .with_cause(UserPersistenceError::NotFound);
/// assert_eq!(err.classify(), ErrorClass::NotFound);
/// ```
#[derive(Debug, Clone)]
pub enum Error {
    /// The requested record does not exist.
    NotFound,
    /// A failure the domain has given a code and message to.
    Domain {
        code: ErrorCode,
        message: String,
        developer_message: String,
        cause: Option<ErrorCause>,
    },
    /// A raw storage failure that was not translated.
    Storage { cause: UserPersistenceError },
    /// Anything else.
    Unclassified { cause: ErrorCause },
}

impl Error {
    /// Domain failure with no cause attached.
    pub fn domain(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Domain {
            code,
            message: message.into(),
            developer_message: String::new(),
            cause: None,
        }
    }

    /// Wrap an error the domain cannot classify.
    pub fn unclassified<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unclassified {
            cause: Arc::new(cause),
        }
    }

    /// A path identifier failed to decode.
    pub fn invalid_user_id(raw: &str, cause: UserIdError) -> Self {
        Self::domain(
            ErrorCode::InvalidId,
            format!("failed to convert user ID to ObjectId. ID={raw}"),
        )
        .with_cause(cause)
    }

    /// Attach the underlying cause to a domain error.
    ///
    /// The developer message defaults to the cause's text. Other variants
    /// are returned unchanged.
    #[must_use]
    pub fn with_cause<E>(self, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            Self::Domain {
                code,
                message,
                developer_message,
                cause: _,
            } => {
                let developer_message = if developer_message.is_empty() {
                    err.to_string()
                } else {
                    developer_message
                };
                Self::Domain {
                    code,
                    message,
                    developer_message,
                    cause: Some(Arc::new(err)),
                }
            }
            other => other,
        }
    }

    /// Stable code for the error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound => ErrorCode::NotFound,
            Self::Domain { code, .. } => *code,
            Self::Storage { .. } | Self::Unclassified { .. } => ErrorCode::System,
        }
    }

    /// Detail aimed at developers; empty when none was recorded.
    #[must_use]
    pub fn developer_message(&self) -> &str {
        match self {
            Self::Domain {
                developer_message, ..
            } => developer_message.as_str(),
            _ => "",
        }
    }

    /// True when this error is, or wraps, an absent record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(Self::NotFound) = err.downcast_ref::<Self>() {
                return true;
            }
            if err
                .downcast_ref::<UserPersistenceError>()
                .is_some_and(UserPersistenceError::is_not_found)
            {
                return true;
            }
            current = err.source();
        }
        false
    }

    /// Decide how the response boundary treats this error.
    ///
    /// Raw storage and unclassified errors are both unrecognised.
    #[must_use]
    pub fn classify(&self) -> ErrorClass {
        match self {
            Self::NotFound => ErrorClass::NotFound,
            Self::Domain { .. } if self.is_not_found() => ErrorClass::NotFound,
            Self::Domain { .. } => ErrorClass::Domain,
            Self::Storage { .. } | Self::Unclassified { .. } => ErrorClass::Unclassified,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found"),
            Self::Domain { message, .. } => f.write_str(message),
            Self::Storage { cause } => write!(f, "{cause}"),
            Self::Unclassified { cause } => write!(f, "{cause}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound => None,
            Self::Domain { cause, .. } => cause
                .as_deref()
                .map(|cause| cause as &(dyn std::error::Error + 'static)),
            Self::Storage { cause } => Some(cause),
            Self::Unclassified { cause } => {
                Some(&**cause as &(dyn std::error::Error + 'static))
            }
        }
    }
}

impl From<UserPersistenceError> for Error {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::NotFound => Self::NotFound,
            cause => Self::Storage { cause },
        }
    }
}
