//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving every
//! failure the same JSON envelope. Classification happens here and nowhere
//! else:
//!
//! | class          | status | body                               |
//! |----------------|--------|------------------------------------|
//! | not found      | 404    | not-found envelope                 |
//! | domain         | 400    | per [`ErrorBodyPolicy`]            |
//! | unclassified   | 418    | system envelope with the cause     |

use std::fmt;
use std::str::FromStr;

use actix_web::http::{StatusCode, header::ContentType};
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorClass, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Wire shape of every error response.
///
/// All three fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    #[schema(example = "US-000003")]
    pub code: String,
    #[schema(example = "not found")]
    pub message: String,
    #[schema(example = "")]
    pub developer_message: String,
}

impl ErrorEnvelope {
    /// Fixed payload for absent records.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            code: ErrorCode::NotFound.as_str().to_owned(),
            message: "not found".to_owned(),
            developer_message: String::new(),
        }
    }

    /// Generic payload wrapping the text of an unrecognised failure.
    pub fn system(cause: &dyn fmt::Display) -> Self {
        Self {
            code: ErrorCode::System.as_str().to_owned(),
            message: "internal system error".to_owned(),
            developer_message: cause.to_string(),
        }
    }

    /// Payload carrying a domain error's own code and messages.
    #[must_use]
    pub fn from_domain(error: &Error) -> Self {
        Self {
            code: error.code().as_str().to_owned(),
            message: error.to_string(),
            developer_message: error.developer_message().to_owned(),
        }
    }
}

/// Body written for domain (400) failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBodyPolicy {
    /// Serialise the domain error's own code and messages.
    #[default]
    Own,
    /// Write the not-found envelope for every domain failure.
    CollapseToNotFound,
}

/// Raised when an error body policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error body policy `{0}`; expected `own` or `collapse_to_not_found`")]
pub struct UnknownErrorBodyPolicy(pub String);

impl FromStr for ErrorBodyPolicy {
    type Err = UnknownErrorBodyPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "own" => Ok(Self::Own),
            "collapse_to_not_found" | "collapse" => Ok(Self::CollapseToNotFound),
            other => Err(UnknownErrorBodyPolicy(other.to_owned())),
        }
    }
}

/// Status and body for a domain error.
#[must_use]
pub fn map_error(error: &Error, policy: ErrorBodyPolicy) -> (StatusCode, ErrorEnvelope) {
    match error.classify() {
        ErrorClass::NotFound => (StatusCode::NOT_FOUND, ErrorEnvelope::not_found()),
        ErrorClass::Domain => {
            let body = match policy {
                ErrorBodyPolicy::Own => ErrorEnvelope::from_domain(error),
                ErrorBodyPolicy::CollapseToNotFound => ErrorEnvelope::not_found(),
            };
            (StatusCode::BAD_REQUEST, body)
        }
        ErrorClass::Unclassified => (StatusCode::IM_A_TEAPOT, ErrorEnvelope::system(error)),
    }
}

/// Status and body for any framework error.
///
/// Domain errors are classified; anything else is unrecognised.
#[must_use]
pub fn map_actix_error(
    error: &actix_web::Error,
    policy: ErrorBodyPolicy,
) -> (StatusCode, ErrorEnvelope) {
    match error.as_error::<Error>() {
        Some(domain) => map_error(domain, policy),
        None => (StatusCode::IM_A_TEAPOT, ErrorEnvelope::system(error)),
    }
}

/// Serialise `body` as a JSON response, treating serialisation failures
/// as unclassified errors.
pub fn json_response<T>(status: StatusCode, body: &T) -> ApiResult<HttpResponse>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(body).map_err(Error::unclassified)?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::json())
        .body(bytes))
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        map_error(self, ErrorBodyPolicy::default()).0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, body) = map_error(self, ErrorBodyPolicy::default());
        HttpResponse::build(status).json(body)
    }
}
