//! Domain primitives, error taxonomy, ports and services.
//!
//! Purpose: keep the user model and its storage contract independent of any
//! transport or driver. Inbound and outbound adapters depend on this module,
//! never the reverse.
//!
//! Public surface:
//! - [`UserId`]: opaque storage identifier and its text codec.
//! - [`User`], [`NewUser`], [`CreateUserInput`], [`UserChanges`]: the model.
//! - [`Error`], [`ErrorCode`], [`ErrorClass`]: the failure taxonomy.
//! - [`UserService`]: request flows over [`ports::UserRepository`].

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_id;
pub mod user_service;

pub use self::error::{Error, ErrorCause, ErrorClass, ErrorCode};
pub use self::trace_id::TraceId;
pub use self::user::{CreateUserInput, NewUser, User, UserChanges};
pub use self::user_id::{USER_ID_BYTES, USER_ID_ENCODED_LEN, UserId, UserIdError};
pub use self::user_service::UserService;
