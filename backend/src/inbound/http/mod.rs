//! HTTP inbound adapter exposing the user resource.

pub mod error;
pub mod state;
pub mod users;

pub use error::ApiResult;
