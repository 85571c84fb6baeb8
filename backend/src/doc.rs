//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every user endpoint together with the response
//! schemas they emit. The document backs Swagger UI in debug builds and is
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::users::{CreatedUserResponse, UserResponse};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User service API",
        description = "Create, read, update and delete user records over HTTP."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::replace_user,
        crate::inbound::http::users::patch_user,
        crate::inbound::http::users::delete_user,
    ),
    components(schemas(UserResponse, CreatedUserResponse, ErrorEnvelope)),
    tags(
        (name = "users", description = "Operations related to users")
    )
)]
pub struct ApiDoc;
