//! User resource handlers.
//!
//! ```text
//! GET    /users
//! POST   /users/{email}/{username}/{password}
//! GET    /users/{uuid}
//! PUT    /users/{uuid}/{email}/{username}/{password}
//! PATCH  /users/{uuid}/{email}/{username}/{password}
//! DELETE /users/{uuid}
//! ```
//!
//! Every value arrives as a path segment; there are no request bodies.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::trace;
use utoipa::ToSchema;

use crate::domain::{CreateUserInput, Error, User, UserChanges, UserId};
use crate::inbound::http::error::{ErrorEnvelope, json_response};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Path segment that leaves an attribute unchanged on `PATCH`.
pub const KEEP_EXISTING: &str = "pass";

/// Outward shape of a stored user. The password hash is never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "ada")]
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(value: &User) -> Self {
        Self {
            id: value.id().encode(),
            email: value.email().to_owned(),
            username: value.username().to_owned(),
        }
    }
}

/// Echo of the submitted creation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedUserResponse {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "hunter2")]
    pub password: String,
}

impl From<CreateUserInput> for CreatedUserResponse {
    fn from(value: CreateUserInput) -> Self {
        let CreateUserInput {
            email,
            username,
            password,
        } = value;
        Self {
            email,
            username,
            password,
        }
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::decode(raw).map_err(|err| Error::invalid_user_id(raw, err))
}

fn keep_or_replace(segment: String) -> Option<String> {
    (segment != KEEP_EXISTING).then_some(segment)
}

/// List every user.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 404, description = "Listing failed", body = ErrorEnvelope),
        (status = 418, description = "Unclassified failure", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.users.list().await?;
    trace!(count = users.len(), "listing users");
    let body: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    json_response(StatusCode::OK, &body)
}

/// Create a user from path segments.
///
/// The response echoes the submitted input; the assigned id is not returned.
#[utoipa::path(
    post,
    path = "/users/{email}/{username}/{password}",
    params(
        ("email" = String, Path, description = "Email address"),
        ("username" = String, Path, description = "Login name"),
        ("password" = String, Path, description = "Password, stored as submitted")
    ),
    responses(
        (status = 201, description = "User created", body = CreatedUserResponse),
        (status = 400, description = "Creation failed", body = ErrorEnvelope),
        (status = 418, description = "Unclassified failure", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users/{email}/{username}/{password}")]
pub async fn create_user(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
) -> ApiResult<HttpResponse> {
    let (email, username, password) = path.into_inner();
    let input = CreateUserInput {
        email,
        username,
        password,
    };
    let id = state.users.create(input.clone()).await?;
    trace!(%id, "created user");
    json_response(StatusCode::CREATED, &CreatedUserResponse::from(input))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/users/{uuid}",
    params(("uuid" = String, Path, description = "24-character hexadecimal user id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "No such user", body = ErrorEnvelope),
        (status = 418, description = "Unclassified failure", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{uuid}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let user = state.users.get(&id).await?;
    json_response(StatusCode::OK, &UserResponse::from(&user))
}

/// Overwrite every attribute of a user.
#[utoipa::path(
    put,
    path = "/users/{uuid}/{email}/{username}/{password}",
    params(
        ("uuid" = String, Path, description = "24-character hexadecimal user id"),
        ("email" = String, Path, description = "New email address"),
        ("username" = String, Path, description = "New login name"),
        ("password" = String, Path, description = "New password")
    ),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Malformed id or update failure", body = ErrorEnvelope),
        (status = 404, description = "No such user", body = ErrorEnvelope),
        (status = 418, description = "Unclassified failure", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/users/{uuid}/{email}/{username}/{password}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String, String)>,
) -> ApiResult<HttpResponse> {
    let (raw_id, email, username, password) = path.into_inner();
    let id = parse_user_id(&raw_id)?;
    let changes = UserChanges::replace_all(email, username, password);
    let user = state.users.replace(&id, changes).await?;
    json_response(StatusCode::OK, &UserResponse::from(&user))
}

/// Overwrite the attributes whose segment is not `pass`.
#[utoipa::path(
    patch,
    path = "/users/{uuid}/{email}/{username}/{password}",
    params(
        ("uuid" = String, Path, description = "24-character hexadecimal user id"),
        ("email" = String, Path, description = "New email address, or `pass` to keep"),
        ("username" = String, Path, description = "New login name, or `pass` to keep"),
        ("password" = String, Path, description = "New password, or `pass` to keep")
    ),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Malformed id or update failure", body = ErrorEnvelope),
        (status = 404, description = "No such user", body = ErrorEnvelope),
        (status = 418, description = "Unclassified failure", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "patchUser"
)]
#[patch("/users/{uuid}/{email}/{username}/{password}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String, String)>,
) -> ApiResult<HttpResponse> {
    let (raw_id, email, username, password) = path.into_inner();
    let id = parse_user_id(&raw_id)?;
    let changes = UserChanges {
        email: keep_or_replace(email),
        username: keep_or_replace(username),
        password_hash: keep_or_replace(password),
    };
    let user = state.users.patch(&id, changes).await?;
    json_response(StatusCode::OK, &UserResponse::from(&user))
}

/// Remove a user.
#[utoipa::path(
    delete,
    path = "/users/{uuid}",
    params(("uuid" = String, Path, description = "24-character hexadecimal user id")),
    responses(
        (status = 200, description = "Confirmation message", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed id or delete failure", body = ErrorEnvelope),
        (status = 404, description = "No such user", body = ErrorEnvelope),
        (status = 418, description = "Unclassified failure", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{uuid}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    state.users.delete(&id).await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(format!("User with ID: {id} deleted")))
}

/// Register every user route.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::inbound::http::users;
///
/// let app = App::new().configure(users::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(create_user)
        .service(get_user)
        .service(replace_user)
        .service(patch_user)
        .service(delete_user);
}

#[cfg(test)]
mod tests;
