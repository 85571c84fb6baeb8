//! Handler tests driving the full route table through the response mapper.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{InMemoryUserRepository, MockUserRepository, UserPersistenceError};
use crate::inbound::http::error::ErrorBodyPolicy;
use crate::middleware::ResponseMapper;
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

fn test_app(
    repository: Arc<dyn crate::domain::ports::UserRepository>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::new(repository)))
        .wrap(ResponseMapper::new(ErrorBodyPolicy::Own))
        .configure(configure)
}

#[fixture]
fn existing() -> User {
    User::new(UserId::decode(ID).expect("valid id"), "a", "b", "c")
}

#[fixture]
fn seeded(existing: User) -> InMemoryUserRepository {
    InMemoryUserRepository::with_users([existing])
}

async fn send(
    repository: Arc<dyn crate::domain::ports::UserRepository>,
    request: actix_test::TestRequest,
) -> ServiceResponse<BoxBody> {
    let app = actix_test::init_service(test_app(repository)).await;
    actix_test::call_service(&app, request.to_request()).await
}

#[rstest]
#[actix_web::test]
async fn listing_an_empty_collection_returns_an_empty_array() {
    let res = send(
        Arc::new(InMemoryUserRepository::new()),
        actix_test::TestRequest::get().uri("/users"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = actix_test::read_body(res).await;
    assert_eq!(body.as_ref(), b"[]");
}

#[rstest]
#[actix_web::test]
async fn listing_failures_are_reported_as_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_all()
        .return_once(|| Err(UserPersistenceError::query("cursor died")));

    let res = send(Arc::new(repo), actix_test::TestRequest::get().uri("/users")).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: ErrorEnvelope = actix_test::read_body_json(res).await;
    assert_eq!(body, ErrorEnvelope::not_found());
}

#[rstest]
#[actix_web::test]
async fn listing_omits_password_hashes(seeded: InMemoryUserRepository) {
    let res = send(Arc::new(seeded), actix_test::TestRequest::get().uri("/users")).await;

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!([{ "id": ID, "email": "a", "username": "b" }]));
}

#[rstest]
#[actix_web::test]
async fn create_echoes_the_submitted_fields_with_201() {
    let repo = InMemoryUserRepository::new();
    let res = send(
        Arc::new(repo.clone()),
        actix_test::TestRequest::post().uri("/users/ada@example.com/ada/hunter2"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({ "email": "ada@example.com", "username": "ada", "password": "hunter2" })
    );
    assert_eq!(repo.len().await, 1);
}

#[rstest]
#[actix_web::test]
async fn create_failures_carry_the_create_code() {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .return_once(|_| Err(UserPersistenceError::timeout("create")));

    let res = send(
        Arc::new(repo),
        actix_test::TestRequest::post().uri("/users/ada@example.com/ada/hunter2"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ErrorEnvelope = actix_test::read_body_json(res).await;
    assert_eq!(body.code, "E-0991");
    assert_eq!(body.message, "error create user with name: ada");
}

#[rstest]
#[actix_web::test]
async fn get_returns_the_user(seeded: InMemoryUserRepository) {
    let res = send(
        Arc::new(seeded),
        actix_test::TestRequest::get().uri(&format!("/users/{ID}")),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: UserResponse = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        UserResponse {
            id: ID.to_owned(),
            email: "a".to_owned(),
            username: "b".to_owned(),
        }
    );
}

#[rstest]
#[actix_web::test]
async fn get_of_a_missing_user_is_404() {
    let res = send(
        Arc::new(InMemoryUserRepository::new()),
        actix_test::TestRequest::get().uri(&format!("/users/{ID}")),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case(actix_test::TestRequest::get().uri("/users/not-an-id"))]
#[case(actix_test::TestRequest::delete().uri("/users/not-an-id"))]
#[case(actix_test::TestRequest::put().uri("/users/not-an-id/x/y/z"))]
#[case(actix_test::TestRequest::patch().uri("/users/not-an-id/x/y/z"))]
#[actix_web::test]
async fn malformed_ids_are_rejected_with_400(#[case] request: actix_test::TestRequest) {
    let res = send(Arc::new(InMemoryUserRepository::new()), request).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ErrorEnvelope = actix_test::read_body_json(res).await;
    assert_eq!(body.code, "E-0992");
    assert_eq!(
        body.message,
        "failed to convert user ID to ObjectId. ID=not-an-id"
    );
}

#[rstest]
#[actix_web::test]
async fn put_overwrites_every_attribute(seeded: InMemoryUserRepository) {
    let res = send(
        Arc::new(seeded.clone()),
        actix_test::TestRequest::put().uri(&format!("/users/{ID}/x/y/z")),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let id = UserId::decode(ID).expect("valid id");
    let stored = crate::domain::ports::UserRepository::find_one(&seeded, &id)
        .await
        .expect("stored");
    assert_eq!(stored, User::new(id, "x", "y", "z"));
}

#[rstest]
#[actix_web::test]
async fn patch_keeps_segments_marked_pass(seeded: InMemoryUserRepository) {
    let res = send(
        Arc::new(seeded.clone()),
        actix_test::TestRequest::patch().uri(&format!("/users/{ID}/pass/new/pass")),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "id": ID, "email": "a", "username": "new" }));
    let id = UserId::decode(ID).expect("valid id");
    let stored = crate::domain::ports::UserRepository::find_one(&seeded, &id)
        .await
        .expect("stored");
    assert_eq!(stored, User::new(id, "a", "new", "c"));
}

#[rstest]
#[case(actix_test::TestRequest::put())]
#[case(actix_test::TestRequest::patch())]
#[actix_web::test]
async fn updating_a_missing_user_is_404(#[case] request: actix_test::TestRequest) {
    let res = send(
        Arc::new(InMemoryUserRepository::new()),
        request.uri(&format!("/users/{ID}/x/y/z")),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: ErrorEnvelope = actix_test::read_body_json(res).await;
    assert_eq!(body, ErrorEnvelope::not_found());
}

#[rstest]
#[actix_web::test]
async fn delete_confirms_in_plain_text(seeded: InMemoryUserRepository) {
    let res = send(
        Arc::new(seeded.clone()),
        actix_test::TestRequest::delete().uri(&format!("/users/{ID}")),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    let body = actix_test::read_body(res).await;
    assert_eq!(body.as_ref(), format!("User with ID: {ID} deleted").as_bytes());
    assert!(seeded.is_empty().await);
}

#[rstest]
#[actix_web::test]
async fn deleting_a_missing_user_is_404() {
    let res = send(
        Arc::new(InMemoryUserRepository::new()),
        actix_test::TestRequest::delete().uri(&format!("/users/{ID}")),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: ErrorEnvelope = actix_test::read_body_json(res).await;
    assert_eq!(body, ErrorEnvelope::not_found());
}

#[rstest]
#[actix_web::test]
async fn raw_storage_failures_surface_as_418() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_one()
        .return_once(|_| Err(UserPersistenceError::connection("refused")));

    let res = send(
        Arc::new(repo),
        actix_test::TestRequest::put().uri(&format!("/users/{ID}/x/y/z")),
    )
    .await;

    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
    let body: ErrorEnvelope = actix_test::read_body_json(res).await;
    assert_eq!(body.code, "US-000000");
    assert_eq!(
        body.developer_message,
        "user repository connection failed: refused"
    );
}

#[rstest]
#[case("pass", None)]
#[case("Pass", Some("Pass"))]
#[case("x", Some("x"))]
fn only_the_exact_sentinel_keeps_a_value(#[case] segment: &str, #[case] expected: Option<&str>) {
    assert_eq!(keep_or_replace(segment.to_owned()).as_deref(), expected);
}
