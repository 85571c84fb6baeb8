//! End-to-end user lifecycle over the public HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};
use user_service::domain::ports::{
    DeadlineUserRepository, InMemoryUserRepository, RequestDeadlines,
};
use user_service::inbound::http::error::ErrorBodyPolicy;
use user_service::inbound::http::state::HttpState;
use user_service::inbound::http::users;
use user_service::middleware::{ResponseMapper, TRACE_ID_HEADER};

fn state(repository: InMemoryUserRepository) -> web::Data<HttpState> {
    let deadlines = RequestDeadlines {
        create: Duration::from_secs(1),
        request: Duration::from_secs(1),
    };
    web::Data::new(HttpState::new(Arc::new(DeadlineUserRepository::new(
        repository, deadlines,
    ))))
}

#[rstest]
#[actix_web::test]
async fn user_lifecycle_round_trips_through_every_route() {
    let repository = InMemoryUserRepository::new();
    let app = actix_test::init_service(
        App::new()
            .app_data(state(repository.clone()))
            .wrap(ResponseMapper::new(ErrorBodyPolicy::Own))
            .configure(users::configure),
    )
    .await;

    let created = actix_test::TestRequest::post()
        .uri("/users/ada@example.com/ada/hunter2")
        .to_request();
    let res = actix_test::call_service(&app, created).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"email": "ada@example.com", "username": "ada", "password": "hunter2"})
    );
    assert_eq!(repository.len().await, 1);

    let listed: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get().uri("/users").to_request(),
    )
    .await;
    let id = listed
        .get(0)
        .and_then(|user| user.get("id"))
        .and_then(Value::as_str)
        .expect("listed user id")
        .to_owned();
    assert_eq!(id.len(), 24);

    let fetched: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(
        fetched,
        json!({"id": id, "email": "ada@example.com", "username": "ada"})
    );

    let patched: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/users/{id}/pass/lovelace/pass"))
            .to_request(),
    )
    .await;
    assert_eq!(
        patched,
        json!({"id": id, "email": "ada@example.com", "username": "lovelace"})
    );

    let replaced: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/users/{id}/countess@example.com/ada/s3cret"))
            .to_request(),
    )
    .await;
    assert_eq!(
        replaced,
        json!({"id": id, "email": "countess@example.com", "username": "ada"})
    );

    let deleted = actix_test::call_and_read_body(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/users/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(deleted, format!("User with ID: {id} deleted").as_bytes());

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"code": "US-000003", "message": "not found", "developer_message": ""})
    );
    assert!(repository.is_empty().await);
}

#[rstest]
#[case(ErrorBodyPolicy::Own, "E-0992")]
#[case(ErrorBodyPolicy::CollapseToNotFound, "US-000003")]
#[actix_web::test]
async fn malformed_ids_follow_the_configured_body_policy(
    #[case] policy: ErrorBodyPolicy,
    #[case] expected_code: &str,
) {
    let app = actix_test::init_service(
        App::new()
            .app_data(state(InMemoryUserRepository::new()))
            .wrap(ResponseMapper::new(policy))
            .configure(users::configure),
    )
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/users/zz").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some(expected_code));
}
