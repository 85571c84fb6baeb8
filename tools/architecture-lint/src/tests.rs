//! Unit tests for the architecture lint.

use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource::new(file, contents)])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case(
    "inbound/http/users.rs",
    "use crate::domain::UserId; fn handler() { let _ = UserId::decode(\"x\"); }",
    true
)]
#[case(
    "inbound/http/users.rs",
    "use crate::outbound::persistence::MongoUserRepository; fn handler() { let _ = MongoUserRepository::new; }",
    false
)]
#[case(
    "inbound/http/users.rs",
    "use outbound::persistence::MongoUserRepository; fn handler() {}",
    false
)]
#[case(
    "inbound/http/users.rs",
    "use user_service::outbound::persistence::connect; fn handler() {}",
    false
)]
#[case("inbound/http/users.rs", "use mongodb::bson::doc; fn handler() {}", false)]
#[case("inbound/http/users.rs", "fn handler() { let _ = bson::Document::new(); }", false)]
#[case("inbound/http/doc.rs", "use utoipa::ToSchema; #[derive(ToSchema)] struct Body;", true)]
#[case(
    "domain/user.rs",
    "use crate::inbound::http; fn thing() { let _ = 1; }",
    false
)]
#[case("domain/user.rs", "use utoipa::ToSchema; #[derive(ToSchema)] struct Foo;", false)]
#[case("domain/ports/user_repository.rs", "use mongodb::Collection; struct Repo;", false)]
#[case(
    "domain/user_service.rs",
    "use actix_web::HttpResponse; fn handler() { let _ = HttpResponse::Ok(); }",
    false
)]
#[case(
    "domain/ports/deadline_user_repository.rs",
    "use tokio::time::timeout; use async_trait::async_trait; struct Repo;",
    true
)]
#[case(
    "outbound/persistence/mongo_user_repository.rs",
    "use crate::inbound::http; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "outbound/persistence/mongo_user_repository.rs",
    "use inbound::http; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "outbound/persistence/mongo_user_repository.rs",
    "use actix_web::web; fn thing() {}",
    false
)]
#[case(
    "outbound/persistence/mongo_user_repository.rs",
    "use crate::domain::ports::UserRepository; use mongodb::Collection; struct Repo;",
    true
)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn files_outside_the_hexagon_cannot_be_classified(lint_single: LintSingle) {
    let result = lint_single.lint("settings.rs", "fn load() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
fn unparsable_sources_are_reported(lint_single: LintSingle) {
    let result = lint_single.lint("domain/user.rs", "fn broken( {");
    let Err(ArchitectureLintError::Parse { file, .. }) = result else {
        panic!("expected a parse error, got {result:?}");
    };
    assert_eq!(file, Utf8PathBuf::from("domain/user.rs"));
}

#[rstest]
fn repeated_imports_produce_one_violation_per_rule(lint_single: LintSingle) {
    let result = lint_single.lint(
        "domain/user.rs",
        "use mongodb::Client; use mongodb::Database; fn f() { let _ = mongodb::Collection::<()>::name; }",
    );
    let Err(ArchitectureLintError::Violations(violations)) = result else {
        panic!("expected violations, got {result:?}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations.first().map(|violation| violation.message.as_str()),
        Some("domain module must not depend on external crate `mongodb`")
    );
}

#[rstest]
fn violations_render_with_their_file() {
    let violation = Violation {
        file: Utf8PathBuf::from("inbound/http/users.rs"),
        message: "inbound module must not depend on crate::outbound".to_owned(),
    };
    assert_eq!(
        violation.to_string(),
        "inbound/http/users.rs: inbound module must not depend on crate::outbound"
    );
}
