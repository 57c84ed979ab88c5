// cobra-console/tests/access_guard.rs
// 访问控制测试

mod common;

use std::cell::Cell;

use cobra_console::shared::permissions::Permission;
use cobra_console::{AccessGuard, ConsoleConfig, Denial, GuardState, GuardView, Requirement};
use common::{MockApi, signed_in, store};
use serde_json::json;

#[tokio::test]
async fn test_pending_until_restore() {
    let api = MockApi::new();
    let (session, _) = store(&api);
    let guard = AccessGuard::new(Requirement::authenticated());

    let rendered = Cell::new(false);
    let view = guard.render(&session, || rendered.set(true));
    assert_eq!(view, GuardView::Loading);
    assert_eq!(guard.evaluate(&session), GuardState::Pending);
    assert!(!rendered.get());

    session.restore();
    assert_eq!(
        guard.evaluate(&session),
        GuardState::Denied(Denial::NotAuthenticated)
    );
}

#[tokio::test]
async fn test_no_session_redirects_to_login() {
    let api = MockApi::new();
    let (session, _) = store(&api);
    session.restore();

    let rendered = Cell::new(false);
    let guard = AccessGuard::new(Requirement::authenticated());
    let view = guard.render(&session, || rendered.set(true));
    assert_eq!(view, GuardView::Redirect("/login".into()));

    // a fallback is not offered to anonymous users
    let view = guard.render_with_fallback(&session, || rendered.set(true), |_| "no access");
    assert_eq!(view, GuardView::Redirect("/login".into()));
    assert!(!rendered.get());
}

#[tokio::test]
async fn test_wrong_role_redirects_to_dashboard() {
    let api = MockApi::new();
    let session = signed_in(&api, &["operator"]).await;

    let rendered = Cell::new(false);
    let guard = AccessGuard::new(Requirement::authenticated().role("admin"));
    assert_eq!(
        guard.evaluate(&session),
        GuardState::Denied(Denial::MissingRole("admin".into()))
    );
    let view = guard.render(&session, || rendered.set(true));
    assert_eq!(view, GuardView::Redirect("/dashboard".into()));
    assert!(!rendered.get());
}

#[tokio::test]
async fn test_fallback_replaces_redirect() {
    let api = MockApi::new();
    let session = signed_in(&api, &["public"]).await;

    let guard = AccessGuard::new(Requirement::authenticated().permission(Permission::ViewReports));
    let view = guard.render_with_fallback(&session, || "reports", |denial| format!("{denial:?}"));
    assert_eq!(
        view,
        GuardView::Fallback("MissingPermission(ViewReports)".to_string())
    );
}

#[tokio::test]
async fn test_allowed_renders_content() {
    let api = MockApi::new();
    let session = signed_in(&api, &["admin"]).await;

    let guard = AccessGuard::new(
        Requirement::authenticated()
            .role("admin")
            .any_role(["admin", "operator"])
            .permission(Permission::ManageUsers),
    );
    assert_eq!(guard.render(&session, || "users"), GuardView::Content("users"));
}

#[tokio::test]
async fn test_all_checks_must_pass() {
    let api = MockApi::new();
    let session = signed_in(&api, &["operator"]).await;

    // role passes, permission fails
    let guard = AccessGuard::new(
        Requirement::authenticated()
            .any_role(["operator"])
            .permission(Permission::ManageUsers),
    );
    assert_eq!(
        guard.evaluate(&session),
        GuardState::Denied(Denial::MissingPermission(Permission::ManageUsers))
    );

    let guard = AccessGuard::new(Requirement::authenticated().any_role(["admin", "public"]));
    assert_eq!(
        guard.evaluate(&session),
        GuardState::Denied(Denial::MissingAnyRole(vec!["admin".into(), "public".into()]))
    );

    // an empty role set adds no check
    let guard = AccessGuard::new(Requirement::authenticated().any_role(Vec::<String>::new()));
    assert_eq!(guard.evaluate(&session), GuardState::Allowed);
}

#[tokio::test]
async fn test_superuser_requirement() {
    let api = MockApi::new();
    let (session, _) = store(&api);
    session.restore();
    api.on(
        "POST",
        common::LOGIN,
        common::Reply::Json(json!({
            "success": true,
            "access_token": "su-tok",
            "user": {"id": 9, "name": "root", "roles": [], "is_superuser": true}
        })),
    );
    session.login("root", "toor").await.unwrap();

    let guard = AccessGuard::new(Requirement::authenticated().superuser());
    assert_eq!(guard.evaluate(&session), GuardState::Allowed);

    let api = MockApi::new();
    let admin = signed_in(&api, &["admin"]).await;
    assert_eq!(
        guard.evaluate(&admin),
        GuardState::Denied(Denial::NotSuperuser)
    );
}

#[tokio::test]
async fn test_expired_session_denies_next_render() {
    let api = MockApi::new();
    let session = signed_in(&api, &["admin"]).await;
    let guard = AccessGuard::new(Requirement::authenticated());
    assert_eq!(guard.render(&session, || ()), GuardView::Content(()));

    session.expire();
    assert_eq!(
        guard.render(&session, || ()),
        GuardView::Redirect("/login".into())
    );
}

#[tokio::test]
async fn test_denied_is_terminal_for_a_mount() {
    let api = MockApi::new();
    let (session, _) = store(&api);
    session.restore();

    let guard = AccessGuard::new(Requirement::authenticated());
    let mut mount = guard.mount(&session);
    assert_eq!(mount.state(), GuardState::Denied(Denial::NotAuthenticated));

    api.on("POST", common::LOGIN, common::login_ok("tok1", &["admin"]));
    session.login("admin", "admin123").await.unwrap();

    // same mount stays denied, a new navigation is allowed
    assert_eq!(mount.render(|| "admin"), GuardView::Redirect("/login".into()));
    assert_eq!(guard.mount(&session).state(), GuardState::Allowed);
}

#[tokio::test]
async fn test_routes_come_from_config() {
    let api = MockApi::new();
    let session = signed_in(&api, &["public"]).await;

    let config = ConsoleConfig::default().with_routes("/signin", "/home");
    let guard = config.guard(Requirement::authenticated().role("admin"));
    assert_eq!(guard.render(&session, || ()), GuardView::Redirect("/home".into()));
}
