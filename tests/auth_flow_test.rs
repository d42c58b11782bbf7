//! Login, logout and session gating through the full application

mod helpers;

use helpers::{assert_is_redirect_to, body_string, session_cookie, spawn_app};

#[tokio::test]
async fn login_page_renders_for_anonymous_visitors() {
    let app = spawn_app();

    for path in ["/", "/auth/login"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), 200, "{}", path);
        let body = body_string(response).await;
        assert!(body.contains("Sign in"));
    }
}

#[tokio::test]
async fn login_rejects_missing_fields() {
    let app = spawn_app();

    let response = app.post_form("/auth/login", "email=&password=", None).await;
    assert_eq!(response.status(), 200);
    let body = body_string(response).await;
    assert!(body.contains("Please fill in all fields"));
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = spawn_app();
    app.create_user("Ada", "ada@example.com", "secret", "user");

    let response = app
        .post_form("/auth/login", "email=ada@example.com&password=wrong", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = body_string(response).await;
    assert!(body.contains("Invalid e-mail or password"));
}

#[tokio::test]
async fn login_establishes_a_session_and_redirects() {
    let app = spawn_app();
    app.create_user("Ada", "ada@example.com", "secret", "user");

    let response = app
        .post_form("/auth/login", "email=ada@example.com&password=secret", None)
        .await;
    assert_is_redirect_to(&response, "/dashboard");
    let cookie = session_cookie(&response).expect("session cookie set on login");

    let dashboard = app.get_with_cookie("/dashboard", &cookie).await;
    assert_eq!(dashboard.status(), 200);
    let body = body_string(dashboard).await;
    assert!(body.contains("Welcome, Ada"));
}

#[tokio::test]
async fn already_authenticated_login_goes_to_the_dashboard() {
    let app = spawn_app();
    app.create_user("Ada", "ada@example.com", "secret", "user");
    let cookie = app.login("ada@example.com", "secret").await;

    let response = app.get_with_cookie("/auth/login", &cookie).await;
    assert_is_redirect_to(&response, "/dashboard");
}

#[tokio::test]
async fn every_protected_route_redirects_anonymous_callers() {
    let app = spawn_app();

    let protected = [
        "/dashboard",
        "/dashboard/users",
        "/dashboard/user/create",
        "/dashboard/user/edit",
        "/dashboard/user/delete",
        "/tasks/kanban",
        "/tasks/create",
    ];
    for path in protected {
        let response = app.get(path).await;
        assert_is_redirect_to(&response, "/auth/login");
    }
}

#[tokio::test]
async fn logout_destroys_the_session() {
    let app = spawn_app();
    app.create_user("Ada", "ada@example.com", "secret", "user");
    let cookie = app.login("ada@example.com", "secret").await;

    let response = app.get_with_cookie("/auth/logout", &cookie).await;
    assert_is_redirect_to(&response, "/auth/login");
    let cleared = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cleared.contains("Max-Age=0"));

    // The old token no longer authenticates
    let after = app.get_with_cookie("/dashboard", &cookie).await;
    assert_is_redirect_to(&after, "/auth/login");
}
