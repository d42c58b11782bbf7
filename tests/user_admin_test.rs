//! User administration flows

mod helpers;

use helpers::{assert_is_redirect_to, body_string, spawn_app};

#[tokio::test]
async fn admin_sees_the_user_listing() {
    let app = spawn_app();
    app.create_user("Root", "root@example.com", "secret", "admin");
    let cookie = app.login("root@example.com", "secret").await;

    let response = app.get_with_cookie("/dashboard/users", &cookie).await;
    assert_eq!(response.status(), 200);
    let body = body_string(response).await;
    assert!(body.contains("root@example.com"));
}

#[tokio::test]
async fn non_admin_is_sent_back_to_the_dashboard() {
    let app = spawn_app();
    app.create_user("Ada", "ada@example.com", "secret", "user");
    let cookie = app.login("ada@example.com", "secret").await;

    let response = app.get_with_cookie("/dashboard/users", &cookie).await;
    assert_is_redirect_to(&response, "/dashboard");
}

#[tokio::test]
async fn create_user_via_form_appears_in_the_listing() {
    let app = spawn_app();
    app.create_user("Root", "root@example.com", "secret", "admin");
    let cookie = app.login("root@example.com", "secret").await;

    let response = app
        .post_form(
            "/dashboard/user/create",
            "name=John&email=john@example.com&password=pw123&role=user",
            Some(&cookie),
        )
        .await;
    assert_is_redirect_to(&response, "/dashboard/users");

    let listing = app.get_with_cookie("/dashboard/users", &cookie).await;
    let body = body_string(listing).await;
    assert!(body.contains("john@example.com"));

    // The created user can log in
    app.login("john@example.com", "pw123").await;
}

#[tokio::test]
async fn edit_with_blank_password_keeps_the_old_one() {
    let app = spawn_app();
    app.create_user("Root", "root@example.com", "secret", "admin");
    let id = app.create_user("Ada", "ada@example.com", "secret", "user");
    let cookie = app.login("root@example.com", "secret").await;

    let response = app
        .post_form(
            "/dashboard/user/edit",
            &format!("id={}&name=Ada+L.&email=ada@example.com&password=&role=user", id),
            Some(&cookie),
        )
        .await;
    assert_is_redirect_to(&response, "/dashboard/users");

    // Name changed, password untouched
    app.login("ada@example.com", "secret").await;
    let user = app.state.users().find_by_id(id).unwrap();
    assert_eq!(user.get("name").and_then(|v| v.as_str()), Some("Ada L."));
}

#[tokio::test]
async fn delete_user_removes_the_record() {
    let app = spawn_app();
    app.create_user("Root", "root@example.com", "secret", "admin");
    let id = app.create_user("Ada", "ada@example.com", "secret", "user");
    let cookie = app.login("root@example.com", "secret").await;

    let response = app
        .post_form(
            "/dashboard/user/delete",
            &format!("id={}", id),
            Some(&cookie),
        )
        .await;
    assert_is_redirect_to(&response, "/dashboard/users");
    assert!(app.state.users().find_by_id(id).is_none());
}

#[tokio::test]
async fn user_mutations_ignore_non_post_requests() {
    let app = spawn_app();
    let id = app.create_user("Ada", "ada@example.com", "secret", "user");
    let cookie = app.login("ada@example.com", "secret").await;

    let response = app.get_with_cookie("/dashboard/user/delete", &cookie).await;
    assert_is_redirect_to(&response, "/dashboard/users");
    assert!(app.state.users().find_by_id(id).is_some());
}
