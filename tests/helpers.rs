//! Integration test helpers
//!
//! Build the full application in-process and drive it with oneshot
//! requests; no network involved.

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use taskdeck::models::UserFields;
use taskdeck::{create_app, AppState, WebConfig};

/// In-process test application
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    _data_dir: TempDir,
}

/// Build a test app served at the root
pub fn spawn_app() -> TestApp {
    spawn_app_at("")
}

/// Build a test app deployed under a base path
pub fn spawn_app_at(base_path: &str) -> TestApp {
    let data_dir = TempDir::new().unwrap();

    let config = WebConfig {
        data_dir: data_dir.path().join("data").to_string_lossy().into_owned(),
        base_path: base_path.to_string(),
        dev_mode: true,
        ..WebConfig::default()
    };

    let state = AppState::new(config).unwrap();
    let app = create_app(state.clone());

    TestApp {
        app,
        state,
        _data_dir: data_dir,
    }
}

impl TestApp {
    /// Insert a user straight through the model layer
    pub fn create_user(&self, name: &str, email: &str, password: &str, role: &str) -> u64 {
        self.state
            .users()
            .create(UserFields {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role: role.to_string(),
            })
            .unwrap()
    }

    pub async fn get(&self, path: &str) -> Response<Body> {
        self.request("GET", path, None, None, None).await
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> Response<Body> {
        self.request("GET", path, None, None, Some(cookie)).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        body: &str,
        cookie: Option<&str>,
    ) -> Response<Body> {
        self.request(
            "POST",
            path,
            Some(body.to_string()),
            Some("application/x-www-form-urlencoded"),
            cookie,
        )
        .await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        cookie: Option<&str>,
    ) -> Response<Body> {
        self.request(
            "POST",
            path,
            Some(body.to_string()),
            Some("application/json"),
            cookie,
        )
        .await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
        content_type: Option<&str>,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = builder
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .unwrap();

        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Log in through the form and return the session cookie
    pub async fn login(&self, email: &str, password: &str) -> String {
        self.login_at("/auth/login", email, password).await
    }

    /// Log in through a base-path-prefixed login route
    pub async fn login_at(&self, path: &str, email: &str, password: &str) -> String {
        let response = self
            .post_form(path, &format!("email={}&password={}", email, password), None)
            .await;
        session_cookie(&response).expect("login should set a session cookie")
    }
}

/// Extract the `name=value` pair from a response's Set-Cookie header
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(|s| s.to_string())
}

/// Read a response body as a string
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a response is a 303 redirect to the given location
pub fn assert_is_redirect_to(response: &Response<Body>, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        location,
        "unexpected redirect target"
    );
}
