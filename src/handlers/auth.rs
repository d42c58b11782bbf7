//! Login and logout handlers

use axum::{
    extract::{Form, FromRequest, Request},
    http::Method,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::models::{str_field, u64_field};
use crate::session::{AuthGate, Session};
use crate::templates;
use crate::AppState;

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login screen and credential check.
///
/// Already-authenticated callers go straight to the dashboard. A POST with
/// valid credentials establishes the session identity; anything else
/// re-renders the form with an error.
pub async fn login(
    state: &AppState,
    session: &Session,
    request: Request,
) -> Result<Response, AuthGate> {
    if session.is_authenticated() {
        return Ok(Redirect::to(&state.url("/dashboard")).into_response());
    }

    if request.method() != Method::POST {
        return Ok(login_page(state, None));
    }

    let Ok(Form(form)) = Form::<LoginForm>::from_request(request, &()).await else {
        return Ok(login_page(state, Some("Please fill in all fields")));
    };

    let email = form.email.trim().to_string();
    if email.is_empty() || form.password.is_empty() {
        return Ok(login_page(state, Some("Please fill in all fields")));
    }

    match state.users().authenticate(&email, &form.password) {
        Some(user) => {
            let user_id = u64_field(&user, "id").unwrap_or(0);
            session.set_auth(user_id, str_field(&user, "name"), str_field(&user, "role"));
            tracing::info!("User {} logged in", email);
            Ok(Redirect::to(&state.url("/dashboard")).into_response())
        }
        None => {
            tracing::debug!("Failed login for {}", email);
            Ok(login_page(state, Some("Invalid e-mail or password")))
        }
    }
}

/// Destroy the session and return to the login screen
pub async fn logout(state: &AppState, session: &mut Session) -> Result<Response, AuthGate> {
    session.destroy();
    Ok(Redirect::to(&state.url("/auth/login")).into_response())
}

fn login_page(state: &AppState, error: Option<&str>) -> Response {
    Html(templates::login_page(state.base_path(), error)).into_response()
}
