//! Dashboard home and user administration handlers

use axum::{
    extract::{Form, FromRequest, Request},
    http::Method,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::models::{str_field, UserFields};
use crate::session::{AuthGate, Session};
use crate::templates;
use crate::AppState;

/// User create/edit/delete form fields
#[derive(Debug, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

impl UserForm {
    fn into_fields(self) -> UserFields {
        UserFields {
            name: self.name,
            email: self.email,
            password: self.password,
            role: self.role,
        }
    }
}

/// Dashboard home
pub async fn index(state: &AppState, session: &Session) -> Result<Response, AuthGate> {
    session.require_authenticated(state.base_path())?;

    let name = session
        .user_id()
        .and_then(|id| state.users().find_by_id(id))
        .map(|user| str_field(&user, "name").to_string())
        .unwrap_or_default();

    Ok(Html(templates::dashboard_page(state.base_path(), &name)).into_response())
}

/// User listing; admin role required, everyone else lands back on the
/// dashboard
pub async fn users(state: &AppState, session: &Session) -> Result<Response, AuthGate> {
    session.require_authenticated(state.base_path())?;

    let role = session.get("user_role");
    if role.as_ref().and_then(|r| r.as_str()) != Some("admin") {
        return Ok(Redirect::to(&state.url("/dashboard")).into_response());
    }

    let users = state.users().get_all();
    Ok(Html(templates::users_page(state.base_path(), &users)).into_response())
}

/// Create a user from the admin form
pub async fn create_user(
    state: &AppState,
    session: &Session,
    request: Request,
) -> Result<Response, AuthGate> {
    session.require_authenticated(state.base_path())?;

    if request.method() != Method::POST {
        return Ok(back_to_users(state));
    }

    let Ok(Form(form)) = Form::<UserForm>::from_request(request, &()).await else {
        return Ok(back_to_users(state));
    };

    match state.users().create(form.into_fields()) {
        Ok(id) => {
            tracing::info!("Created user {}", id);
            Ok(back_to_users(state))
        }
        Err(e) => Ok(super::internal_error(e)),
    }
}

/// Edit a user from the admin form
pub async fn edit_user(
    state: &AppState,
    session: &Session,
    request: Request,
) -> Result<Response, AuthGate> {
    session.require_authenticated(state.base_path())?;

    if request.method() != Method::POST {
        return Ok(back_to_users(state));
    }

    let Ok(Form(form)) = Form::<UserForm>::from_request(request, &()).await else {
        return Ok(back_to_users(state));
    };

    let Some(id) = form.id else {
        return Ok(back_to_users(state));
    };

    match state.users().update(id, form.into_fields()) {
        Ok(_) => Ok(back_to_users(state)),
        Err(e) => Ok(super::internal_error(e)),
    }
}

/// Delete a user from the admin form
pub async fn delete_user(
    state: &AppState,
    session: &Session,
    request: Request,
) -> Result<Response, AuthGate> {
    session.require_authenticated(state.base_path())?;

    if request.method() != Method::POST {
        return Ok(back_to_users(state));
    }

    let Ok(Form(form)) = Form::<UserForm>::from_request(request, &()).await else {
        return Ok(back_to_users(state));
    };

    if let Some(id) = form.id {
        match state.users().delete(id) {
            Ok(deleted) => {
                if deleted {
                    tracing::info!("Deleted user {}", id);
                }
            }
            Err(e) => return Ok(super::internal_error(e)),
        }
    }

    Ok(back_to_users(state))
}

fn back_to_users(state: &AppState) -> Response {
    Redirect::to(&state.url("/dashboard/users")).into_response()
}
