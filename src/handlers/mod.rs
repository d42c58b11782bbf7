//! HTTP request handlers
//!
//! Every registered route flows through [`dispatch`]: resolve the route key
//! against the static table, open the caller's session, run the matched
//! handler, attach the session cookie. Unregistered paths get the terminal
//! 404 page.

pub mod auth;
pub mod dashboard;
pub mod tasks;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::routes::RouteTarget;
use crate::templates;
use crate::{AppState, WebError};

/// Fallback handler: route-table dispatch for every page request
pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path().to_string();

    let Some(target) = state.routes.resolve(&path) else {
        tracing::debug!("No route for {}", path);
        return not_found(&state);
    };

    let mut session = state.sessions.open(request.headers());

    let outcome = match target {
        RouteTarget::Login => auth::login(&state, &session, request).await,
        RouteTarget::Logout => auth::logout(&state, &mut session).await,
        RouteTarget::Dashboard => dashboard::index(&state, &session).await,
        RouteTarget::UserList => dashboard::users(&state, &session).await,
        RouteTarget::UserCreate => dashboard::create_user(&state, &session, request).await,
        RouteTarget::UserEdit => dashboard::edit_user(&state, &session, request).await,
        RouteTarget::UserDelete => dashboard::delete_user(&state, &session, request).await,
        RouteTarget::Kanban => tasks::kanban(&state, &session).await,
        RouteTarget::TaskUpdate => tasks::update_task(&state, &session, request).await,
        RouteTarget::TaskCreate => tasks::create_task(&state, &session, request).await,
    };

    // The auth gate short-circuits here; handlers never see the request
    let response = outcome.unwrap_or_else(IntoResponse::into_response);

    session.finish(response)
}

fn not_found(state: &AppState) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(templates::not_found_page(state.base_path())),
    )
        .into_response()
}

/// Storage failures surface as a plain 500 page
pub(crate) fn internal_error(err: WebError) -> Response {
    tracing::error!("Request failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(templates::error_page()),
    )
        .into_response()
}
