//! Kanban board handlers

use axum::{
    extract::{Form, FromRequest, Request},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::{AuthGate, Session};
use crate::store::Record;
use crate::templates;
use crate::AppState;

/// Board move payload sent by the drag-and-drop client
#[derive(Debug, Deserialize)]
pub struct TaskUpdateRequest {
    pub id: u64,
    pub status: String,
    pub position: i64,
}

/// Board move outcome
#[derive(Debug, Serialize)]
pub struct TaskUpdateResponse {
    pub success: bool,
}

/// New-task form fields
#[derive(Debug, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Kanban board view
pub async fn kanban(state: &AppState, session: &Session) -> Result<Response, AuthGate> {
    session.require_authenticated(state.base_path())?;

    let tasks = state.tasks().get_all();
    Ok(Html(templates::kanban_page(state.base_path(), &tasks)).into_response())
}

/// Move a task between columns (programmatic endpoint, JSON in and out)
pub async fn update_task(
    state: &AppState,
    session: &Session,
    request: Request,
) -> Result<Response, AuthGate> {
    session.require_authenticated_api()?;

    if request.method() != Method::POST {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }

    let Ok(Json(payload)) = Json::<TaskUpdateRequest>::from_request(request, &()).await else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(TaskUpdateResponse { success: false }),
        )
            .into_response());
    };

    let success = match state
        .tasks()
        .update_status(payload.id, &payload.status, payload.position)
    {
        Ok(moved) => moved,
        Err(e) => {
            tracing::error!("Task update failed: {}", e);
            false
        }
    };

    Ok(Json(TaskUpdateResponse { success }).into_response())
}

/// Create a task from the board form, owned by the session user
pub async fn create_task(
    state: &AppState,
    session: &Session,
    request: Request,
) -> Result<Response, AuthGate> {
    session.require_authenticated(state.base_path())?;

    if request.method() != Method::POST {
        return Ok(back_to_board(state));
    }

    let Ok(Form(form)) = Form::<TaskForm>::from_request(request, &()).await else {
        return Ok(back_to_board(state));
    };

    let mut fields = Record::new();
    fields.insert("title".to_string(), Value::from(form.title));
    fields.insert("description".to_string(), Value::from(form.description));
    fields.insert("status".to_string(), Value::from("todo"));
    fields.insert("position".to_string(), Value::from(0));
    fields.insert(
        "user_id".to_string(),
        Value::from(session.user_id().unwrap_or_default()),
    );

    match state.tasks().create(fields) {
        Ok(_) => Ok(back_to_board(state)),
        Err(e) => Ok(super::internal_error(e)),
    }
}

fn back_to_board(state: &AppState) -> Response {
    Redirect::to(&state.url("/tasks/kanban")).into_response()
}
