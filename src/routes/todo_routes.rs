//! Todo endpoints, scoped to the caller.

use axum::extract::{Path, State};
use axum::{
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::access::OwnedCollection;
use crate::models::{Identity, Todo};
use crate::state::AppState;
use crate::utils::http_helpers::{HTTPError, JsonBody};

/// Registers todo routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{todo_id}",
            put(update_todo).delete(delete_todo),
        )
}

async fn create_todo(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(todo): JsonBody<Todo>,
) -> Result<Json<Todo>, HTTPError> {
    let todos = OwnedCollection::<Todo>::new(state.store.as_ref(), &identity);
    Ok(Json(todos.create(todo).await?))
}

async fn list_todos(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<Todo>>, HTTPError> {
    let todos = OwnedCollection::<Todo>::new(state.store.as_ref(), &identity);
    Ok(Json(todos.list().await?))
}

async fn update_todo(
    identity: Identity,
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
    JsonBody(todo): JsonBody<Todo>,
) -> Result<Json<Todo>, HTTPError> {
    let todos = OwnedCollection::<Todo>::new(state.store.as_ref(), &identity);
    Ok(Json(todos.update(&todo_id, todo).await?))
}

async fn delete_todo(
    identity: Identity,
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
) -> Result<Json<Value>, HTTPError> {
    OwnedCollection::<Todo>::new(state.store.as_ref(), &identity)
        .delete(&todo_id)
        .await?;
    Ok(Json(json!({ "message": "Todo deleted successfully" })))
}
