use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{parse_id, present, JsonBody, QueryParams};
use crate::error::ApiError;
use crate::models::{CreateTodo, Deleted, NewTodo, Todo, TodoChanges, TodoFilter, UpdateTodo};
use crate::store::Store;

pub async fn list_todos<S: Store>(
    State(store): State<Arc<S>>,
    QueryParams(filter): QueryParams<TodoFilter>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    // An empty `user_id=` means no filter.
    let user_id = match present(filter.user_id) {
        Some(raw) => Some(parse_id(&raw)?),
        None => None,
    };
    Ok(Json(store.list_todos(user_id).await?))
}

pub async fn create_todo<S: Store>(
    State(store): State<Arc<S>>,
    JsonBody(input): JsonBody<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let (Some(text), Some(user_id)) = (present(input.text), input.user_id) else {
        return Err(ApiError::Validation(
            "text and user_id are required".to_string(),
        ));
    };
    let todo = store
        .insert_todo(NewTodo {
            text,
            category_id: input.category_id,
            user_id,
        })
        .await?;
    tracing::info!(todo_id = %todo.id, user_id = %todo.user_id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateTodo>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    // Present but blank text is refused rather than stored.
    let text = input
        .text
        .map(|raw| {
            present(Some(raw))
                .ok_or_else(|| ApiError::Validation("text cannot be empty".to_string()))
        })
        .transpose()?;
    let changes = TodoChanges {
        text,
        category_id: input.category_id,
    };
    let todo = store
        .update_todo(id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("todo not found".to_string()))?;
    Ok(Json(todo))
}

pub async fn toggle_todo<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let todo = store
        .toggle_todo(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("todo not found".to_string()))?;
    tracing::debug!(todo_id = %todo.id, completed = todo.completed, "todo toggled");
    Ok(Json(todo))
}

pub async fn delete_todo<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    let id = parse_id(&id)?;
    let removed = store.delete_todo(id).await?;
    tracing::info!(todo_id = %id, removed, "todo deleted");
    Ok(Json(Deleted { success: true }))
}
