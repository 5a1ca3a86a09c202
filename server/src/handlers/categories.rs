use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{parse_id, present, JsonBody};
use crate::error::ApiError;
use crate::models::{
    Category, CategoryChanges, CreateCategory, Deleted, NewCategory, UpdateCategory,
    DEFAULT_CATEGORY_COLOR,
};
use crate::store::Store;

pub async fn list_categories<S: Store>(
    State(store): State<Arc<S>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(store.list_categories().await?))
}

pub async fn create_category<S: Store>(
    State(store): State<Arc<S>>,
    JsonBody(input): JsonBody<CreateCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name =
        present(input.name).ok_or_else(|| ApiError::Validation("name is required".to_string()))?;
    let color = present(input.color).unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());
    let category = store.insert_category(NewCategory { name, color }).await?;
    tracing::info!(category_id = %category.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateCategory>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_id(&id)?;
    let name =
        present(input.name).ok_or_else(|| ApiError::Validation("name is required".to_string()))?;
    let changes = CategoryChanges {
        name: Some(name),
        color: present(input.color),
    };
    let category = store
        .update_category(id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("category not found".to_string()))?;
    Ok(Json(category))
}

/// Deletes a category unless a todo still references it.
pub async fn delete_category<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    let id = parse_id(&id)?;
    let in_use = store.count_todos_in_category(id).await?;
    if in_use > 0 {
        tracing::debug!(category_id = %id, todos = in_use, "category delete blocked");
        return Err(ApiError::Conflict("category is in use by todos".to_string()));
    }
    let removed = store.delete_category(id).await?;
    tracing::info!(category_id = %id, removed, "category deleted");
    Ok(Json(Deleted { success: true }))
}
