use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::{present, JsonBody};
use crate::error::ApiError;
use crate::models::{CreateUser, NewUser, User};
use crate::store::Store;

pub async fn list_users<S: Store>(
    State(store): State<Arc<S>>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(store.list_users().await?))
}

pub async fn create_user<S: Store>(
    State(store): State<Arc<S>>,
    JsonBody(input): JsonBody<CreateUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let name =
        present(input.name).ok_or_else(|| ApiError::Validation("name is required".to_string()))?;
    let user = store
        .insert_user(NewUser {
            name,
            avatar: present(input.avatar),
        })
        .await?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}
