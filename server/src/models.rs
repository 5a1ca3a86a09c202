//! Rows and write payloads for the three tables.
//!
//! # Design
//! Row types derive `sqlx::FromRow` so the Postgres store can decode them
//! directly, and `Serialize` so handlers can return them as-is. Request
//! payloads keep every field optional: presence is checked by the handlers,
//! which report a missing field as a validation error instead of letting the
//! JSON extractor reject the body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Color written when a category is created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#4F46E5";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// --- request bodies ---

#[derive(Debug, Default, Deserialize)]
pub struct CreateUser {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCategory {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTodo {
    pub text: Option<String>,
    pub category_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    pub text: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TodoFilter {
    pub user_id: Option<String>,
}

/// Body returned by successful deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub success: bool,
}

// --- validated store inputs ---

#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
}

/// Fields written by a category update. `None` leaves the column untouched.
#[derive(Clone, Debug, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewTodo {
    pub text: String,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
}

/// Fields written by a todo update. `None` leaves the column untouched.
#[derive(Clone, Debug, Default)]
pub struct TodoChanges {
    pub text: Option<String>,
    pub category_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_snake_case_fields() {
        let todo = Todo {
            id: Uuid::nil(),
            text: "Test".to_string(),
            completed: false,
            category_id: None,
            user_id: Uuid::nil(),
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["text"], "Test");
        assert_eq!(json["completed"], false);
        assert!(json["category_id"].is_null());
        assert_eq!(json["user_id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn create_todo_accepts_missing_fields() {
        let input: CreateTodo = serde_json::from_str(r#"{"text":"Only text"}"#).unwrap();
        assert_eq!(input.text.as_deref(), Some("Only text"));
        assert!(input.user_id.is_none());
        assert!(input.category_id.is_none());
    }

    #[test]
    fn create_todo_rejects_malformed_user_id() {
        let result: Result<CreateTodo, _> =
            serde_json::from_str(r#"{"text":"x","user_id":"not-a-uuid"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.text.is_none());
        assert!(input.category_id.is_none());
    }
}
