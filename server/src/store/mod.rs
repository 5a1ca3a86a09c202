//! Storage interface behind the HTTP handlers.
//!
//! # Design
//! Handlers are generic over `Store`, so the router is built once per backend
//! and no dynamic dispatch is needed. Each method maps to one statement
//! against one table. `PgStore` is the production backend; `MemoryStore`
//! keeps the same tables and foreign-key rules in process memory and is used
//! when no database is configured.

use std::future::Future;

use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    Category, CategoryChanges, NewCategory, NewTodo, NewUser, Todo, TodoChanges, User,
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub trait Store: Send + Sync + 'static {
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, StoreError>> + Send;

    fn insert_user(&self, user: NewUser) -> impl Future<Output = Result<User, StoreError>> + Send;

    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, StoreError>> + Send;

    fn insert_category(
        &self,
        category: NewCategory,
    ) -> impl Future<Output = Result<Category, StoreError>> + Send;

    /// Returns `None` when no category has this id.
    fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> impl Future<Output = Result<Option<Category>, StoreError>> + Send;

    fn count_todos_in_category(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Returns whether a row was removed.
    fn delete_category(&self, id: Uuid) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Todos ordered by creation time, optionally restricted to one owner.
    fn list_todos(
        &self,
        user_id: Option<Uuid>,
    ) -> impl Future<Output = Result<Vec<Todo>, StoreError>> + Send;

    fn insert_todo(&self, todo: NewTodo) -> impl Future<Output = Result<Todo, StoreError>> + Send;

    fn update_todo(
        &self,
        id: Uuid,
        changes: TodoChanges,
    ) -> impl Future<Output = Result<Option<Todo>, StoreError>> + Send;

    /// Negates `completed` in a single write.
    fn toggle_todo(&self, id: Uuid) -> impl Future<Output = Result<Option<Todo>, StoreError>> + Send;

    fn delete_todo(&self, id: Uuid) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
