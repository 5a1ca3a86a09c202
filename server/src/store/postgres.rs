use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::error::StoreError;
use crate::models::{
    Category, CategoryChanges, NewCategory, NewTodo, NewUser, Todo, TodoChanges, User,
};

const TODO_COLUMNS: &str = "id, text, completed, category_id, user_id, created_at";

/// Postgres-backed store. Cloning shares the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!(max_connections, "connected to postgres");
        Ok(Self::new(pool))
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

impl Store for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, avatar FROM users ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, avatar) VALUES ($1, $2) RETURNING id, name, avatar",
        )
        .bind(user.name)
        .bind(user.avatar)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, color FROM categories ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, color) VALUES ($1, $2) RETURNING id, name, color",
        )
        .bind(category.name)
        .bind(category.color)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories
             SET name = COALESCE($2, name), color = COALESCE($3, color)
             WHERE id = $1
             RETURNING id, name, color",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.color)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn count_todos_in_category(&self, id: Uuid) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE category_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_todos(&self, user_id: Option<Uuid>) -> Result<Vec<Todo>, StoreError> {
        let todos = match user_id {
            Some(user_id) => {
                sqlx::query_as::<_, Todo>(&format!(
                    "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1 ORDER BY created_at, id"
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Todo>(&format!(
                    "SELECT {TODO_COLUMNS} FROM todos ORDER BY created_at, id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(todos)
    }

    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (text, category_id, user_id) VALUES ($1, $2, $3)
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(todo.text)
        .bind(todo.category_id)
        .bind(todo.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn update_todo(&self, id: Uuid, changes: TodoChanges) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos
             SET text = COALESCE($2, text), category_id = COALESCE($3, category_id)
             WHERE id = $1
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.text)
        .bind(changes.category_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn toggle_todo(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos SET completed = NOT completed WHERE id = $1 RETURNING {TODO_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn delete_todo(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
