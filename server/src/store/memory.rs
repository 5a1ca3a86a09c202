use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::error::StoreError;
use crate::models::{
    Category, CategoryChanges, NewCategory, NewTodo, NewUser, Todo, TodoChanges, User,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    todos: Vec<Todo>,
}

impl Tables {
    fn check_user(&self, id: Uuid) -> Result<(), StoreError> {
        if self.users.iter().any(|u| u.id == id) {
            return Ok(());
        }
        Err(StoreError::Constraint(format!("user {id} does not exist")))
    }

    fn check_category(&self, id: Option<Uuid>) -> Result<(), StoreError> {
        match id {
            Some(id) if !self.categories.iter().any(|c| c.id == id) => Err(
                StoreError::Constraint(format!("category {id} does not exist")),
            ),
            _ => Ok(()),
        }
    }
}

/// Process-local store. Rows live as long as the value does.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            avatar: user.avatar,
        };
        self.tables.write().await.users.push(row.clone());
        Ok(row)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category, StoreError> {
        let row = Category {
            id: Uuid::new_v4(),
            name: category.name,
            color: category.color,
        };
        self.tables.write().await.categories.push(row.clone());
        Ok(row)
    }

    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(category) = tables.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(color) = changes.color {
            category.color = color;
        }
        Ok(Some(category.clone()))
    }

    async fn count_todos_in_category(&self, id: Uuid) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .filter(|t| t.category_id == Some(id))
            .count() as u64)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.todos.iter().any(|t| t.category_id == Some(id)) {
            return Err(StoreError::Constraint(format!(
                "category {id} is still referenced by todos"
            )));
        }
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        Ok(tables.categories.len() != before)
    }

    async fn list_todos(&self, user_id: Option<Uuid>) -> Result<Vec<Todo>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .filter(|t| user_id.map_or(true, |owner| t.user_id == owner))
            .cloned()
            .collect())
    }

    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_user(todo.user_id)?;
        tables.check_category(todo.category_id)?;
        let row = Todo {
            id: Uuid::new_v4(),
            text: todo.text,
            completed: false,
            category_id: todo.category_id,
            user_id: todo.user_id,
            created_at: Utc::now(),
        };
        tables.todos.push(row.clone());
        Ok(row)
    }

    async fn update_todo(&self, id: Uuid, changes: TodoChanges) -> Result<Option<Todo>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables.todos.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        tables.check_category(changes.category_id)?;
        let todo = &mut tables.todos[index];
        if let Some(text) = changes.text {
            todo.text = text;
        }
        if let Some(category_id) = changes.category_id {
            todo.category_id = Some(category_id);
        }
        Ok(Some(todo.clone()))
    }

    async fn toggle_todo(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.todos.iter_mut().find(|t| t.id == id).map(|todo| {
            todo.completed = !todo.completed;
            todo.clone()
        }))
    }

    async fn delete_todo(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.todos.len();
        tables.todos.retain(|t| t.id != id);
        Ok(tables.todos.len() != before)
    }
}
