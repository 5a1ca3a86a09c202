//! Client-side application state.
//!
//! # Design
//! `AppState` holds the last snapshot fetched for each collection plus the
//! selected user and the theme. Mutations never patch the snapshot locally:
//! each one performs its request and, on success, re-fetches the affected
//! collection. A failed operation records its message in `last_error` and
//! leaves the snapshot as it was.

use uuid::Uuid;

use crate::client::TodoClient;
use crate::error::StateError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{
    Category, CategoryInput, CreateTodo, CreateUser, Theme, Todo, UpdateTodo, User,
};
use crate::view::{TodoQuery, TodoStats};

/// Which top-level view the UI should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// No user selected yet: pick one or register.
    UserPicker,
    Todos,
}

pub struct AppState<T> {
    client: TodoClient,
    transport: T,
    users: Vec<User>,
    categories: Vec<Category>,
    todos: Vec<Todo>,
    current_user: Option<User>,
    theme: Theme,
    last_error: Option<String>,
}

impl<T: Transport> AppState<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            users: Vec::new(),
            categories: Vec::new(),
            todos: Vec::new(),
            current_user: None,
            theme: Theme::default(),
            last_error: None,
        }
    }

    // --- snapshot accessors ---

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Todos of the current user, in server order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Message of the most recent failed operation, cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn screen(&self) -> Screen {
        match self.current_user {
            Some(_) => Screen::Todos,
            None => Screen::UserPicker,
        }
    }

    pub fn visible_todos(&self, query: &TodoQuery) -> Vec<&Todo> {
        query.apply(&self.todos)
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::from_todos(&self.todos)
    }

    /// Number of loaded todos filed under `category_id`.
    pub fn category_todo_count(&self, category_id: Uuid) -> usize {
        self.todos
            .iter()
            .filter(|t| t.category_id == Some(category_id))
            .count()
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    // --- loading ---

    /// Initial load: users (auto-selecting one) and categories.
    pub fn load(&mut self) -> Result<(), StateError> {
        self.tracked(|state| {
            state.refresh_users()?;
            state.refresh_categories()
        })
    }

    pub fn fetch_users(&mut self) -> Result<(), StateError> {
        self.tracked(Self::refresh_users)
    }

    pub fn fetch_categories(&mut self) -> Result<(), StateError> {
        self.tracked(Self::refresh_categories)
    }

    pub fn fetch_todos(&mut self) -> Result<(), StateError> {
        self.tracked(Self::refresh_todos)
    }

    // --- users ---

    /// Register a user and switch to them.
    pub fn add_user(&mut self, name: &str, avatar: Option<&str>) -> Result<User, StateError> {
        self.tracked(|state| {
            let input = CreateUser {
                name: name.to_string(),
                avatar: avatar.map(str::to_string),
            };
            let request = state.client.build_create_user(&input)?;
            let user = state.client.parse_create_user(state.send(request)?)?;
            tracing::info!(user_id = %user.id, "user registered");
            let users = state.list_users()?;
            state.select(user.clone())?;
            state.users = users;
            Ok(user)
        })
    }

    pub fn select_user(&mut self, id: Uuid) -> Result<(), StateError> {
        self.tracked(|state| state.switch_user(id))
    }

    // --- todos ---

    pub fn add_todo(&mut self, text: &str, category_id: Option<Uuid>) -> Result<(), StateError> {
        self.tracked(|state| {
            let input = CreateTodo {
                text: text.to_string(),
                category_id,
                user_id: state.owner()?,
            };
            let request = state.client.build_create_todo(&input)?;
            state.client.parse_create_todo(state.send(request)?)?;
            state.refresh_todos()
        })
    }

    pub fn update_todo(
        &mut self,
        id: Uuid,
        text: &str,
        category_id: Option<Uuid>,
    ) -> Result<(), StateError> {
        self.tracked(|state| {
            state.owner()?;
            let input = UpdateTodo {
                text: Some(text.to_string()),
                category_id,
            };
            let request = state.client.build_update_todo(id, &input)?;
            state.client.parse_update_todo(state.send(request)?)?;
            state.refresh_todos()
        })
    }

    pub fn toggle_todo(&mut self, id: Uuid) -> Result<(), StateError> {
        self.tracked(|state| {
            state.owner()?;
            let request = state.client.build_toggle_todo(id);
            state.client.parse_toggle_todo(state.send(request)?)?;
            state.refresh_todos()
        })
    }

    pub fn delete_todo(&mut self, id: Uuid) -> Result<(), StateError> {
        self.tracked(|state| {
            state.owner()?;
            let request = state.client.build_delete_todo(id);
            state.client.parse_delete_todo(state.send(request)?)?;
            state.refresh_todos()
        })
    }

    // --- categories ---

    pub fn add_category(&mut self, name: &str, color: &str) -> Result<(), StateError> {
        self.tracked(|state| {
            let request = state
                .client
                .build_create_category(&category_input(name, color))?;
            state.client.parse_create_category(state.send(request)?)?;
            state.refresh_categories()
        })
    }

    pub fn update_category(&mut self, id: Uuid, name: &str, color: &str) -> Result<(), StateError> {
        self.tracked(|state| {
            let request = state
                .client
                .build_update_category(id, &category_input(name, color))?;
            state.client.parse_update_category(state.send(request)?)?;
            state.refresh_categories()
        })
    }

    /// Fails with the server's message while a todo still uses the category.
    pub fn delete_category(&mut self, id: Uuid) -> Result<(), StateError> {
        self.tracked(|state| {
            let request = state.client.build_delete_category(id);
            state.client.parse_delete_category(state.send(request)?)?;
            state.refresh_categories()
        })
    }

    // --- internals ---

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, StateError> {
        Ok(self.transport.execute(request)?)
    }

    fn owner(&self) -> Result<Uuid, StateError> {
        self.current_user
            .as_ref()
            .map(|u| u.id)
            .ok_or(StateError::NoCurrentUser)
    }

    /// Run one operation and record its outcome in `last_error`.
    fn tracked<R>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<R, StateError>,
    ) -> Result<R, StateError> {
        let result = op(self);
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "operation failed");
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    /// Keeps the selected user when still listed, otherwise falls back to
    /// the first user. State is only written once every fetch succeeded.
    fn refresh_users(&mut self) -> Result<(), StateError> {
        let users = self.list_users()?;
        let selected = self
            .current_user
            .as_ref()
            .and_then(|current| users.iter().find(|u| u.id == current.id))
            .cloned();
        match selected {
            Some(user) => self.current_user = Some(user),
            None => match users.first().cloned() {
                Some(first) => self.select(first)?,
                None => {
                    self.current_user = None;
                    self.todos.clear();
                }
            },
        }
        self.users = users;
        Ok(())
    }

    fn refresh_categories(&mut self) -> Result<(), StateError> {
        let response = self.send(self.client.build_list_categories())?;
        self.categories = self.client.parse_list_categories(response)?;
        Ok(())
    }

    fn refresh_todos(&mut self) -> Result<(), StateError> {
        let Some(user_id) = self.current_user.as_ref().map(|u| u.id) else {
            self.todos.clear();
            return Ok(());
        };
        self.todos = self.todos_of(user_id)?;
        tracing::debug!(%user_id, count = self.todos.len(), "todos refreshed");
        Ok(())
    }

    fn switch_user(&mut self, id: Uuid) -> Result<(), StateError> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StateError::UnknownUser(id))?;
        self.select(user)
    }

    /// Make `user` current together with their todos, or change nothing.
    fn select(&mut self, user: User) -> Result<(), StateError> {
        let todos = self.todos_of(user.id)?;
        tracing::debug!(user_id = %user.id, count = todos.len(), "user selected");
        self.current_user = Some(user);
        self.todos = todos;
        Ok(())
    }

    fn list_users(&self) -> Result<Vec<User>, StateError> {
        let response = self.send(self.client.build_list_users())?;
        Ok(self.client.parse_list_users(response)?)
    }

    fn todos_of(&self, user_id: Uuid) -> Result<Vec<Todo>, StateError> {
        let response = self.send(self.client.build_list_todos(Some(user_id)))?;
        Ok(self.client.parse_list_todos(response)?)
    }
}

fn category_input(name: &str, color: &str) -> CategoryInput {
    CategoryInput {
        name: name.to_string(),
        color: Some(color.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use chrono::{DateTime, Utc};
    use serde::Serialize;

    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpMethod;

    /// Replays canned responses in order and records every request.
    struct ScriptedTransport {
        responses: RefCell<VecDeque<HttpResponse>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn push(&self, response: HttpResponse) {
            self.responses.borrow_mut().push_back(response);
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| TransportError("no scripted response".to_string()))
        }
    }

    fn json(status: u16, value: &impl Serialize) -> HttpResponse {
        HttpResponse::new(status, serde_json::to_string(value).unwrap())
    }

    fn user(n: u128, name: &str) -> User {
        User {
            id: Uuid::from_u128(n),
            name: name.to_string(),
            avatar: None,
        }
    }

    fn todo(n: u128, owner: &User, completed: bool) -> Todo {
        Todo {
            id: Uuid::from_u128(n),
            text: format!("todo {n}"),
            completed,
            category_id: None,
            user_id: owner.id,
            created_at: DateTime::<Utc>::from_timestamp(1_750_000_000, 0).unwrap(),
        }
    }

    fn category(n: u128, name: &str) -> Category {
        Category {
            id: Uuid::from_u128(n),
            name: name.to_string(),
            color: "#10B981".to_string(),
        }
    }

    fn state(responses: Vec<HttpResponse>) -> AppState<ScriptedTransport> {
        AppState::new(TodoClient::default(), ScriptedTransport::new(responses))
    }

    #[test]
    fn load_selects_first_user_and_fetches_their_todos() {
        let alice = user(1, "Alice");
        let bob = user(2, "Bob");
        let mut app = state(vec![
            json(200, &vec![alice.clone(), bob]),
            json(200, &vec![todo(10, &alice, false)]),
            json(200, &vec![category(20, "Work")]),
        ]);

        app.load().unwrap();

        assert_eq!(app.screen(), Screen::Todos);
        assert_eq!(app.current_user(), Some(&alice));
        assert_eq!(app.users().len(), 2);
        assert_eq!(app.todos().len(), 1);
        assert_eq!(app.categories().len(), 1);
        assert!(app.last_error().is_none());

        let paths: Vec<String> = app
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(
            paths,
            [
                "http://localhost:5000/users".to_string(),
                format!("http://localhost:5000/todos?user_id={}", alice.id),
                "http://localhost:5000/categories".to_string(),
            ]
        );
    }

    #[test]
    fn load_without_users_shows_picker() {
        let mut app = state(vec![
            json(200, &Vec::<User>::new()),
            json(200, &Vec::<Category>::new()),
        ]);

        app.load().unwrap();

        assert_eq!(app.screen(), Screen::UserPicker);
        assert!(app.current_user().is_none());
        assert!(app.todos().is_empty());
    }

    #[test]
    fn todo_mutations_need_a_selected_user() {
        let mut app = state(Vec::new());

        let err = app.add_todo("Ship report", None).unwrap_err();
        assert!(matches!(err, StateError::NoCurrentUser));
        assert_eq!(app.last_error(), Some("no user selected"));
        assert!(matches!(
            app.toggle_todo(Uuid::nil()),
            Err(StateError::NoCurrentUser)
        ));
        assert!(app.transport().requests().is_empty());
    }

    #[test]
    fn failed_delete_keeps_snapshot_and_records_message() {
        let work = category(20, "Work");
        let mut app = state(vec![
            json(200, &Vec::<User>::new()),
            json(200, &vec![work.clone()]),
            HttpResponse::new(400, r#"{"error":"category is in use by todos"}"#),
        ]);
        app.load().unwrap();

        let err = app.delete_category(work.id).unwrap_err();
        assert_eq!(err.to_string(), "category is in use by todos");
        assert_eq!(app.last_error(), Some("category is in use by todos"));
        assert_eq!(app.categories(), [work.clone()]);
        // No re-fetch after a failed mutation.
        assert_eq!(app.transport().requests().len(), 3);

        app.transport().push(json(200, &vec![work]));
        app.fetch_categories().unwrap();
        assert!(app.last_error().is_none());
    }

    #[test]
    fn toggle_refetches_todos() {
        let alice = user(1, "Alice");
        let mut app = state(vec![
            json(200, &vec![alice.clone()]),
            json(200, &vec![todo(10, &alice, false)]),
            json(200, &Vec::<Category>::new()),
        ]);
        app.load().unwrap();

        app.transport().push(json(200, &todo(10, &alice, true)));
        app.transport().push(json(200, &vec![todo(10, &alice, true)]));
        app.toggle_todo(Uuid::from_u128(10)).unwrap();

        assert!(app.todos()[0].completed);
        assert_eq!(app.stats().completion_rate, 100);

        let requests = app.transport().requests();
        assert_eq!(requests.len(), 5);
        assert_eq!(requests[3].method, HttpMethod::Patch);
        assert_eq!(requests[4].method, HttpMethod::Get);
        assert!(requests[4].path.ends_with(&format!("user_id={}", alice.id)));
    }

    #[test]
    fn add_user_switches_to_the_new_user() {
        let alice = user(1, "Alice");
        let bob = user(2, "Bob");
        let mut app = state(vec![
            json(200, &vec![alice.clone()]),
            json(200, &Vec::<Todo>::new()),
            json(200, &Vec::<Category>::new()),
            json(201, &bob),
            json(200, &vec![alice, bob.clone()]),
            json(200, &vec![todo(11, &bob, false)]),
        ]);
        app.load().unwrap();

        let created = app.add_user("Bob", None).unwrap();
        assert_eq!(created, bob);
        assert_eq!(app.current_user(), Some(&bob));
        assert_eq!(app.users().len(), 2);
        assert_eq!(app.todos()[0].user_id, bob.id);

        let register = &app.transport().requests()[3];
        assert_eq!(register.method, HttpMethod::Post);
        let body: serde_json::Value =
            serde_json::from_str(register.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "name": "Bob" }));
    }

    #[test]
    fn failed_switch_keeps_previous_user_and_todos() {
        let alice = user(1, "Alice");
        let bob = user(2, "Bob");
        let mut app = state(vec![
            json(200, &vec![alice.clone(), bob.clone()]),
            json(200, &vec![todo(10, &alice, false)]),
            json(200, &Vec::<Category>::new()),
            HttpResponse::new(500, r#"{"error":"db down"}"#),
        ]);
        app.load().unwrap();

        let err = app.select_user(bob.id).unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: db down");
        assert_eq!(app.last_error(), Some("HTTP 500: db down"));
        assert_eq!(app.current_user(), Some(&alice));
        assert_eq!(app.todos().len(), 1);
        assert_eq!(app.todos()[0].user_id, alice.id);
    }

    #[test]
    fn failed_registration_fetch_keeps_previous_snapshot() {
        let alice = user(1, "Alice");
        let bob = user(2, "Bob");
        let mut app = state(vec![
            json(200, &vec![alice.clone()]),
            json(200, &vec![todo(10, &alice, false)]),
            json(200, &Vec::<Category>::new()),
            json(201, &bob),
            json(200, &vec![alice.clone(), bob]),
            HttpResponse::new(500, r#"{"error":"db down"}"#),
        ]);
        app.load().unwrap();

        assert!(app.add_user("Bob", None).is_err());
        assert_eq!(app.current_user(), Some(&alice));
        assert_eq!(app.users(), [alice.clone()]);
        assert_eq!(app.todos()[0].user_id, alice.id);
    }

    #[test]
    fn selecting_an_unknown_user_keeps_the_current_one() {
        let alice = user(1, "Alice");
        let mut app = state(vec![
            json(200, &vec![alice.clone()]),
            json(200, &Vec::<Todo>::new()),
            json(200, &Vec::<Category>::new()),
        ]);
        app.load().unwrap();

        let err = app.select_user(Uuid::from_u128(99)).unwrap_err();
        assert!(matches!(err, StateError::UnknownUser(id) if id == Uuid::from_u128(99)));
        assert_eq!(app.current_user(), Some(&alice));
    }

    #[test]
    fn category_counts_come_from_loaded_todos() {
        let alice = user(1, "Alice");
        let work = category(20, "Work");
        let mut filed = todo(10, &alice, false);
        filed.category_id = Some(work.id);
        let mut app = state(vec![
            json(200, &vec![alice.clone()]),
            json(200, &vec![filed, todo(11, &alice, true)]),
            json(200, &vec![work.clone()]),
        ]);
        app.load().unwrap();

        assert_eq!(app.category_todo_count(work.id), 1);
        assert_eq!(app.category_todo_count(Uuid::nil()), 0);
        assert_eq!(app.stats().completion_rate, 50);
    }

    #[test]
    fn theme_toggles_locally() {
        let mut app = state(Vec::new());
        assert_eq!(app.theme(), Theme::Light);
        assert_eq!(app.toggle_theme(), Theme::Dark);
        assert_eq!(app.toggle_theme(), Theme::Light);
        assert!(app.transport().requests().is_empty());
    }
}
