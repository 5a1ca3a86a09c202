//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the client
//! deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Category, CategoryInput, CreateTodo, CreateUser, Deleted, ErrorBody, Todo, UpdateTodo, User,
};

/// Address of a locally running server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl Default for TodoClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- users ---

    pub fn build_list_users(&self) -> HttpRequest {
        self.without_body(HttpMethod::Get, "/users".to_string())
    }

    pub fn build_create_user(&self, input: &CreateUser) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, "/users".to_string(), input)
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        decode(response, 200)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        decode(response, 201)
    }

    // --- categories ---

    pub fn build_list_categories(&self) -> HttpRequest {
        self.without_body(HttpMethod::Get, "/categories".to_string())
    }

    pub fn build_create_category(&self, input: &CategoryInput) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, "/categories".to_string(), input)
    }

    pub fn build_update_category(
        &self,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Put, format!("/categories/{id}"), input)
    }

    pub fn build_delete_category(&self, id: Uuid) -> HttpRequest {
        self.without_body(HttpMethod::Delete, format!("/categories/{id}"))
    }

    pub fn parse_list_categories(&self, response: HttpResponse) -> Result<Vec<Category>, ApiError> {
        decode(response, 200)
    }

    pub fn parse_create_category(&self, response: HttpResponse) -> Result<Category, ApiError> {
        decode(response, 201)
    }

    pub fn parse_update_category(&self, response: HttpResponse) -> Result<Category, ApiError> {
        decode(response, 200)
    }

    pub fn parse_delete_category(&self, response: HttpResponse) -> Result<(), ApiError> {
        decode::<Deleted>(response, 200).map(|_| ())
    }

    // --- todos ---

    /// List todos, restricted to one owner when `user_id` is given.
    pub fn build_list_todos(&self, user_id: Option<Uuid>) -> HttpRequest {
        let path = match user_id {
            Some(id) => format!("/todos?user_id={id}"),
            None => "/todos".to_string(),
        };
        self.without_body(HttpMethod::Get, path)
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, "/todos".to_string(), input)
    }

    pub fn build_update_todo(&self, id: Uuid, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Put, format!("/todos/{id}"), input)
    }

    pub fn build_toggle_todo(&self, id: Uuid) -> HttpRequest {
        self.without_body(HttpMethod::Patch, format!("/todos/{id}/toggle"))
    }

    pub fn build_delete_todo(&self, id: Uuid) -> HttpRequest {
        self.without_body(HttpMethod::Delete, format!("/todos/{id}"))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response, 201)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response, 200)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response, 200)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        decode::<Deleted>(response, 200).map(|_| ())
    }

    fn without_body(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_body<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .map(|body| body.error)
        .unwrap_or_else(|_| response.body.clone());
    Err(match response.status {
        404 => ApiError::NotFound { message },
        status @ 400..=499 => ApiError::Rejected { status, message },
        status => ApiError::HttpError { status, message },
    })
}
