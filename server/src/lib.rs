//! HTTP backend for the multi-user todo list.
//!
//! # Overview
//! Exposes users, categories and todos as JSON resources. Each request maps
//! to a single `Store` operation; the only cross-table rule is that a
//! category referenced by a todo cannot be deleted.
//!
//! # Design
//! - `app` builds the router for any `Store`, so tests run against
//!   `MemoryStore` and production against `PgStore` through the same code.
//! - Every failure is answered as `{"error": "<message>"}`.

use std::sync::Arc;

use axum::{
    routing::{get, patch, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

pub use config::Config;
pub use error::{ApiError, StoreError};
pub use models::{Category, Todo, User};
pub use store::{MemoryStore, PgStore, Store};

use handlers::{categories, todos, users};

pub fn app<S: Store>(store: S) -> Router {
    let store = Arc::new(store);
    Router::new()
        .route("/health", get(handlers::health))
        .route("/users", get(users::list_users::<S>).post(users::create_user::<S>))
        .route(
            "/categories",
            get(categories::list_categories::<S>).post(categories::create_category::<S>),
        )
        .route(
            "/categories/{id}",
            put(categories::update_category::<S>).delete(categories::delete_category::<S>),
        )
        .route("/todos", get(todos::list_todos::<S>).post(todos::create_todo::<S>))
        .route(
            "/todos/{id}",
            put(todos::update_todo::<S>).delete(todos::delete_todo::<S>),
        )
        .route("/todos/{id}/toggle", patch(todos::toggle_todo::<S>))
        .with_state(store)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn run<S: Store>(listener: TcpListener, store: S) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}
