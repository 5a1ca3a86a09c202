//! Client core for the multi-user todo service.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. A `Transport` performs the round-trip, and
//! `AppState` layers the UI-facing state (loaded collections, selected user,
//! theme, last error) on top of both.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and the protocol is testable without a server.
//! - `AppState` never edits its snapshot in place. Successful mutations
//!   re-fetch from the server, which stays the single source of truth.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod state;
pub mod transport;
pub mod types;
pub mod view;

pub use client::{TodoClient, DEFAULT_BASE_URL};
pub use error::{ApiError, StateError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{AppState, Screen};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    Category, CategoryInput, CreateTodo, CreateUser, Deleted, ErrorBody, Theme, Todo, UpdateTodo,
    User,
};
pub use view::{SortOrder, StatusFilter, TodoQuery, TodoStats};
