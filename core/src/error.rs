//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the row
//! does not exist" from other failures. 4xx answers (missing fields, a
//! category still in use) are `Rejected`; everything else lands in
//! `HttpError`. In every case `message` is the server's `{"error"}` text.

use thiserror::Error;
use uuid::Uuid;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: String },

    /// The server refused the request (HTTP 4xx other than 404).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Any other unexpected status.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// The request could not be delivered or its response could not be read.
#[derive(Debug, Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

/// Errors returned by `AppState` operations.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("no user selected")]
    NoCurrentUser,

    #[error("unknown user {0}")]
    UnknownUser(Uuid),
}
