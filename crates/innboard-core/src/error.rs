//! Error types for innboard-core
//!
//! One thiserror hierarchy for everything the API client and stores can
//! surface. Form validation failures are deliberately not represented here:
//! they never leave the client (see [`crate::validation::FieldErrors`]).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for innboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Transport Errors
    // ===================
    #[error("Request to {endpoint} failed")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode {
        endpoint: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // ===================
    // Application Errors
    // ===================
    /// Server answered with `success: false` (or an error-status envelope).
    #[error("{message}")]
    Api { message: String },

    /// Envelope claimed success but carried no payload.
    #[error("Empty response body from {endpoint}")]
    MissingData { endpoint: String },

    // ===================
    // Auth Errors
    // ===================
    #[error("Not authenticated")]
    Unauthorized,

    // ===================
    // Token Persistence
    // ===================
    #[error("Failed to read session file: {path}")]
    TokenRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write session file: {path}")]
    TokenWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Config directory could not be determined")]
    ConfigDirNotFound,
}

impl CoreError {
    /// True for failures that should drop the session back to the login
    /// screen rather than be shown as a page error.
    pub fn is_auth(&self) -> bool {
        matches!(self, CoreError::Unauthorized)
    }

    /// True for network/decoding failures where the UI shows a generic
    /// fallback message instead of the error text.
    pub fn is_transport(&self) -> bool {
        matches!(self, CoreError::Http { .. } | CoreError::Decode { .. })
    }

    /// Message a page banner should display for this error, given the
    /// page's generic fallback text.
    pub fn page_message(&self, fallback: &str) -> String {
        match self {
            CoreError::Api { message } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
