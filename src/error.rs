use thiserror::Error;

use crate::models::ConfigError;

/// Main error type for adowork
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("Invalid work item type: '{0}'. Please use a common type like 'Task', 'Bug', or 'User Story'.")]
    InvalidWorkItemType(String),

    #[error("Work item title must not be empty")]
    EmptyTitle,

    #[error("Creating work item failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Failed to create work item: received no ID from API")]
    MissingId,

    #[error("Error marshaling dry-run output: {0}")]
    Render(#[source] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl AppError {
    /// Errors raised locally, before any request is attempted
    pub fn is_local_validation(&self) -> bool {
        matches!(
            self,
            AppError::Config(_)
                | AppError::Usage(_)
                | AppError::InvalidWorkItemType(_)
                | AppError::EmptyTitle
        )
    }
}

/// Raw failures of the create call, passed to the classifier untouched
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The service answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Api {
        status: u16,
        message: String,
        type_key: Option<String>,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timeout after {0} seconds")]
    TimedOut(u64),

    #[error("Request cancelled before a response was received")]
    Cancelled,

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Required argument '{name}' is missing or empty")]
    MissingArgument { name: &'static str },

    #[error("Invalid API version string: '{0}' (expected MAJOR.MINOR, optionally with -preview)")]
    InvalidVersionString(String),

    #[error("API version '{0}' is not supported (requires 5.0 or newer)")]
    UnsupportedApiVersion(String),

    #[error("Could not resolve service location '{location}': {reason}")]
    ServiceLocation { location: String, reason: String },
}

impl GatewayError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            GatewayError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
