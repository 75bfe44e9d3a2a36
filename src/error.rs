use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Database error: {0}")]
    #[diagnostic(code(eventbell::database))]
    Database(#[from] sqlx::Error),

    #[error("Slack API error: {0}")]
    #[diagnostic(code(eventbell::slack_api))]
    SlackApi(String),

    #[error("Expected exactly one {table} row for user {user}, found none")]
    #[diagnostic(code(eventbell::missing_row))]
    MissingRow { table: &'static str, user: String },

    #[error("Environment error: {0}")]
    #[diagnostic(code(eventbell::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(eventbell::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(eventbell::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(eventbell::other))]
    Other(String),
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
#[allow(dead_code)]
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Slack API errors
pub fn slack_error(message: &str) -> Error {
    Error::SlackApi(message.to_string())
}
