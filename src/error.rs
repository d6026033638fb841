use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Discord API error: {0}")]
    #[diagnostic(code(planbot::discord_api))]
    DiscordApi(#[from] serenity::Error),

    #[error("Poise framework error: {0}")]
    #[diagnostic(code(planbot::poise))]
    Poise(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Environment error: {0}")]
    #[diagnostic(code(planbot::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(planbot::config))]
    Config(String),

    #[error("Scraper unavailable: {0}")]
    #[diagnostic(code(planbot::scrape_unavailable))]
    ScrapeUnavailable(String),

    #[error("Scraper failed: {0}")]
    #[diagnostic(code(planbot::scrape_failed))]
    ScrapeFailed(String),

    #[error("Malformed scraper output: {0}")]
    #[diagnostic(code(planbot::malformed_output))]
    MalformedOutput(String),

    #[error("Snapshot store error: {0}")]
    #[diagnostic(code(planbot::store))]
    Store(String),

    #[error("Invalid input: {0}")]
    #[diagnostic(code(planbot::validation))]
    Validation(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(planbot::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(planbot::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(planbot::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(planbot::other))]
    Other(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
#[allow(dead_code)]
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create component errors
#[allow(dead_code)]
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create snapshot store errors
pub fn store_error(message: &str) -> Error {
    Error::Store(message.to_string())
}

/// Helper to create user-input validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create other errors
#[allow(dead_code)]
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
