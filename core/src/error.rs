//! Error types and handling for Integra Core

use thiserror::Error;

/// Result type alias for Integra operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Integra Core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Calculation service errors
    #[error("Calculation error: {0}")]
    Calc(#[from] CalcError),

    /// History persistence errors
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Math typesetting errors
    #[error("Typesetting error: {0}")]
    Typeset(#[from] TypesetError),

    /// Chart rendering errors
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

/// Client-side validation errors.
///
/// The display text is what the user sees in the error region.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a mathematical function.")]
    EmptyExpression,

    #[error("Please enter both the lower and the upper bound.")]
    MissingBounds,

    #[error("A calculation is already in progress.")]
    RequestPending,
}

/// Calculation service errors
#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Invalid endpoint: {url}")]
    InvalidEndpoint { url: String },
}

/// History store errors
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to read history from {path}: {message}")]
    LoadFailed { path: String, message: String },

    #[error("Failed to write history to {path}: {message}")]
    SaveFailed { path: String, message: String },
}

/// Math typesetting errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesetError {
    #[error("Unbalanced braces in markup: {markup}")]
    UnbalancedBraces { markup: String },

    #[error("Unterminated math delimiter in markup: {markup}")]
    UnterminatedDelimiter { markup: String },
}

/// Chart rendering errors
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Nothing to plot")]
    EmptyFigure,

    #[error("Template error: {message}")]
    Template { message: String },
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Generic(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Generic(msg.to_string())
    }
}
