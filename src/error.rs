use std::fmt;

use reqwest::StatusCode;

/// Error type for the status monitor
#[derive(Debug)]
pub enum MonitorError {
    /// Network/request errors (DNS, connection refused, timeout)
    Network(reqwest::Error),
    /// JSON serialization/deserialization errors
    Json(serde_json::Error),
    /// File and device I/O errors
    Io(std::io::Error),
    /// Unexpected HTTP status from the OctoPrint server
    Http(StatusCode),
    /// Configuration errors
    Config(String),
    /// Character display errors
    Display(String),
    /// The background poll task died
    Task(tokio::task::JoinError),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Network(e) => write!(f, "Network error: {}", e),
            MonitorError::Json(e) => write!(f, "JSON error: {}", e),
            MonitorError::Io(e) => write!(f, "I/O error: {}", e),
            MonitorError::Http(status) => write!(f, "Unexpected HTTP status: {}", status),
            MonitorError::Config(msg) => write!(f, "Configuration error: {}", msg),
            MonitorError::Display(msg) => write!(f, "Display error: {}", msg),
            MonitorError::Task(e) => write!(f, "Poll task error: {}", e),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Network(e) => Some(e),
            MonitorError::Json(e) => Some(e),
            MonitorError::Io(e) => Some(e),
            MonitorError::Task(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::Network(err)
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::Json(err)
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::Io(err)
    }
}

impl From<tokio::task::JoinError> for MonitorError {
    fn from(err: tokio::task::JoinError) -> Self {
        MonitorError::Task(err)
    }
}

/// Result type alias for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;
