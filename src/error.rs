use crate::matcher::oracle::OracleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // Oracle transport errors can carry internal endpoints
            Error::Oracle(OracleError::Request(_)) => "Oracle request failed".to_string(),
            Error::Oracle(e) => format!("Oracle error: {e}"),

            Error::Config(msg) => {
                if msg.to_lowercase().contains("password")
                    || msg.to_lowercase().contains("secret")
                    || msg.to_lowercase().contains("token")
                    || msg.to_lowercase().contains("key")
                {
                    "Configuration error (details redacted)".to_string()
                } else {
                    format!("Configuration error: {msg}")
                }
            }

            Error::Io(_) => "File system operation failed".to_string(),
            Error::Json(_) => "Malformed JSON document".to_string(),
            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),
            Error::Validation(msg) => format!("Validation error: {msg}"),
        }
    }
}
