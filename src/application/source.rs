//! The "fetch a resource" capability consumed by the page sections.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("resource `{path}` could not be reached: {message}")]
    Transport { path: String, message: String },
    #[error("resource `{path}` responded with status {status}")]
    Status { path: String, status: u16 },
    #[error("resource `{path}` does not exist")]
    NotFound { path: String },
    #[error("resource `{path}` could not be read: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid resource path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },
}

impl FetchError {
    pub fn transport(path: &str, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    pub fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Source of the page's external resources (blog index, publications fragment).
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Fetch the resource at `path` (relative to the source root) as text.
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;

    /// Human-readable location used in log fields.
    fn location(&self) -> String;
}
