use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the fetch workflow.
/// Every module returns `Result<T, BuilderError>`.
#[derive(Debug, Error)]
pub enum BuilderError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    // ── Resolution ──────────────────────────────────────
    #[error("Minecraft version {0} not found in manifest")]
    VersionNotFound(String),

    #[error("Invalid build argument: {0:?}")]
    InvalidBuildArg(String),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{document} is missing `{field}`")]
    MissingField {
        document: String,
        field: &'static str,
    },

    // ── Config ──────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type BuilderResult<T> = Result<T, BuilderError>;

impl BuilderError {
    /// Wrap an IO error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuilderError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for any failure talking to a remote endpoint.
    pub fn is_http(&self) -> bool {
        matches!(self, BuilderError::Http(_) | BuilderError::HttpStatus { .. })
    }
}

impl From<std::io::Error> for BuilderError {
    fn from(source: std::io::Error) -> Self {
        BuilderError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
