//! Error types for Basar
//!
//! All modules use `BasarResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Basar operations
pub type BasarResult<T> = Result<T, BasarError>;

/// All errors that can occur in Basar
#[derive(Error, Debug)]
pub enum BasarError {
    // Cache errors
    #[error("cache is locked by another process ({path})")]
    Locked { path: PathBuf },

    #[error("all sources failed ({attempted} attempted)")]
    AllSourcesFailed { attempted: usize },

    #[error("failed to publish cache: {context}")]
    Persist {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Source errors
    #[error("operation cancelled")]
    Cancelled,

    #[error("unexpected status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("decoding banners from {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    // Configuration errors
    #[error("could not determine home directory")]
    HomeDirUnavailable,

    #[error("config already exists: {0}")]
    ConfigExists(PathBuf),

    #[error("volatility3 config already has remote_isf_url, please update manually: {0}")]
    Vol3AlreadyConfigured(PathBuf),

    // Platform errors
    #[error("unsupported platform: {0}. systemd timers are only available on Linux")]
    UnsupportedPlatform(String),

    #[error("command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BasarError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a publish-step error with context
    pub fn persist(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Persist {
            context: context.into(),
            source,
        }
    }

    /// Create a decode error for a named origin (URL, path, or cache file)
    pub fn decode(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            origin: origin.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Locked { .. } => {
                Some("Another basar instance is updating the cache. Retry in a moment.")
            }
            Self::AllSourcesFailed { .. } => {
                Some("Check network access and the entries in sources.conf (run: basar init)")
            }
            Self::ConfigExists(_) => Some("Edit the existing file or remove it first"),
            Self::Vol3AlreadyConfigured(_) => {
                Some("Set remote_isf_url to the output of: basar uri")
            }
            Self::HomeDirUnavailable => Some("Set the HOME environment variable"),
            _ => None,
        }
    }
}
