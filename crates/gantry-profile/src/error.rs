/// Profile and configuration error types
use std::path::PathBuf;
use thiserror::Error;

use crate::host::HostError;
use crate::platform::Platform;

pub type ProfileResult<T> = Result<T, ProfileError>;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("The specified builder could not be found: {0}")]
    NotFound(String),

    #[error("Profile '{name}' targets {profile_platform}, but the active platform is {active_platform}")]
    PlatformMismatch {
        name: String,
        profile_platform: Platform,
        active_platform: Platform,
    },

    #[error("Failed to read profile at {path}: {error}")]
    ProfileReadError { path: PathBuf, error: String },

    #[error("Failed to write profile at {path}: {error}")]
    ProfileWriteError { path: PathBuf, error: String },

    #[error("Invalid profile override: {0}")]
    InvalidOverride(String),

    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Host(#[from] HostError),
}

impl ProfileError {
    /// Create a profile read error
    pub fn profile_read(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::ProfileReadError {
            path: path.into(),
            error: error.to_string(),
        }
    }

    /// Create a profile write error
    pub fn profile_write(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::ProfileWriteError {
            path: path.into(),
            error: error.to_string(),
        }
    }

    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }
}
