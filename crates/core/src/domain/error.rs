// Domain Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Fatal launch preconditions. Everything else in the sequence is
/// best-effort and reported as a warning instead.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Virtual environment not found at {0}")]
    MissingVirtualEnv(PathBuf),

    #[error("Application entry file not found at {0}")]
    MissingAppEntry(PathBuf),
}

pub type Result<T> = std::result::Result<T, LaunchError>;
