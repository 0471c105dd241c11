// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Launch error: {0}")]
    Launch(#[from] crate::domain::LaunchError),

    #[error("Environment error: {0}")]
    Environment(#[from] crate::port::ActivationError),

    #[error("Install error: {0}")]
    Install(#[from] crate::port::InstallError),

    #[error("Process error: {0}")]
    Process(#[from] crate::port::RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
