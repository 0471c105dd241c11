// Port Layer - Interfaces for external dependencies

pub mod dependency_installer;
pub mod health_probe;
pub mod service_runner;
pub mod virtual_env;

// Re-exports
pub use dependency_installer::{DependencyInstaller, InstallError};
pub use health_probe::HealthProbe;
pub use service_runner::{RunnerError, ServiceRunner};
pub use virtual_env::{ActivationError, VirtualEnv};
