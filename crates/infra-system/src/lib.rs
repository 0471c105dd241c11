// NutriSci Infrastructure - System Adapters
// Implements: VirtualEnv, DependencyInstaller, HealthProbe, ServiceRunner

pub mod http_probe;
pub mod pip_installer;
pub mod process_runner;
pub mod venv;

pub use http_probe::HttpHealthProbe;
pub use pip_installer::PipInstaller;
pub use process_runner::SystemServiceRunner;
pub use venv::VenvActivator;
