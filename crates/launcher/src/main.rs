//! NutriSci Dev Launcher - Main Entry Point
//! Sequences venv activation, dependency install, inference-service
//! startup, and the web UI; tears down whatever it started on exit.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use nutrisci_core::application::Launcher;
use nutrisci_core::domain::{CommandSpec, LaunchConfig, LaunchError};
use nutrisci_core::AppError;
use nutrisci_infra_system::{HttpHealthProbe, PipInstaller, SystemServiceRunner, VenvActivator};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    init_logging();

    info!("NutriSci dev launcher v{} starting...", VERSION);

    // 2. Load configuration
    let config = load_config();

    // 3. Setup dependencies (DI wiring)
    let launcher = Arc::new(Launcher::new(
        config,
        Arc::new(VenvActivator::new()),
        Arc::new(PipInstaller::new()),
        Arc::new(HttpHealthProbe::new()),
        Arc::new(SystemServiceRunner::new()),
    ));

    // 4. Environment, dependencies, inference service. The only
    // failure here is the missing-venv precondition: nothing has been
    // spawned yet, so there is nothing to clean up.
    if let Err(e) = launcher.prepare().await {
        error!(error = %e, "Startup failed");
        anyhow::bail!("startup failed: {}", e);
    }

    // 5. Web UI in the foreground, racing termination signals
    let exit_code = run_until_shutdown(&launcher).await;

    // 6. Teardown (idempotent; kills only what this run spawned)
    launcher.cleanup().await;
    info!("Shutdown complete.");

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

/// Runs the UI to completion unless an interrupt or termination
/// signal wins the race. Returns the overall process exit code.
async fn run_until_shutdown(launcher: &Launcher) -> i32 {
    tokio::select! {
        result = launcher.run_foreground() => match result {
            Ok(code) => {
                info!(exit_code = ?code, "Web UI exited");
                0
            }
            Err(AppError::Launch(LaunchError::MissingAppEntry(path))) => {
                error!(path = %path.display(), "Web UI entry file not found");
                1
            }
            Err(e) => {
                error!(error = %e, "Web UI failed to run");
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            0
        }
        _ = terminate_signal() => {
            info!("Termination signal received, shutting down");
            0
        }
    }
}

/// Resolves when SIGTERM arrives; pends forever where unsupported
async fn terminate_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    std::future::pending::<()>().await;
}

/// Environment-variable overrides on top of the fixed local-dev defaults
fn load_config() -> LaunchConfig {
    let mut config = LaunchConfig::default();

    if let Ok(dir) = std::env::var("NUTRISCI_VENV_DIR") {
        config.venv_dir = PathBuf::from(shellexpand::tilde(&dir).into_owned());
    }
    if let Ok(manifest) = std::env::var("NUTRISCI_REQUIREMENTS") {
        config.requirements = PathBuf::from(shellexpand::tilde(&manifest).into_owned());
    }
    if let Ok(entry) = std::env::var("NUTRISCI_APP_ENTRY") {
        config.app_entry = PathBuf::from(shellexpand::tilde(&entry).into_owned());
    }
    if let Ok(url) = std::env::var("NUTRISCI_HEALTH_URL") {
        config.health_endpoint = url;
    }
    if let Ok(command) = std::env::var("NUTRISCI_SERVICE_CMD") {
        match CommandSpec::parse(&command) {
            Some(spec) => config.service_command = spec,
            None => warn!(command = %command, "Ignoring empty NUTRISCI_SERVICE_CMD"),
        }
    }
    if let Ok(grace) = std::env::var("NUTRISCI_STARTUP_GRACE_SECS") {
        match grace.parse::<u64>() {
            Ok(secs) => config.startup_grace = Duration::from_secs(secs),
            Err(_) => warn!(value = %grace, "Ignoring non-numeric NUTRISCI_STARTUP_GRACE_SECS"),
        }
    }

    config
}

fn init_logging() {
    let log_format = std::env::var("NUTRISCI_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Scripted use: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .with(file_layer())
                .init();
        }
        _ => {
            // Development: pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .with(file_layer())
                .init();
        }
    }
}

/// Daily-rolling JSON file log, enabled by NUTRISCI_LOG_DIR
fn file_layer<S>() -> Option<impl Layer<S>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let dir = std::env::var("NUTRISCI_LOG_DIR").ok()?;
    let appender = tracing_appender::rolling::daily(dir, "nutrisci-launch.log");
    Some(fmt::layer().json().with_ansi(false).with_writer(appender))
}
