// Cleanup-path edge cases with real process control

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use nutrisci_core::application::Launcher;
use nutrisci_core::domain::{CommandSpec, LaunchConfig, LaunchError};
use nutrisci_core::port::dependency_installer::mocks::MockInstaller;
use nutrisci_core::port::health_probe::mocks::MockHealthProbe;
use nutrisci_core::port::virtual_env::mocks::MockVirtualEnv;
use nutrisci_core::AppError;
use nutrisci_infra_system::SystemServiceRunner;

fn config() -> LaunchConfig {
    LaunchConfig {
        venv_dir: std::env::temp_dir(),
        requirements: PathBuf::from("requirements.txt"),
        app_entry: PathBuf::from("/definitely/not/app.py"),
        health_endpoint: "http://127.0.0.1:1/".to_string(),
        service_command: CommandSpec::new("sleep", ["30"]),
        startup_grace: Duration::ZERO,
    }
}

fn launcher(config: LaunchConfig, healthy: bool) -> Launcher {
    Launcher::new(
        config,
        Arc::new(MockVirtualEnv::new()),
        Arc::new(MockInstaller::new_success()),
        Arc::new(MockHealthProbe::new(healthy)),
        Arc::new(SystemServiceRunner::new()),
    )
}

#[tokio::test]
async fn missing_entry_fails_and_cleanup_noops() {
    let launcher = launcher(config(), true);
    launcher.prepare().await.unwrap();

    let err = launcher.run_foreground().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Launch(LaunchError::MissingAppEntry(_))
    ));

    // No handle recorded; the kill step must not blow up
    launcher.cleanup().await;
}

#[tokio::test]
async fn cleanup_survives_service_dying_first() {
    let mut config = config();
    // A "service" that exits immediately: by cleanup time the pid is gone
    config.service_command = CommandSpec::new("true", Vec::<String>::new());

    let launcher = launcher(config, false);
    launcher.prepare().await.unwrap();
    assert!(launcher.background_pid().is_some());

    // Let the child exit and get reaped
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Terminating an already-dead service must be swallowed
    launcher.cleanup().await;
}

#[tokio::test]
async fn repeated_cleanup_is_safe_with_a_real_process() {
    let launcher = launcher(config(), false);
    launcher.prepare().await.unwrap();

    launcher.cleanup().await;
    launcher.cleanup().await;
    assert!(launcher.background_pid().is_none());
}
