// Launcher - the supervised launch sequence
//
// Owns all mutable state of a run: the pid of a background service
// this run spawned (single writer, consumed once at cleanup) and the
// one-shot cleanup guard. Signal delivery and normal exit may both
// reach cleanup; only the first invocation does anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::domain::{LaunchConfig, LaunchError, ServicePid};
use crate::error::Result;
use crate::port::{DependencyInstaller, HealthProbe, ServiceRunner, VirtualEnv};

/// Supervises one launch: environment activation, dependency
/// installation, background inference service, foreground web UI,
/// and teardown of whatever this run started.
pub struct Launcher {
    config: LaunchConfig,
    virtual_env: Arc<dyn VirtualEnv>,
    installer: Arc<dyn DependencyInstaller>,
    health_probe: Arc<dyn HealthProbe>,
    runner: Arc<dyn ServiceRunner>,

    background: Mutex<Option<ServicePid>>,
    cleaned_up: AtomicBool,
}

impl Launcher {
    pub fn new(
        config: LaunchConfig,
        virtual_env: Arc<dyn VirtualEnv>,
        installer: Arc<dyn DependencyInstaller>,
        health_probe: Arc<dyn HealthProbe>,
        runner: Arc<dyn ServiceRunner>,
    ) -> Self {
        Self {
            config,
            virtual_env,
            installer,
            health_probe,
            runner,
            background: Mutex::new(None),
            cleaned_up: AtomicBool::new(false),
        }
    }

    /// Pid of the service spawned by this run, if any
    pub fn background_pid(&self) -> Option<ServicePid> {
        *self.background.lock().unwrap()
    }

    /// Steps 1-3: activate the environment, install dependencies,
    /// ensure the inference service is reachable.
    ///
    /// # Errors
    /// - LaunchError::MissingVirtualEnv if the venv directory is
    ///   absent; no later step runs in that case
    pub async fn prepare(&self) -> Result<()> {
        self.activate_environment()?;
        self.install_dependencies().await;
        self.ensure_service().await;
        Ok(())
    }

    fn activate_environment(&self) -> Result<()> {
        let venv_dir = &self.config.venv_dir;
        if !venv_dir.is_dir() {
            return Err(LaunchError::MissingVirtualEnv(venv_dir.clone()).into());
        }

        self.virtual_env.activate(venv_dir)?;
        info!(venv = %venv_dir.display(), "Virtual environment activated");
        Ok(())
    }

    // Best-effort: the operator may already have a satisfied environment
    async fn install_dependencies(&self) {
        let manifest = &self.config.requirements;
        match self.installer.install(manifest).await {
            Ok(()) => info!(manifest = %manifest.display(), "Dependencies up to date"),
            Err(e) => warn!(error = %e, "Dependency installation failed, continuing"),
        }
    }

    /// Spawns the inference service unless something already answers
    /// on the health endpoint. Only a service spawned here is recorded
    /// for teardown; one that was already running is left alone.
    async fn ensure_service(&self) {
        let endpoint = &self.config.health_endpoint;
        if self.health_probe.is_healthy(endpoint).await {
            info!(endpoint = %endpoint, "Inference service already running");
            return;
        }

        let command = &self.config.service_command;
        info!(command = %command, "Inference service not reachable, starting it");

        match self.runner.spawn_background(command).await {
            Ok(pid) => {
                *self.background.lock().unwrap() = Some(pid);
                let grace = self.config.startup_grace;
                info!(
                    pid = %pid,
                    grace_secs = grace.as_secs(),
                    "Inference service spawned, waiting for it to settle"
                );
                sleep(grace).await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to start inference service, continuing without it")
            }
        }
    }

    /// Step 4: run the web UI in the foreground until it exits.
    ///
    /// # Errors
    /// - LaunchError::MissingAppEntry if the entry file is absent; the
    ///   caller is expected to run cleanup and exit nonzero
    pub async fn run_foreground(&self) -> Result<Option<i32>> {
        let entry = &self.config.app_entry;
        if !entry.is_file() {
            return Err(LaunchError::MissingAppEntry(entry.clone()).into());
        }

        let command = self.config.ui_command();
        info!(command = %command, "Launching web UI");
        let exit_code = self.runner.run_foreground(&command).await?;
        Ok(exit_code)
    }

    /// Tear down anything this run started. Idempotent.
    pub async fn cleanup(&self) {
        if self.cleaned_up.swap(true, Ordering::SeqCst) {
            return;
        }

        let pid = self.background.lock().unwrap().take();
        if let Some(pid) = pid {
            // The service may have exited on its own already
            match self.runner.terminate(pid).await {
                Ok(()) => info!(pid = %pid, "Background service terminated"),
                Err(e) => info!(pid = %pid, error = %e, "Background service was already gone"),
            }
        }

        self.virtual_env.deactivate();
        info!("Goodbye!");
    }
}
