// Pip dependency installation
// Runs the installer as a child process with captured output. The
// launch sequence treats any failure here as a warning, so this
// adapter only has to report it faithfully.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use nutrisci_core::port::dependency_installer::{DependencyInstaller, InstallError};

const PIP_PROGRAM: &str = "pip";
// pip output can run to thousands of lines; the error keeps the tail
const STDERR_TAIL_LINES: usize = 5;

/// Installs dependencies with `pip install -r <manifest>`.
/// Relies on PATH resolution, so an activated venv supplies its pip.
pub struct PipInstaller;

impl PipInstaller {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PipInstaller {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DependencyInstaller for PipInstaller {
    async fn install(&self, manifest: &Path) -> Result<(), InstallError> {
        let started = Instant::now();
        info!(manifest = %manifest.display(), "Installing dependencies");

        let child = Command::new(PIP_PROGRAM)
            .arg("install")
            .arg("-r")
            .arg(manifest)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| InstallError::SpawnFailed(e.to_string()))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| InstallError::Io(e.to_string()))?;

        let duration_ms = started.elapsed().as_millis() as u64;

        if output.status.success() {
            info!(duration_ms = %duration_ms, "Dependency installation completed");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");

            Err(InstallError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: tail,
            })
        }
    }
}
