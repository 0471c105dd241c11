// OS process control for the launcher
// Background children are detached from the terminal (null stdio)
// and reaped by a spawned wait task; the foreground child inherits
// stdio and is awaited to completion.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;
#[cfg(unix)]
use tracing::warn;

use nutrisci_core::domain::{CommandSpec, ServicePid};
use nutrisci_core::port::service_runner::{RunnerError, ServiceRunner};

/// How long a terminated service gets to exit before SIGKILL
#[cfg(unix)]
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
#[cfg(unix)]
const LIVENESS_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawns and controls real OS processes
pub struct SystemServiceRunner;

impl SystemServiceRunner {
    pub fn new() -> Self {
        Self
    }

    /// SIGTERM first, SIGKILL if the process lingers past the grace
    #[cfg(unix)]
    async fn kill_graceful(&self, pid: i32) -> Result<(), RunnerError> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        info!(pid = %pid, "Sending SIGTERM for graceful shutdown");
        kill(Pid::from_raw(pid), Signal::SIGTERM)
            .map_err(|e| RunnerError::TerminateFailed(format!("SIGTERM failed: {}", e)))?;

        let deadline = tokio::time::Instant::now() + GRACEFUL_SHUTDOWN_TIMEOUT;
        loop {
            tokio::time::sleep(LIVENESS_POLL_INTERVAL).await;

            // Signal 0 checks existence without delivering anything
            if kill(Pid::from_raw(pid), None).is_err() {
                info!(pid = %pid, "Process exited after SIGTERM");
                return Ok(());
            }

            if tokio::time::Instant::now() >= deadline {
                warn!(pid = %pid, "Process did not exit after SIGTERM, sending SIGKILL");
                kill(Pid::from_raw(pid), Signal::SIGKILL)
                    .map_err(|e| RunnerError::TerminateFailed(format!("SIGKILL failed: {}", e)))?;
                return Ok(());
            }
        }
    }

    #[cfg(windows)]
    async fn kill_graceful(&self, pid: i32) -> Result<(), RunnerError> {
        info!(pid = %pid, "Killing process on Windows");
        let output = Command::new("taskkill")
            .args(["/F", "/PID", &pid.to_string()])
            .output()
            .await
            .map_err(|e| RunnerError::TerminateFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(RunnerError::TerminateFailed(format!(
                "taskkill failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(())
    }
}

impl Default for SystemServiceRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceRunner for SystemServiceRunner {
    async fn spawn_background(&self, command: &CommandSpec) -> Result<ServicePid, RunnerError> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RunnerError::SpawnFailed(e.to_string()))?;

        let raw_pid = child.id().ok_or_else(|| {
            RunnerError::SpawnFailed("child exited before its pid could be read".to_string())
        })? as i32;

        // Reap the child whenever it exits so it never lingers as a zombie
        tokio::spawn(async move {
            let _ = child.wait().await;
        });

        info!(command = %command, pid = %raw_pid, "Background process spawned");
        Ok(ServicePid::new(raw_pid))
    }

    async fn run_foreground(&self, command: &CommandSpec) -> Result<Option<i32>, RunnerError> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .spawn()
            .map_err(|e| RunnerError::SpawnFailed(e.to_string()))?;

        let status = child
            .wait()
            .await
            .map_err(|e| RunnerError::Io(e.to_string()))?;

        info!(command = %command, exit_code = ?status.code(), "Foreground process exited");
        Ok(status.code())
    }

    async fn terminate(&self, pid: ServicePid) -> Result<(), RunnerError> {
        self.kill_graceful(pid.as_raw()).await
    }

    fn is_alive(&self, pid: ServicePid) -> bool {
        #[cfg(unix)]
        {
            use nix::sys::signal::kill;
            use nix::unistd::Pid;

            kill(Pid::from_raw(pid.as_raw()), None).is_ok()
        }

        #[cfg(windows)]
        {
            let output = std::process::Command::new("tasklist")
                .args(["/FI", &format!("PID eq {}", pid.as_raw()), "/NH"])
                .output();

            match output {
                Ok(output) => String::from_utf8_lossy(&output.stdout)
                    .contains(&pid.as_raw().to_string()),
                Err(_) => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_and_terminate_background_process() {
        let runner = SystemServiceRunner::new();
        let pid = runner
            .spawn_background(&CommandSpec::new("sleep", ["30"]))
            .await
            .unwrap();
        assert!(runner.is_alive(pid));

        runner.terminate(pid).await.unwrap();
        // terminate returns once the pid is gone or was force-killed
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!runner.is_alive(pid));
    }

    #[tokio::test]
    async fn spawn_missing_binary_fails() {
        let runner = SystemServiceRunner::new();
        let result = runner
            .spawn_background(&CommandSpec::new("definitely-not-a-binary", Vec::<String>::new()))
            .await;
        assert!(matches!(result, Err(RunnerError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn run_foreground_reports_exit_code() {
        let runner = SystemServiceRunner::new();
        let code = runner
            .run_foreground(&CommandSpec::new("true", Vec::<String>::new()))
            .await
            .unwrap();
        assert_eq!(code, Some(0));
    }

    #[tokio::test]
    async fn run_foreground_reports_nonzero_exit() {
        let runner = SystemServiceRunner::new();
        let code = runner
            .run_foreground(&CommandSpec::new("false", Vec::<String>::new()))
            .await
            .unwrap();
        assert_eq!(code, Some(1));
    }

    #[tokio::test]
    async fn terminate_unknown_pid_fails() {
        let runner = SystemServiceRunner::new();
        // Way above any real pid on a dev box
        let result = runner.terminate(ServicePid::new(i32::MAX - 1)).await;
        assert!(matches!(result, Err(RunnerError::TerminateFailed(_))));
    }
}
