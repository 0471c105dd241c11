// Service Runner Port
// Abstraction for spawning, awaiting, and terminating external processes

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CommandSpec, ServicePid};

/// Process control errors
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Terminate failed: {0}")]
    TerminateFailed(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Service Runner trait
///
/// Implementations:
/// - SystemServiceRunner: real OS processes
#[async_trait]
pub trait ServiceRunner: Send + Sync {
    /// Spawn a detached background process and return its pid.
    /// The child must not hold the controlling terminal.
    async fn spawn_background(&self, command: &CommandSpec) -> Result<ServicePid, RunnerError>;

    /// Run a process in the foreground with inherited stdio, blocking
    /// until it exits. Returns the exit code when the OS reports one.
    async fn run_foreground(&self, command: &CommandSpec) -> Result<Option<i32>, RunnerError>;

    /// Terminate a process this run spawned
    ///
    /// # Errors
    /// - RunnerError::TerminateFailed if the process is already gone
    ///   or cannot be signalled
    async fn terminate(&self, pid: ServicePid) -> Result<(), RunnerError>;

    /// Check if a process is still alive
    fn is_alive(&self, pid: ServicePid) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    const MOCK_PID: i32 = 4242;

    /// Mock ServiceRunner recording spawn/terminate/foreground calls
    pub struct MockServiceRunner {
        spawned: Arc<Mutex<Vec<CommandSpec>>>,
        terminated: Arc<Mutex<Vec<ServicePid>>>,
        foreground_runs: Arc<Mutex<Vec<CommandSpec>>>,
        spawn_fails: bool,
        foreground_exit: Option<i32>,
    }

    impl MockServiceRunner {
        pub fn new() -> Self {
            Self {
                spawned: Arc::new(Mutex::new(Vec::new())),
                terminated: Arc::new(Mutex::new(Vec::new())),
                foreground_runs: Arc::new(Mutex::new(Vec::new())),
                spawn_fails: false,
                foreground_exit: Some(0),
            }
        }

        pub fn new_spawn_failing() -> Self {
            Self {
                spawn_fails: true,
                ..Self::new()
            }
        }

        pub fn with_foreground_exit(exit: Option<i32>) -> Self {
            Self {
                foreground_exit: exit,
                ..Self::new()
            }
        }

        pub fn spawn_count(&self) -> usize {
            self.spawned.lock().unwrap().len()
        }

        pub fn terminated_pids(&self) -> Vec<ServicePid> {
            self.terminated.lock().unwrap().clone()
        }

        pub fn foreground_commands(&self) -> Vec<CommandSpec> {
            self.foreground_runs.lock().unwrap().clone()
        }
    }

    impl Default for MockServiceRunner {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ServiceRunner for MockServiceRunner {
        async fn spawn_background(
            &self,
            command: &CommandSpec,
        ) -> Result<ServicePid, RunnerError> {
            if self.spawn_fails {
                return Err(RunnerError::SpawnFailed("mock spawn failure".to_string()));
            }
            self.spawned.lock().unwrap().push(command.clone());
            Ok(ServicePid::new(MOCK_PID))
        }

        async fn run_foreground(
            &self,
            command: &CommandSpec,
        ) -> Result<Option<i32>, RunnerError> {
            self.foreground_runs.lock().unwrap().push(command.clone());
            Ok(self.foreground_exit)
        }

        async fn terminate(&self, pid: ServicePid) -> Result<(), RunnerError> {
            self.terminated.lock().unwrap().push(pid);
            Ok(())
        }

        fn is_alive(&self, _pid: ServicePid) -> bool {
            false
        }
    }
}
