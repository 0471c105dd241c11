// Dependency Installer Port

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Installation errors
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Installer exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    #[error("IO error: {0}")]
    Io(String),
}

/// Dependency installer trait
///
/// Failures are surfaced to the caller but are never fatal to the
/// launch sequence: a partially satisfied environment may still be
/// usable.
#[async_trait]
pub trait DependencyInstaller: Send + Sync {
    /// Install or update dependencies from the manifest
    async fn install(&self, manifest: &Path) -> Result<(), InstallError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock installer behavior
    #[derive(Debug, Clone)]
    pub enum MockInstallBehavior {
        /// Always succeed
        Success,
        /// Always fail with message
        Fail(String),
    }

    /// Mock DependencyInstaller for testing
    pub struct MockInstaller {
        behavior: Arc<Mutex<MockInstallBehavior>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockInstaller {
        pub fn new(behavior: MockInstallBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockInstallBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockInstallBehavior::Fail(message.into()))
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl DependencyInstaller for MockInstaller {
        async fn install(&self, _manifest: &Path) -> Result<(), InstallError> {
            *self.call_count.lock().unwrap() += 1;

            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                MockInstallBehavior::Success => Ok(()),
                MockInstallBehavior::Fail(msg) => Err(InstallError::SpawnFailed(msg)),
            }
        }
    }
}
