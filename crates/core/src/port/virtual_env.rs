// Virtual Environment Port
// Abstraction over pointing the current process at an isolated toolchain

use std::path::Path;
use thiserror::Error;

/// Activation errors
#[derive(Error, Debug)]
pub enum ActivationError {
    #[error("IO error: {0}")]
    Io(String),
}

/// Virtual environment seam
///
/// Implementations:
/// - VenvActivator: mutates PATH/VIRTUAL_ENV of the current process
pub trait VirtualEnv: Send + Sync {
    /// Make the environment's tooling take precedence for this process
    /// and its children. The directory is known to exist by the time
    /// this is called.
    fn activate(&self, venv_dir: &Path) -> Result<(), ActivationError>;

    /// Restore the pre-activation environment. Best-effort: called
    /// during cleanup, which must never fail.
    fn deactivate(&self);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Mock VirtualEnv recording activation and deactivation calls
    pub struct MockVirtualEnv {
        activations: Arc<Mutex<Vec<PathBuf>>>,
        deactivations: Arc<Mutex<usize>>,
        fail: bool,
    }

    impl MockVirtualEnv {
        pub fn new() -> Self {
            Self {
                activations: Arc::new(Mutex::new(Vec::new())),
                deactivations: Arc::new(Mutex::new(0)),
                fail: false,
            }
        }

        pub fn new_failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        pub fn activation_count(&self) -> usize {
            self.activations.lock().unwrap().len()
        }

        pub fn deactivation_count(&self) -> usize {
            *self.deactivations.lock().unwrap()
        }
    }

    impl Default for MockVirtualEnv {
        fn default() -> Self {
            Self::new()
        }
    }

    impl VirtualEnv for MockVirtualEnv {
        fn activate(&self, venv_dir: &Path) -> Result<(), ActivationError> {
            self.activations.lock().unwrap().push(venv_dir.to_path_buf());
            if self.fail {
                return Err(ActivationError::Io("mock activation failure".to_string()));
            }
            Ok(())
        }

        fn deactivate(&self) {
            *self.deactivations.lock().unwrap() += 1;
        }
    }
}
