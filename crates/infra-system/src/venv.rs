// Python virtual environment activation
// Mirrors what `source venv/bin/activate` does: the venv's bin
// directory leads PATH, VIRTUAL_ENV is exported, PYTHONHOME is
// cleared. Prior values are saved so deactivation can restore them.

use std::env;
use std::ffi::OsString;
use std::path::Path;
use std::sync::Mutex;

use tracing::debug;

use nutrisci_core::port::virtual_env::{ActivationError, VirtualEnv};

#[cfg(windows)]
const VENV_BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const VENV_BIN_DIR: &str = "bin";

/// Pre-activation values, restored on deactivate
struct SavedEnv {
    path: Option<OsString>,
    virtual_env: Option<OsString>,
    python_home: Option<OsString>,
}

/// Activates a venv by mutating the current process environment so
/// the interpreter and tools resolved by child processes come from
/// the isolated environment.
pub struct VenvActivator {
    saved: Mutex<Option<SavedEnv>>,
}

impl VenvActivator {
    pub fn new() -> Self {
        Self {
            saved: Mutex::new(None),
        }
    }
}

impl Default for VenvActivator {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualEnv for VenvActivator {
    fn activate(&self, venv_dir: &Path) -> Result<(), ActivationError> {
        let venv_abs = venv_dir
            .canonicalize()
            .map_err(|e| ActivationError::Io(e.to_string()))?;
        let bin_dir = venv_abs.join(VENV_BIN_DIR);

        let saved = SavedEnv {
            path: env::var_os("PATH"),
            virtual_env: env::var_os("VIRTUAL_ENV"),
            python_home: env::var_os("PYTHONHOME"),
        };

        let mut search_path = vec![bin_dir.clone()];
        if let Some(old) = &saved.path {
            search_path.extend(env::split_paths(old));
        }
        let joined =
            env::join_paths(search_path).map_err(|e| ActivationError::Io(e.to_string()))?;

        env::set_var("PATH", &joined);
        env::set_var("VIRTUAL_ENV", &venv_abs);
        env::remove_var("PYTHONHOME");

        *self.saved.lock().unwrap() = Some(saved);
        debug!(bin_dir = %bin_dir.display(), "Environment variables updated");
        Ok(())
    }

    fn deactivate(&self) {
        let Some(saved) = self.saved.lock().unwrap().take() else {
            return;
        };

        restore("PATH", saved.path);
        restore("VIRTUAL_ENV", saved.virtual_env);
        restore("PYTHONHOME", saved.python_home);
        debug!("Environment variables restored");
    }
}

fn restore(key: &str, value: Option<OsString>) {
    match value {
        Some(v) => env::set_var(key, v),
        None => env::remove_var(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Activation and restoration live in one test: PATH is
    // process-wide state and must not race another test.
    #[test]
    fn activate_then_deactivate_round_trips_env() {
        let venv_dir =
            std::env::temp_dir().join(format!("nutrisci-venv-{}", std::process::id()));
        std::fs::create_dir_all(venv_dir.join(VENV_BIN_DIR)).unwrap();

        let before_path = env::var_os("PATH");
        let activator = VenvActivator::new();

        activator.activate(&venv_dir).unwrap();

        let venv_abs = venv_dir.canonicalize().unwrap();
        let bin_dir = venv_abs.join(VENV_BIN_DIR);
        let active_path = env::var("PATH").unwrap();
        assert!(active_path.starts_with(bin_dir.to_str().unwrap()));
        assert_eq!(
            env::var_os("VIRTUAL_ENV"),
            Some(venv_abs.clone().into_os_string())
        );

        activator.deactivate();
        assert_eq!(env::var_os("PATH"), before_path);

        std::fs::remove_dir_all(&venv_dir).ok();
    }

    #[test]
    fn activate_missing_dir_fails() {
        let activator = VenvActivator::new();
        let result = activator.activate(Path::new("/definitely/missing/venv"));
        assert!(matches!(result, Err(ActivationError::Io(_))));
    }

    #[test]
    fn deactivate_without_activation_is_a_noop() {
        VenvActivator::new().deactivate();
    }
}
