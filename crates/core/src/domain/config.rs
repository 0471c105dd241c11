// Launcher Configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::process::CommandSpec;

pub const DEFAULT_VENV_DIR: &str = "venv";
pub const DEFAULT_REQUIREMENTS: &str = "requirements.txt";
pub const DEFAULT_APP_ENTRY: &str = "app.py";
pub const DEFAULT_HEALTH_ENDPOINT: &str = "http://127.0.0.1:11434/";
pub const DEFAULT_STARTUP_GRACE_SECS: u64 = 5;

const UI_PROGRAM: &str = "streamlit";

/// Fixed configuration for one launcher run.
///
/// Defaults match the local dev setup: a `venv/` next to the working
/// directory, a Streamlit UI entry file, and an Ollama inference
/// service on its standard port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Virtual environment directory (must exist; checked before any
    /// other step runs)
    pub venv_dir: PathBuf,

    /// Dependency manifest consumed by the installer
    pub requirements: PathBuf,

    /// Web UI entry file (must exist before the foreground launch)
    pub app_entry: PathBuf,

    /// Health endpoint of the inference service
    pub health_endpoint: String,

    /// Command that starts the inference service in the background
    pub service_command: CommandSpec,

    /// Blind wait after spawning the service, before the UI starts
    pub startup_grace: Duration,
}

impl LaunchConfig {
    /// Foreground UI command for the configured entry file
    pub fn ui_command(&self) -> CommandSpec {
        CommandSpec::new(
            UI_PROGRAM,
            ["run".to_string(), self.app_entry.display().to_string()],
        )
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            venv_dir: PathBuf::from(DEFAULT_VENV_DIR),
            requirements: PathBuf::from(DEFAULT_REQUIREMENTS),
            app_entry: PathBuf::from(DEFAULT_APP_ENTRY),
            health_endpoint: DEFAULT_HEALTH_ENDPOINT.to_string(),
            service_command: CommandSpec::new("ollama", ["serve"]),
            startup_grace: Duration::from_secs(DEFAULT_STARTUP_GRACE_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_command_targets_entry_file() {
        let config = LaunchConfig::default();
        let command = config.ui_command();
        assert_eq!(command.program, "streamlit");
        assert_eq!(command.args, vec!["run", "app.py"]);
    }
}
