// External Process Model

use serde::{Deserialize, Serialize};

/// Pid of a background service spawned by this run.
///
/// This is the launcher's only piece of mutable state: recorded once
/// when the service is spawned, consumed once during cleanup. A
/// service found already running is never represented by one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePid(i32);

impl ServicePid {
    pub fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ServicePid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An external command: program plus argument vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a whitespace-separated command line ("ollama serve").
    /// Returns None for an empty line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?.to_string();
        Some(Self {
            program,
            args: parts.map(str::to_string).collect(),
        })
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_program_and_args() {
        let spec = CommandSpec::parse("ollama serve").unwrap();
        assert_eq!(spec.program, "ollama");
        assert_eq!(spec.args, vec!["serve"]);
    }

    #[test]
    fn parse_rejects_empty_line() {
        assert!(CommandSpec::parse("   ").is_none());
    }

    #[test]
    fn display_round_trips() {
        let spec = CommandSpec::new("streamlit", ["run", "app.py"]);
        assert_eq!(spec.to_string(), "streamlit run app.py");
    }
}
