//! Desktop session detection

use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::command::CommandRunner;
use crate::error::CommandError;

/// Display server of the running session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Wayland,
    X11,
    Unknown,
}

impl SessionType {
    /// Read `XDG_SESSION_TYPE`
    pub fn detect() -> Self {
        std::env::var("XDG_SESSION_TYPE")
            .map(|value| Self::from_value(&value))
            .unwrap_or(Self::Unknown)
    }

    /// Interpret an `XDG_SESSION_TYPE` value
    pub fn from_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "wayland" => Self::Wayland,
            "x11" => Self::X11,
            _ => Self::Unknown,
        }
    }

    /// The shell can be restarted in place only on X11
    pub fn can_restart_shell(&self) -> bool {
        matches!(self, Self::X11)
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wayland => write!(f, "Wayland"),
            Self::X11 => write!(f, "X11"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Run the configured shell restart command (program followed by arguments)
pub fn restart_shell<C: CommandRunner>(runner: &C, command: &[String]) -> Result<(), CommandError> {
    let (program, args) = command.split_first().ok_or_else(|| CommandError::NotFound {
        program: "(empty restart command)".to_string(),
    })?;
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    info!("Restarting shell with {}", command.join(" "));
    runner.run(program, &args)?.check(program)?;
    Ok(())
}
