//! Error types for gnome-layout-extensions

use thiserror::Error;

/// Failures reported by an [`crate::command::CommandRunner`]
#[derive(Error, Debug)]
pub enum CommandError {
    /// Program is not on PATH
    #[error("Command not found: {program}")]
    NotFound { program: String },

    /// Process could not be started or its output could not be collected
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a failure status
    #[error("{program} exited with status {status}: {stderr}")]
    Failed {
        program: String,
        status: i32,
        stderr: String,
    },

    /// Process did not finish in time and was killed
    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },
}

impl CommandError {
    /// Create a failed-status error, trimming the captured stderr
    pub fn failed(program: impl Into<String>, status: i32, stderr: &str) -> Self {
        Self::Failed {
            program: program.into(),
            status,
            stderr: stderr.trim().to_string(),
        }
    }
}

/// Failures while resolving or downloading an extension archive
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Search returned no candidates
    #[error("Extension {id} not found in the registry")]
    NotFound { id: String },

    /// No build published for the host shell version
    #[error("No download of {id} available for shell version {shell_version}")]
    LinkUnavailable { id: String, shell_version: String },

    /// Network failure or undecodable response
    #[error("Registry request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Unexpected HTTP status
    #[error("Registry returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Writing the archive into the cache failed
    #[error("Failed to store archive: {0}")]
    Io(#[from] std::io::Error),

    /// Registry base or download path is not a valid URL
    #[error("Invalid registry URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl RegistryError {
    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a link unavailable error
    pub fn link_unavailable(id: impl Into<String>, shell_version: impl Into<String>) -> Self {
        Self::LinkUnavailable {
            id: id.into(),
            shell_version: shell_version.into(),
        }
    }
}

/// Failures of host queries whose output must be parsed
#[derive(Error, Debug)]
pub enum HostError {
    /// The host command failed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The command output could not be understood
    #[error(transparent)]
    Parse(#[from] gnome_layout_core::Error),
}
