//! Error types for gnome-layout-core

use thiserror::Error;

/// Result type alias using gnome-layout-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for gnome-layout
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted value did not match its grammar
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    /// Layout name already taken in the store
    #[error("Layout '{name}' already exists")]
    NameConflict { name: String },

    /// Layout file does not exist
    #[error("Layout '{name}' not found")]
    LayoutNotFound { name: String },

    /// Layout name cannot be used as a file name
    #[error("Invalid layout name '{name}': {reason}")]
    InvalidLayoutName { name: String, reason: String },

    /// Empty or otherwise unusable extension identifier
    #[error("Invalid extension id: {id:?}")]
    InvalidExtensionId { id: String },

    /// Shell version string without a usable version number
    #[error("Invalid shell version: {version:?}")]
    InvalidShellVersion { version: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a parse error for the given context (file name, key, ...)
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a name conflict error
    pub fn name_conflict(name: impl Into<String>) -> Self {
        Self::NameConflict { name: name.into() }
    }

    /// Create a layout not found error
    pub fn layout_not_found(name: impl Into<String>) -> Self {
        Self::LayoutNotFound { name: name.into() }
    }

    /// Create an invalid layout name error
    pub fn invalid_layout_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLayoutName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid extension id error
    pub fn invalid_extension_id(id: impl Into<String>) -> Self {
        Self::InvalidExtensionId { id: id.into() }
    }

    /// Create an invalid shell version error
    pub fn invalid_shell_version(version: impl Into<String>) -> Self {
        Self::InvalidShellVersion {
            version: version.into(),
        }
    }

    /// Returns true for errors caused by malformed persisted data
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
