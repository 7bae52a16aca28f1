//! Layout types

use serde::{Deserialize, Serialize};

use super::extension_types::{ExtensionSet, SystemState};
use crate::error::{Error, Result};
use crate::keyfile::KeyFile;

/// Named desired-state record
///
/// Every extension not listed in `enabled_extensions` is desired-disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Layout name, unique within a store directory
    pub name: String,

    /// Extensions that should be enabled
    pub enabled_extensions: ExtensionSet,

    /// Additional shell settings captured alongside the extension list
    #[serde(skip)]
    pub settings: KeyFile,
}

impl Layout {
    /// Create a layout after validating its name
    pub fn new(name: impl Into<String>, enabled_extensions: ExtensionSet) -> Result<Self> {
        let name = name.into();
        validate_layout_name(&name)?;
        Ok(Self {
            name,
            enabled_extensions,
            settings: KeyFile::new(),
        })
    }

    /// Snapshot the currently enabled extensions of a system
    pub fn snapshot(name: impl Into<String>, state: &SystemState) -> Result<Self> {
        Self::new(name, state.enabled.clone())
    }

    /// Attach captured shell settings
    pub fn with_settings(mut self, settings: KeyFile) -> Self {
        self.settings = settings;
        self
    }

    /// Whether the layout carries settings beyond the extension list
    pub fn has_settings(&self) -> bool {
        !self.settings.is_empty()
    }
}

/// Check that a layout name can be used as a file stem inside the store
pub fn validate_layout_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_layout_name(name, "name is empty"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(Error::invalid_layout_name(
            name,
            "name must not contain path separators",
        ));
    }
    if name.starts_with('.') {
        return Err(Error::invalid_layout_name(name, "name must not start with '.'"));
    }
    if name.contains('\0') {
        return Err(Error::invalid_layout_name(name, "name must not contain NUL"));
    }
    Ok(())
}
