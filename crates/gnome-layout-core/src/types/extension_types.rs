//! Extension identifier and system state types

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Ordered set of extension identifiers
pub type ExtensionSet = BTreeSet<ExtensionId>;

/// Shell extension identifier, canonically `<name>@<domain>`
///
/// Equality is exact string comparison. The empty string is never a valid id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExtensionId(String);

impl ExtensionId {
    /// Create an id, rejecting empty or whitespace-only input
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::invalid_extension_id(id));
        }
        Ok(Self(id))
    }

    /// The raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name: the part before the first `@`
    pub fn display_name(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ExtensionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ExtensionId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ExtensionId> for String {
    fn from(id: ExtensionId) -> Self {
        id.0
    }
}

impl AsRef<str> for ExtensionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ExtensionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Build an [`ExtensionSet`] from raw lines, skipping blank entries
pub fn extension_set_from_lines<'a, I>(lines: I) -> ExtensionSet
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(str::trim)
        .filter_map(|line| ExtensionId::new(line).ok())
        .collect()
}

/// Point-in-time snapshot of the extensions known to the shell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    /// Every installed extension
    pub installed: ExtensionSet,

    /// Installed extensions that are currently enabled
    pub enabled: ExtensionSet,

    /// Installed extensions that are currently disabled
    pub disabled: ExtensionSet,
}

impl SystemState {
    /// Create a state snapshot from the three listings
    pub fn new(installed: ExtensionSet, enabled: ExtensionSet, disabled: ExtensionSet) -> Self {
        Self {
            installed,
            enabled,
            disabled,
        }
    }

    /// Build a consistent state where `installed = enabled ∪ disabled`
    pub fn from_partition(enabled: ExtensionSet, disabled: ExtensionSet) -> Self {
        let installed = enabled.union(&disabled).cloned().collect();
        Self {
            installed,
            enabled,
            disabled,
        }
    }

    /// Whether enabled and disabled partition the installed set
    pub fn is_consistent(&self) -> bool {
        let union: ExtensionSet = self.enabled.union(&self.disabled).cloned().collect();
        union == self.installed && self.enabled.is_disjoint(&self.disabled)
    }

    /// Check whether an extension is installed
    pub fn is_installed(&self, id: &str) -> bool {
        self.installed.contains(id)
    }

    /// Check whether an extension is enabled
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.contains(id)
    }
}
