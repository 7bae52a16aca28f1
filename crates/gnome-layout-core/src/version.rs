//! Host shell version

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Dotted `major.minor` shell version used in registry queries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShellVersion(String);

impl ShellVersion {
    /// Parse the output of `gnome-shell --version`
    ///
    /// Every character other than a digit or `.` is dropped, then the first
    /// two non-empty components are kept: `"GNOME Shell 45.2"` gives `45.2`
    /// and `"GNOME Shell 46"` gives `46`.
    pub fn parse(raw: &str) -> Result<Self> {
        let filtered: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let components: Vec<&str> = filtered
            .split('.')
            .filter(|part| !part.is_empty())
            .take(2)
            .collect();

        if components.is_empty() {
            return Err(Error::invalid_shell_version(raw.trim()));
        }

        Ok(Self(components.join(".")))
    }

    /// The version string as sent to the registry
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShellVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShellVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShellVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ShellVersion> for String {
    fn from(version: ShellVersion) -> Self {
        version.0
    }
}
