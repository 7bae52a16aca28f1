//! Shared utility functions for gnome-layout crates

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Get the user's home directory
///
/// HOME wins over `dirs::home_dir()` so that tests and sandboxed sessions can
/// point the tool at another home.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    dirs::home_dir().ok_or_else(|| Error::invalid_config("Could not determine home directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_home_dir_from_env() {
        if std::env::var("HOME").is_ok() {
            let home = get_home_dir().unwrap();
            assert!(!home.as_os_str().is_empty());
        }
    }
}
