//! Shell settings capture and restore through dconf

use gnome_layout_core::types::CommandsConfig;
use gnome_layout_core::KeyFile;
use tracing::{debug, info};

use crate::command::CommandRunner;
use crate::error::{CommandError, HostError};
use crate::store::{DISABLED_KEY, ENABLED_KEY, ROOT_SECTION};

/// Dumps and loads the shell's dconf subtree
pub struct ShellSettings<C> {
    runner: C,
    dconf_tool: String,
    path: String,
}

impl<C: CommandRunner> ShellSettings<C> {
    /// Create a settings handle using the standard dconf path
    pub fn new(runner: C) -> Self {
        Self::from_config(runner, &CommandsConfig::default())
    }

    /// Create a settings handle from the command configuration
    pub fn from_config(runner: C, config: &CommandsConfig) -> Self {
        Self {
            runner,
            dconf_tool: config.dconf_tool.clone(),
            path: config.settings_path.clone(),
        }
    }

    /// Capture the settings tree without the extension lists
    ///
    /// The extension lists are owned by the layout itself and by the
    /// enable/disable commands, so they are never part of captured settings.
    pub fn dump(&self) -> Result<KeyFile, HostError> {
        let output = self
            .runner
            .run(&self.dconf_tool, &["dump", &self.path])?
            .check(&self.dconf_tool)?;
        let dump = KeyFile::parse(&output.stdout, &format!("dconf dump {}", self.path))?;
        let settings = without_extension_lists(dump);
        debug!("Captured {} settings sections", settings.sections().len());
        Ok(settings)
    }

    /// Load settings into the tree; empty settings are a no-op
    pub fn load(&self, settings: &KeyFile) -> Result<(), CommandError> {
        let settings = without_extension_lists(settings.clone());
        if settings.is_empty() {
            debug!("No settings to restore");
            return Ok(());
        }

        info!("Restoring shell settings under {}", self.path);
        self.runner
            .run_with_input(&self.dconf_tool, &["load", &self.path], &settings.to_string())?
            .check(&self.dconf_tool)?;
        Ok(())
    }
}

/// Drop `enabled-extensions` and `disabled-extensions` from `[/]`
pub fn without_extension_lists(mut settings: KeyFile) -> KeyFile {
    settings.remove(ROOT_SECTION, ENABLED_KEY);
    settings.remove(ROOT_SECTION, DISABLED_KEY);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_extension_lists() {
        let dump = KeyFile::parse(
            "[/]\n\
             enabled-extensions=['a@x']\n\
             disabled-extensions=['b@x']\n\
             favorite-apps=['firefox.desktop']\n\
             \n\
             [extensions/dash-to-dock]\n\
             dock-fixed=true\n",
            "dump",
        )
        .unwrap();

        let settings = without_extension_lists(dump);
        assert_eq!(settings.get("/", ENABLED_KEY), None);
        assert_eq!(settings.get("/", DISABLED_KEY), None);
        assert_eq!(settings.get("/", "favorite-apps"), Some("['firefox.desktop']"));
        assert_eq!(settings.get("extensions/dash-to-dock", "dock-fixed"), Some("true"));
    }

    #[test]
    fn test_only_extension_lists_leaves_nothing() {
        let dump = KeyFile::parse("[/]\nenabled-extensions=@as []\n", "dump").unwrap();
        assert!(without_extension_lists(dump).is_empty());
    }
}
