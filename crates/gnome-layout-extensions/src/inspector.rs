//! Live extension state via the `gnome-extensions` tool

use std::path::Path;

use gnome_layout_core::types::{extension_set_from_lines, CommandsConfig};
use gnome_layout_core::{ExtensionId, ExtensionSet, ShellVersion, SystemState};
use tracing::{debug, info};

use crate::command::{CommandOutput, CommandRunner};
use crate::error::{CommandError, HostError};

/// Queries and mutates installed extensions through a [`CommandRunner`]
pub struct ExtensionInspector<C> {
    runner: C,
    extensions_tool: String,
    shell_tool: String,
}

impl<C: CommandRunner> ExtensionInspector<C> {
    /// Create an inspector using the standard tool names
    pub fn new(runner: C) -> Self {
        Self::from_config(runner, &CommandsConfig::default())
    }

    /// Create an inspector using the tools named in the configuration
    pub fn from_config(runner: C, config: &CommandsConfig) -> Self {
        Self {
            runner,
            extensions_tool: config.extensions_tool.clone(),
            shell_tool: config.shell_tool.clone(),
        }
    }

    /// Every installed extension
    pub fn list_installed(&self) -> Result<ExtensionSet, CommandError> {
        self.list(&[])
    }

    /// Installed extensions that are enabled
    pub fn list_enabled(&self) -> Result<ExtensionSet, CommandError> {
        self.list(&["--enabled"])
    }

    /// Installed extensions that are disabled
    pub fn list_disabled(&self) -> Result<ExtensionSet, CommandError> {
        self.list(&["--disabled"])
    }

    /// Snapshot of all three listings
    pub fn system_state(&self) -> Result<SystemState, CommandError> {
        let state = SystemState::new(
            self.list_installed()?,
            self.list_enabled()?,
            self.list_disabled()?,
        );
        if !state.is_consistent() {
            debug!(
                "Extension listings disagree: {} installed, {} enabled, {} disabled",
                state.installed.len(),
                state.enabled.len(),
                state.disabled.len()
            );
        }
        Ok(state)
    }

    /// Enable an extension; a failure status is returned, not raised
    pub fn enable(&self, id: &ExtensionId) -> Result<CommandOutput, CommandError> {
        info!("Enabling {}", id);
        self.runner
            .run(&self.extensions_tool, &["enable", id.as_str()])
    }

    /// Disable an extension; a failure status is returned, not raised
    pub fn disable(&self, id: &ExtensionId) -> Result<CommandOutput, CommandError> {
        info!("Disabling {}", id);
        self.runner
            .run(&self.extensions_tool, &["disable", id.as_str()])
    }

    /// Install an archive, replacing any installed copy
    pub fn install(&self, archive: &Path) -> Result<CommandOutput, CommandError> {
        let archive = archive.to_string_lossy();
        info!("Installing {}", archive);
        self.runner
            .run(&self.extensions_tool, &["install", "--force", &archive])
    }

    /// Host shell version
    pub fn shell_version(&self) -> Result<ShellVersion, HostError> {
        let output = self
            .runner
            .run(&self.shell_tool, &["--version"])?
            .check(&self.shell_tool)?;
        let version = ShellVersion::parse(&output.stdout)?;
        debug!("Shell version {}", version);
        Ok(version)
    }

    fn list(&self, flags: &[&str]) -> Result<ExtensionSet, CommandError> {
        let mut args = vec!["list"];
        args.extend_from_slice(flags);

        let output = self
            .runner
            .run(&self.extensions_tool, &args)?
            .check(&self.extensions_tool)?;
        Ok(extension_set_from_lines(output.stdout.lines()))
    }
}
