//! Utility functions shared across CLI commands

use anyhow::{Context, Result};
use camino::Utf8Path;
use gnome_layout_core::{HierarchicalConfigLoader, RuntimeConfig};
use gnome_layout_extensions::{ExtensionInspector, LayoutStore, SystemCommandRunner};
use tracing::debug;

/// Load the runtime configuration, letting `--layouts-dir` win over every other layer
pub fn load_config(layouts_dir: Option<&Utf8Path>) -> Result<RuntimeConfig> {
    let loader =
        HierarchicalConfigLoader::new().context("Failed to locate the configuration directory")?;
    let mut config = loader.load_runtime_config().with_context(|| {
        format!(
            "Failed to load configuration ({})",
            loader.user_config_path()
        )
    })?;

    if let Some(dir) = layouts_dir {
        config.layouts_dir = dir.to_string();
    }

    debug!("Using layouts directory {}", config.layouts_path().display());
    Ok(config)
}

/// Runner for host commands, bounded by `commands.timeout-secs`
pub fn command_runner(config: &RuntimeConfig) -> SystemCommandRunner {
    SystemCommandRunner::with_timeout_secs(config.commands.timeout_secs)
}

/// Inspector using the configured tool names
pub fn inspector<'a>(
    runner: &'a SystemCommandRunner,
    config: &RuntimeConfig,
) -> ExtensionInspector<&'a SystemCommandRunner> {
    ExtensionInspector::from_config(runner, &config.commands)
}

/// Store rooted at the configured layouts directory
pub fn layout_store(config: &RuntimeConfig) -> LayoutStore {
    LayoutStore::new(config.layouts_path())
}
