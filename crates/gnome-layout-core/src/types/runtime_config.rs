//! Runtime configuration types for operational parameters
//!
//! These types define configuration that controls runtime behavior like
//! where layouts live, which registry to query, and how external commands
//! are invoked.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Directory holding `<name>.conf` layout files; `~` is expanded
    #[serde(default = "default_layouts_dir")]
    pub layouts_dir: String,

    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// External command configuration
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Shell settings capture/restore
    #[serde(default)]
    pub settings: SettingsConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            layouts_dir: default_layouts_dir(),
            network: NetworkConfig::default(),
            commands: CommandsConfig::default(),
            settings: SettingsConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Layout directory with a leading `~` expanded
    pub fn layouts_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.layouts_dir).into_owned())
    }

    /// Directory caching downloaded extension archives
    pub fn extension_cache_path(&self) -> PathBuf {
        self.layouts_path().join("extensions")
    }
}

fn default_layouts_dir() -> String {
    "~/.config/layouts".to_string()
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Base URL of the extension registry
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// HTTP timeout in seconds, applied to every registry request
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_registry_url() -> String {
    "https://extensions.gnome.org".to_string()
}
fn default_http_timeout() -> u64 {
    60
}
fn default_user_agent() -> String {
    format!(
        "gnome-layout/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// External command configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandsConfig {
    /// Timeout in seconds for each external command
    #[serde(default = "default_command_timeout")]
    pub timeout_secs: u64,

    /// Extension management tool
    #[serde(default = "default_extensions_tool")]
    pub extensions_tool: String,

    /// Shell binary queried for its version
    #[serde(default = "default_shell_tool")]
    pub shell_tool: String,

    /// dconf binary used to dump and load shell settings
    #[serde(default = "default_dconf_tool")]
    pub dconf_tool: String,

    /// dconf directory holding the shell settings
    #[serde(default = "default_settings_path")]
    pub settings_path: String,

    /// Command (program followed by arguments) restarting the shell on X11
    #[serde(default = "default_restart_shell")]
    pub restart_shell: Vec<String>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_command_timeout(),
            extensions_tool: default_extensions_tool(),
            shell_tool: default_shell_tool(),
            dconf_tool: default_dconf_tool(),
            settings_path: default_settings_path(),
            restart_shell: default_restart_shell(),
        }
    }
}

fn default_command_timeout() -> u64 {
    120
}
fn default_extensions_tool() -> String {
    "gnome-extensions".to_string()
}
fn default_shell_tool() -> String {
    "gnome-shell".to_string()
}
fn default_dconf_tool() -> String {
    "dconf".to_string()
}
fn default_settings_path() -> String {
    "/org/gnome/shell/".to_string()
}
fn default_restart_shell() -> Vec<String> {
    vec![
        "killall".to_string(),
        "-3".to_string(),
        "gnome-shell".to_string(),
    ]
}

/// Shell settings capture/restore
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SettingsConfig {
    /// Store the shell settings tree in new and overwritten layouts
    #[serde(default = "default_true")]
    pub capture: bool,

    /// Load stored settings after a layout was applied
    #[serde(default = "default_true")]
    pub restore: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            capture: true,
            restore: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.layouts_dir, "~/.config/layouts");

        let parsed: RuntimeConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(parsed.layouts_dir, "~/.config/layouts");
        assert_eq!(parsed.network.registry_url, "https://extensions.gnome.org");
        assert_eq!(parsed.commands.extensions_tool, "gnome-extensions");
        assert!(parsed.settings.capture);
    }

    #[test]
    fn test_kebab_case_fields() {
        let yaml = r#"
layouts-dir: /tmp/layouts
network:
  http-timeout-secs: 5
commands:
  restart-shell: [busctl, --user, restart]
settings:
  restore: false
"#;
        let config: RuntimeConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.layouts_path(), PathBuf::from("/tmp/layouts"));
        assert_eq!(
            config.extension_cache_path(),
            PathBuf::from("/tmp/layouts/extensions")
        );
        assert_eq!(config.network.http_timeout_secs, 5);
        assert_eq!(config.commands.restart_shell[0], "busctl");
        assert!(!config.settings.restore);
        assert!(config.settings.capture);
    }
}
