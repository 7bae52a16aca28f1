//! Layout management commands
//!
//! - list: saved layouts with their extension counts
//! - show: extensions of one layout against the live state
//! - add / overwrite: snapshot the enabled extensions (and shell settings)
//! - remove: delete a layout file

use anyhow::{anyhow, Context, Result};
use gnome_layout_core::{Error, KeyFile, RuntimeConfig, SystemState};
use gnome_layout_extensions::{LayoutStore, ShellSettings, SystemCommandRunner};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::warn;

use crate::cli::{AddArgs, ListArgs, OverwriteArgs, RemoveArgs, ShowArgs};
use crate::output;
use crate::utils;

// ============================================================================
// List Command
// ============================================================================

#[derive(Tabled, Serialize)]
struct LayoutRow {
    name: String,
    extensions: usize,
}

pub fn list(args: ListArgs, config: &RuntimeConfig) -> Result<()> {
    let store = utils::layout_store(config);
    let names = store.list().context("Failed to list layouts")?;

    let mut rows = Vec::with_capacity(names.len());
    for name in names {
        match store.load(&name) {
            Ok(layout) => rows.push(LayoutRow {
                name,
                extensions: layout.enabled_extensions.len(),
            }),
            Err(e) => warn!("Skipping unreadable layout '{}': {}", name, e),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        output::info(&format!(
            "No layouts saved in {}",
            store.dir().display()
        ));
        return Ok(());
    }

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
    Ok(())
}

// ============================================================================
// Show Command
// ============================================================================

#[derive(Tabled)]
struct ExtensionRow {
    extension: String,
    installed: &'static str,
    enabled: &'static str,
}

#[derive(Serialize)]
struct ExtensionJson {
    id: String,
    installed: Option<bool>,
    enabled: Option<bool>,
}

#[derive(Serialize)]
struct LayoutJson {
    name: String,
    extensions: Vec<ExtensionJson>,
    has_settings: bool,
}

fn marker(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "✓",
        Some(false) => "✗",
        None => "?",
    }
}

pub fn show(args: ShowArgs, config: &RuntimeConfig) -> Result<()> {
    let store = utils::layout_store(config);
    let layout = store
        .load(&args.name)
        .with_context(|| format!("Failed to load layout '{}'", args.name))?;

    // Markers are unknown when the extension tool is unavailable
    let runner = utils::command_runner(config);
    let state = match utils::inspector(&runner, config).system_state() {
        Ok(state) => Some(state),
        Err(e) => {
            warn!("Could not read extension state: {}", e);
            None
        }
    };

    let extensions: Vec<ExtensionJson> = layout
        .enabled_extensions
        .iter()
        .map(|id| ExtensionJson {
            id: id.to_string(),
            installed: state.as_ref().map(|s| s.is_installed(id.as_str())),
            enabled: state.as_ref().map(|s| s.is_enabled(id.as_str())),
        })
        .collect();

    if args.json {
        let json = LayoutJson {
            name: layout.name.clone(),
            extensions,
            has_settings: layout.has_settings(),
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    output::header(&format!("Layout: {}", layout.name));
    output::kv("Extensions", &extensions.len().to_string());
    output::kv(
        "Shell settings",
        if layout.has_settings() { "saved" } else { "none" },
    );
    println!();

    if extensions.is_empty() {
        output::info("This layout disables every extension");
        return Ok(());
    }

    let rows: Vec<ExtensionRow> = extensions
        .into_iter()
        .map(|ext| ExtensionRow {
            extension: ext.id,
            installed: marker(ext.installed),
            enabled: marker(ext.enabled),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
    Ok(())
}

// ============================================================================
// Add / Overwrite Commands
// ============================================================================

/// Live state plus captured settings, the inputs of a snapshot
fn capture(config: &RuntimeConfig) -> Result<(SystemState, KeyFile)> {
    let runner = utils::command_runner(config);
    let state = utils::inspector(&runner, config)
        .system_state()
        .context("Failed to read the current extension state")?;

    let settings = if config.settings.capture {
        capture_settings(&runner, config)
    } else {
        KeyFile::new()
    };
    Ok((state, settings))
}

fn capture_settings(runner: &SystemCommandRunner, config: &RuntimeConfig) -> KeyFile {
    match ShellSettings::from_config(runner, &config.commands).dump() {
        Ok(settings) => settings,
        Err(e) => {
            output::warning(&format!(
                "Shell settings were not captured: {}",
                e
            ));
            KeyFile::new()
        }
    }
}

pub fn add(args: AddArgs, config: &RuntimeConfig) -> Result<()> {
    let store = utils::layout_store(config);
    // Fail before touching the host when the name is taken
    if store.exists(&args.name)? {
        return Err(name_conflict(&args.name));
    }

    let (state, settings) = capture(config)?;
    let layout = store
        .save_with_settings(&args.name, &state, settings)
        .map_err(|e| match e {
            Error::NameConflict { name } => name_conflict(&name),
            other => anyhow::Error::new(other).context("Failed to save layout"),
        })?;

    output::success(&format!(
        "Saved layout '{}' with {} enabled extensions",
        layout.name,
        layout.enabled_extensions.len()
    ));
    Ok(())
}

fn name_conflict(name: &str) -> anyhow::Error {
    anyhow!(
        "Layout '{}' already exists (use `gnome-layout overwrite {}` to replace it)",
        name,
        name
    )
}

pub fn overwrite(args: OverwriteArgs, config: &RuntimeConfig) -> Result<()> {
    let store = utils::layout_store(config);

    if !args.yes {
        let prompt = if store.exists(&args.name)? {
            format!(
                "Replace layout '{}' with the current extensions?",
                args.name
            )
        } else {
            format!("Layout '{}' does not exist yet. Create it?", args.name)
        };
        if !output::confirm(&prompt)? {
            output::info("Overwrite cancelled");
            return Ok(());
        }
    }

    let (state, settings) = capture(config)?;
    let layout = store
        .overwrite_with_settings(&args.name, &state, settings)
        .context("Failed to save layout")?;

    output::success(&format!(
        "Layout '{}' now holds {} enabled extensions",
        layout.name,
        layout.enabled_extensions.len()
    ));
    Ok(())
}

// ============================================================================
// Remove Command
// ============================================================================

pub fn remove(args: RemoveArgs, config: &RuntimeConfig) -> Result<()> {
    let store = utils::layout_store(config);
    remove_from(&store, &args)
}

fn remove_from(store: &LayoutStore, args: &RemoveArgs) -> Result<()> {
    if !store.exists(&args.name)? {
        output::info(&format!("Layout '{}' does not exist", args.name));
        return Ok(());
    }

    if !args.yes && !output::confirm(&format!("Delete layout '{}'?", args.name))? {
        output::info("Removal cancelled");
        return Ok(());
    }

    store
        .remove(&args.name)
        .with_context(|| format!("Failed to remove layout '{}'", args.name))?;
    output::success(&format!("Removed layout '{}'", args.name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnome_layout_core::{ExtensionId, ExtensionSet};
    use tempfile::TempDir;

    fn state(enabled: &[&str]) -> SystemState {
        let enabled: ExtensionSet = enabled
            .iter()
            .map(|id| ExtensionId::new(*id).unwrap())
            .collect();
        SystemState::from_partition(enabled, ExtensionSet::new())
    }

    #[test]
    fn test_marker() {
        assert_eq!(marker(Some(true)), "✓");
        assert_eq!(marker(Some(false)), "✗");
        assert_eq!(marker(None), "?");
    }

    #[test]
    fn test_remove_with_yes_deletes() {
        let temp = TempDir::new().unwrap();
        let store = LayoutStore::new(temp.path());
        store.save("work", &state(&["a@x"])).unwrap();

        let args = RemoveArgs {
            name: "work".to_string(),
            yes: true,
        };
        remove_from(&store, &args).unwrap();
        assert!(!store.exists("work").unwrap());

        // Removing again is not an error
        remove_from(&store, &args).unwrap();
    }

    #[test]
    fn test_name_conflict_message_suggests_overwrite() {
        let message = name_conflict("work").to_string();
        assert!(message.contains("'work' already exists"));
        assert!(message.contains("overwrite work"));
    }
}
