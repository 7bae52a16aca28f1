//! Status command

use anyhow::{Context, Result};
use gnome_layout_core::{RuntimeConfig, SystemState};
use gnome_layout_extensions::SessionType;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::warn;

use crate::cli::StatusArgs;
use crate::output;
use crate::utils;

#[derive(Tabled)]
struct StatusRow {
    extension: String,
    state: &'static str,
}

#[derive(Serialize)]
struct StatusJson<'a> {
    shell_version: Option<String>,
    session: SessionType,
    layouts_dir: String,
    #[serde(flatten)]
    state: &'a SystemState,
}

fn rows(state: &SystemState) -> Vec<StatusRow> {
    state
        .installed
        .iter()
        .map(|id| StatusRow {
            extension: id.to_string(),
            state: if state.is_enabled(id.as_str()) {
                "enabled"
            } else {
                "disabled"
            },
        })
        .collect()
}

pub fn run(args: StatusArgs, config: &RuntimeConfig) -> Result<()> {
    let runner = utils::command_runner(config);
    let inspector = utils::inspector(&runner, config);

    let state = inspector
        .system_state()
        .context("Failed to read the current extension state")?;
    let shell_version = match inspector.shell_version() {
        Ok(version) => Some(version.to_string()),
        Err(e) => {
            warn!("Could not detect the shell version: {}", e);
            None
        }
    };
    let session = SessionType::detect();

    if args.json {
        let json = StatusJson {
            shell_version,
            session,
            layouts_dir: config.layouts_path().display().to_string(),
            state: &state,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    output::header("GNOME Shell");
    output::kv("Version", shell_version.as_deref().unwrap_or("unknown"));
    output::kv("Session", &session.to_string());
    output::kv("Layouts", &config.layouts_path().display().to_string());

    output::header(&format!(
        "Extensions ({} installed, {} enabled)",
        state.installed.len(),
        state.enabled.len()
    ));
    if state.installed.is_empty() {
        output::info("No extensions installed");
        return Ok(());
    }

    let mut table = Table::new(rows(&state));
    table.with(Style::sharp());
    println!("{}", table);
    Ok(())
}
