//! Apply command
//!
//! Reconciles the host with a saved layout: shows the plan, asks for
//! confirmation, runs it with a progress bar and reports per-extension
//! results. Saved shell settings are restored afterwards.

use anyhow::{Context, Result};
use console::style;
use gnome_layout_core::{ExtensionSet, Layout, ReconciliationPlan, RuntimeConfig};
use gnome_layout_extensions::{
    restart_shell, ExtensionRegistryClient, OutcomeReport, Reconciler, SessionType,
    ShellSettings, SystemCommandRunner,
};

use crate::cli::ApplyArgs;
use crate::output;
use crate::utils;

/// Longest error text shown per failed extension
const MAX_ERROR_LEN: usize = 300;

pub fn run(args: ApplyArgs, config: &RuntimeConfig) -> Result<()> {
    let store = utils::layout_store(config);
    let layout = store
        .load(&args.name)
        .with_context(|| format!("Failed to load layout '{}'", args.name))?;

    output::header(&format!("Applying layout: {}", layout.name));

    let cache_dir = config.extension_cache_path();
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create {}", cache_dir.display()))?;

    let runner = utils::command_runner(config);
    let inspector = utils::inspector(&runner, config);
    let client = ExtensionRegistryClient::from_config(&config.network)
        .context("Failed to configure the extension registry client")?;

    let spinner = output::spinner("Reading extension state...");
    let shell_version = inspector.shell_version();
    spinner.finish_and_clear();
    let shell_version = shell_version.context("Failed to detect the GNOME Shell version")?;

    let reconciler = Reconciler::new(&inspector, &client, shell_version, cache_dir);
    let plan = reconciler
        .plan(&layout.enabled_extensions)
        .context("Failed to read the current extension state")?;

    let restore_settings = config.settings.restore && !args.no_settings && layout.has_settings();

    print_plan(&plan);
    if restore_settings {
        output::info("Saved shell settings will be restored");
    }

    if plan.is_empty() && !restore_settings {
        output::success(&format!(
            "Extensions already match layout '{}'",
            layout.name
        ));
        return Ok(());
    }

    if args.dry_run {
        output::info("Dry run: no changes made");
        return Ok(());
    }

    if !args.yes && !output::confirm("Apply these changes?")? {
        output::info("Apply cancelled");
        return Ok(());
    }

    let report = if plan.is_empty() {
        OutcomeReport::default()
    } else {
        let pb = output::progress_bar(plan.action_count() as u64, "Applying layout");
        reconciler.execute(
            &plan,
            Some(&|current, total, action| {
                pb.set_position(current as u64);
                pb.set_message(action.to_string());
                if current == total {
                    pb.finish_with_message("Layout applied");
                }
            }),
        )
    };

    print_report(&layout, &report);

    let settings_restored = restore_settings && restore(&runner, config, &layout);

    if !report.installed_ok.is_empty() || settings_restored {
        session_hint(&runner, config, args.yes)?;
    }

    Ok(())
}

fn print_ids(title: &str, ids: &ExtensionSet) {
    if ids.is_empty() {
        return;
    }
    output::header(title);
    for id in ids {
        println!("  {} {}", style("•").dim(), id);
    }
}

fn print_plan(plan: &ReconciliationPlan) {
    print_ids("Extensions to Install", &plan.to_install);
    print_ids("Extensions to Enable", &plan.to_enable);
    print_ids("Extensions to Disable", &plan.to_disable);
    println!();
}

fn truncate(message: &str) -> String {
    if message.chars().count() > MAX_ERROR_LEN {
        let head: String = message.chars().take(MAX_ERROR_LEN - 3).collect();
        format!("{}...", head)
    } else {
        message.to_string()
    }
}

fn print_report(layout: &Layout, report: &OutcomeReport) {
    print_ids("Installed", &report.installed_ok);

    if !report.installed_failed.is_empty() {
        output::header("Failed to Install");
        for failed in &report.installed_failed {
            println!("  {} {}", style("✗").red(), style(&failed.id).bold());
            println!("    Phase:  {}", failed.phase);
            println!("    Error:  {}", truncate(&failed.error));
        }
    }

    print_ids("Enabled", &report.enabled);
    print_ids("Disabled", &report.disabled);

    if !report.cached.is_empty() {
        println!();
        output::info(&format!(
            "{} archive(s) reused from the download cache",
            report.cached.len()
        ));
    }
    for warning in &report.warnings {
        output::warning(warning);
    }

    println!();
    if report.is_success() {
        output::success(&format!("Layout '{}' applied", layout.name));
    } else if !report.installed_failed.is_empty() {
        output::error(&format!(
            "Layout '{}' applied with {} failed installation(s)",
            layout.name,
            report.installed_failed.len()
        ));
        output::info("Tip: Run with -vv for detailed logs");
    } else {
        output::warning(&format!(
            "Layout '{}' applied with {} warning(s)",
            layout.name,
            report.warnings.len()
        ));
    }
}

/// Load the saved settings; true when something was written
fn restore(runner: &SystemCommandRunner, config: &RuntimeConfig, layout: &Layout) -> bool {
    match ShellSettings::from_config(runner, &config.commands).load(&layout.settings) {
        Ok(()) => {
            output::success("Shell settings restored");
            true
        }
        Err(e) => {
            output::warning(&format!("Shell settings were not restored: {}", e));
            false
        }
    }
}

fn session_hint(runner: &SystemCommandRunner, config: &RuntimeConfig, yes: bool) -> Result<()> {
    let session = SessionType::detect();
    if session.can_restart_shell() && !yes && output::confirm("Restart GNOME Shell now?")? {
        restart_shell(runner, &config.commands.restart_shell)
            .context("Failed to restart GNOME Shell")?;
        output::success("GNOME Shell restarted");
        return Ok(());
    }
    output::info(reload_hint(session));
    Ok(())
}

/// Manual step that loads newly installed extensions
fn reload_hint(session: SessionType) -> &'static str {
    if session.can_restart_shell() {
        return "Restart GNOME Shell (Alt+F2, then r) to load newly installed extensions";
    }
    match session {
        SessionType::Wayland => "Log out and back in to load newly installed extensions",
        _ => "Restart your session to load newly installed extensions",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_hint_per_session() {
        assert!(reload_hint(SessionType::X11).contains("Alt+F2"));
        assert!(reload_hint(SessionType::Wayland).starts_with("Log out"));
        assert!(reload_hint(SessionType::Unknown).contains("your session"));
    }

    #[test]
    fn test_truncate_short_message_unchanged() {
        assert_eq!(truncate("no build"), "no build");
    }

    #[test]
    fn test_truncate_long_message() {
        let long = "é".repeat(MAX_ERROR_LEN + 10);
        let short = truncate(&long);
        assert_eq!(short.chars().count(), MAX_ERROR_LEN);
        assert!(short.ends_with("..."));
    }
}
