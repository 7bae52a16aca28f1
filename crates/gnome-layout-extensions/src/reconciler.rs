//! Layout reconciliation
//!
//! Drives a [`ReconciliationPlan`] against the host:
//! 1. Installs missing extensions in ascending id order (download, then install)
//! 2. Enables desired extensions, skipping those whose install failed
//! 3. Disables enabled extensions that are not desired
//!
//! A failing extension never aborts the others. There are no retries and no
//! rollback; everything that happened is collected in an [`OutcomeReport`].

use std::fmt;
use std::path::PathBuf;

use gnome_layout_core::{ExtensionId, ExtensionSet, ReconciliationPlan, ShellVersion};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::command::{CommandOutput, CommandRunner};
use crate::error::{CommandError, RegistryError};
use crate::inspector::ExtensionInspector;
use crate::registry::ExtensionSource;

/// Progress callback type: `(current, total, action)`
pub type ProgressCallback<'a> = Option<&'a dyn Fn(usize, usize, &str)>;

/// Installation phase where an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallPhase {
    /// Registry search found nothing
    Search,
    /// No build for the host shell version
    Resolve,
    /// Fetching or storing the archive
    Download,
    /// The install command
    Install,
}

impl fmt::Display for InstallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallPhase::Search => write!(f, "Search"),
            InstallPhase::Resolve => write!(f, "Resolve"),
            InstallPhase::Download => write!(f, "Download"),
            InstallPhase::Install => write!(f, "Install"),
        }
    }
}

impl From<&RegistryError> for InstallPhase {
    fn from(error: &RegistryError) -> Self {
        match error {
            RegistryError::NotFound { .. } => InstallPhase::Search,
            RegistryError::LinkUnavailable { .. } => InstallPhase::Resolve,
            RegistryError::Transport(_)
            | RegistryError::Status { .. }
            | RegistryError::Io(_)
            | RegistryError::InvalidUrl(_) => InstallPhase::Download,
        }
    }
}

/// Information about a failed extension installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedExtension {
    pub id: ExtensionId,
    pub error: String,
    pub phase: InstallPhase,
}

/// Everything that happened while executing a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeReport {
    /// Extensions installed successfully
    pub installed_ok: ExtensionSet,

    /// Extensions whose installation failed, in attempt order
    pub installed_failed: Vec<FailedExtension>,

    /// Extensions enabled (`to_enable` minus failed installs)
    pub enabled: ExtensionSet,

    /// Extensions disabled
    pub disabled: ExtensionSet,

    /// Installed extensions whose archive came from the cache
    pub cached: ExtensionSet,

    /// Enable/disable commands that reported a failure
    pub warnings: Vec<String>,
}

impl OutcomeReport {
    /// Ids of failed installations
    pub fn failed_ids(&self) -> ExtensionSet {
        self.installed_failed.iter().map(|f| f.id.clone()).collect()
    }

    /// No install failed and no command warned
    pub fn is_success(&self) -> bool {
        self.installed_failed.is_empty() && self.warnings.is_empty()
    }

    /// Some installs succeeded and some failed
    pub fn is_partial(&self) -> bool {
        !self.installed_ok.is_empty() && !self.installed_failed.is_empty()
    }

    /// Nothing was done
    pub fn is_empty(&self) -> bool {
        self.installed_ok.is_empty()
            && self.installed_failed.is_empty()
            && self.enabled.is_empty()
            && self.disabled.is_empty()
    }
}

/// Applies plans using an inspector and an archive source
pub struct Reconciler<'a, C, S: ?Sized> {
    inspector: &'a ExtensionInspector<C>,
    source: &'a S,
    shell_version: ShellVersion,
    cache_dir: PathBuf,
}

impl<'a, C, S> Reconciler<'a, C, S>
where
    C: CommandRunner,
    S: ExtensionSource + ?Sized,
{
    /// Create a reconciler; archives are cached in `cache_dir`
    pub fn new(
        inspector: &'a ExtensionInspector<C>,
        source: &'a S,
        shell_version: ShellVersion,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            inspector,
            source,
            shell_version,
            cache_dir: cache_dir.into(),
        }
    }

    /// Read the live state and compute the plan for `desired`
    pub fn plan(&self, desired: &ExtensionSet) -> Result<ReconciliationPlan, CommandError> {
        let state = self.inspector.system_state()?;
        let plan = ReconciliationPlan::compute(desired, &state);
        debug!(
            "Plan: {} to install, {} to enable, {} to disable",
            plan.to_install.len(),
            plan.to_enable.len(),
            plan.to_disable.len()
        );
        Ok(plan)
    }

    /// Execute a plan
    pub fn execute(
        &self,
        plan: &ReconciliationPlan,
        progress_callback: ProgressCallback<'_>,
    ) -> OutcomeReport {
        let mut report = OutcomeReport::default();
        let total = plan.action_count();
        let mut current = 0;

        let mut tick = |action: String| {
            current += 1;
            if let Some(callback) = progress_callback {
                callback(current, total, &action);
            }
        };

        // Step 1: install
        for id in &plan.to_install {
            tick(format!("Installing {}", id));
            match self.install_one(id) {
                Ok(cached) => {
                    info!("Extension {} installed successfully", id);
                    if cached {
                        report.cached.insert(id.clone());
                    }
                    report.installed_ok.insert(id.clone());
                }
                Err(failure) => {
                    warn!(
                        "Extension {} failed during {}: {} (continuing...)",
                        id, failure.phase, failure.error
                    );
                    report.installed_failed.push(failure);
                }
            }
        }

        // Step 2: enable, except what could not be installed
        let failed = report.failed_ids();
        for id in &plan.to_enable {
            if failed.contains(id) {
                tick(format!("Skipping {}", id));
                debug!("Not enabling {}: installation failed", id);
                continue;
            }
            tick(format!("Enabling {}", id));
            if let Some(warning) = command_warning("enable", id, self.inspector.enable(id)) {
                report.warnings.push(warning);
            }
            report.enabled.insert(id.clone());
        }

        // Step 3: disable
        for id in &plan.to_disable {
            tick(format!("Disabling {}", id));
            if let Some(warning) = command_warning("disable", id, self.inspector.disable(id)) {
                report.warnings.push(warning);
            }
            report.disabled.insert(id.clone());
        }

        if report.is_success() {
            info!(
                "Plan applied: {} installed, {} enabled, {} disabled",
                report.installed_ok.len(),
                report.enabled.len(),
                report.disabled.len()
            );
        } else {
            warn!(
                "Plan applied with problems: {} installs failed, {} warnings",
                report.installed_failed.len(),
                report.warnings.len()
            );
        }

        report
    }

    /// Download and install one extension; `Ok(true)` when the archive was cached
    fn install_one(&self, id: &ExtensionId) -> Result<bool, FailedExtension> {
        let outcome = self
            .source
            .download_extension(&self.cache_dir, id, &self.shell_version)
            .map_err(|e| FailedExtension {
                id: id.clone(),
                phase: InstallPhase::from(&e),
                error: e.to_string(),
            })?;

        let install_failure = |error: String| FailedExtension {
            id: id.clone(),
            error,
            phase: InstallPhase::Install,
        };

        let output = self
            .inspector
            .install(outcome.path())
            .map_err(|e| install_failure(e.to_string()))?;
        if !output.success() {
            return Err(install_failure(failure_message(&output)));
        }

        Ok(outcome.is_cached())
    }
}

fn command_warning(
    action: &str,
    id: &ExtensionId,
    result: Result<CommandOutput, CommandError>,
) -> Option<String> {
    let message = match result {
        Ok(output) if output.success() => return None,
        Ok(output) => failure_message(&output),
        Err(e) => e.to_string(),
    };
    warn!("Failed to {} {}: {} (continuing...)", action, id, message);
    Some(format!("Failed to {action} {id}: {message}"))
}

fn failure_message(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        format!("exited with status {}", output.status)
    } else {
        stderr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ExtensionId {
        ExtensionId::new(s).unwrap()
    }

    #[test]
    fn test_phase_from_registry_error() {
        assert_eq!(
            InstallPhase::from(&RegistryError::not_found("a@x")),
            InstallPhase::Search
        );
        assert_eq!(
            InstallPhase::from(&RegistryError::link_unavailable("a@x", "45")),
            InstallPhase::Resolve
        );
        assert_eq!(
            InstallPhase::from(&RegistryError::Status {
                status: 500,
                url: "http://x".to_string()
            }),
            InstallPhase::Download
        );
    }

    #[test]
    fn test_report_helpers() {
        let mut report = OutcomeReport::default();
        assert!(report.is_success());
        assert!(report.is_empty());

        report.installed_ok.insert(id("a@x"));
        report.installed_failed.push(FailedExtension {
            id: id("b@x"),
            error: "gone".to_string(),
            phase: InstallPhase::Search,
        });
        assert!(report.is_partial());
        assert!(!report.is_success());
        assert_eq!(
            report.failed_ids(),
            [id("b@x")].into_iter().collect::<ExtensionSet>()
        );
    }

    #[test]
    fn test_warning_only_report_is_not_success() {
        let report = OutcomeReport {
            warnings: vec!["Failed to enable a@x: boom".to_string()],
            ..OutcomeReport::default()
        };
        assert!(!report.is_success());
        assert!(!report.is_partial());
    }

    #[test]
    fn test_failure_message_falls_back_to_status() {
        let output = CommandOutput {
            status: 1,
            ..CommandOutput::default()
        };
        assert_eq!(failure_message(&output), "exited with status 1");
    }
}
