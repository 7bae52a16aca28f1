//! Extension management for gnome-layout
//!
//! This crate provides:
//! - Host command execution behind the [`CommandRunner`] capability
//! - Live extension state and enable/disable/install via `gnome-extensions`
//! - Archive resolution and download from extensions.gnome.org
//! - Layout file storage
//! - Plan execution with per-extension failure reporting
//! - Shell settings capture/restore and session detection

pub mod command;
pub mod error;
pub mod inspector;
pub mod reconciler;
pub mod registry;
pub mod session;
pub mod settings;
pub mod store;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use error::{CommandError, HostError, RegistryError};
pub use inspector::ExtensionInspector;
pub use reconciler::{
    FailedExtension, InstallPhase, OutcomeReport, ProgressCallback, Reconciler,
};
pub use registry::{DownloadOutcome, ExtensionRegistryClient, ExtensionSource};
pub use session::{restart_shell, SessionType};
pub use settings::ShellSettings;
pub use store::LayoutStore;
