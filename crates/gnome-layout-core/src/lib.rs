//! # gnome-layout-core
//!
//! Core library for gnome-layout providing:
//! - Type definitions for extension ids, layouts, system state and plans
//! - The GVariant string-array codec used by `enabled-extensions`
//! - The key-file codec used by layout files and `dconf dump` output
//! - Shell version parsing
//! - Runtime configuration with hierarchical loading

pub mod config;
pub mod error;
pub mod gvariant;
pub mod keyfile;
pub mod types;
pub mod utils;
pub mod version;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use keyfile::KeyFile;
pub use types::{
    ExtensionId, ExtensionSet, Layout, ReconciliationPlan, RuntimeConfig, SystemState,
};
pub use utils::get_home_dir;
pub use version::ShellVersion;
