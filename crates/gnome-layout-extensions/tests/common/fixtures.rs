//! Fixture helpers

use gnome_layout_core::{ExtensionId, ExtensionSet, ShellVersion, SystemState};

pub const EXT_A: &str = "appindicatorsupport@rgcjonas.gmail.com";
pub const EXT_B: &str = "blur-my-shell@aunetx";
pub const EXT_C: &str = "caffeine@patapon.info";
pub const EXT_D: &str = "dash-to-dock@micxgx.gmail.com";

pub fn id(s: &str) -> ExtensionId {
    ExtensionId::new(s).unwrap()
}

pub fn set(ids: &[&str]) -> ExtensionSet {
    ids.iter().map(|s| id(s)).collect()
}

pub fn state(enabled: &[&str], disabled: &[&str]) -> SystemState {
    SystemState::from_partition(set(enabled), set(disabled))
}

pub fn shell_45() -> ShellVersion {
    ShellVersion::parse("GNOME Shell 45.2").unwrap()
}
