//! Type definitions for gnome-layout

mod extension_types;
mod layout_types;
mod plan_types;
mod runtime_config;

pub use extension_types::*;
pub use layout_types::*;
pub use plan_types::*;
pub use runtime_config::*;
