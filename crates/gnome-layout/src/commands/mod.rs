//! CLI command implementations

pub mod apply;
pub mod layout;
pub mod status;
pub mod version;
