//! Common test utilities for gnome-layout-extensions
//!
//! This module provides shared test infrastructure including:
//! - Fixture helpers for ids and extension sets
//! - A recording command runner with canned responses
//! - A stateful fake of the `gnome-extensions` tool
//! - A fake archive source standing in for the registry

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
