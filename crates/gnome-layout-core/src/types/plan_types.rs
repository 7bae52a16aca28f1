//! Reconciliation plan computed from a desired set and the live system state

use serde::{Deserialize, Serialize};

use super::extension_types::{ExtensionSet, SystemState};

/// Actions needed to bring the system to a desired extension set
///
/// The three sets are derived independently from the inputs:
/// - `to_install = desired − installed`
/// - `to_enable = desired − enabled`
/// - `to_disable = enabled − desired`
///
/// An extension that is desired but missing appears in both `to_install` and
/// `to_enable`; it is enabled once its installation succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationPlan {
    /// Desired extensions that are not installed
    pub to_install: ExtensionSet,

    /// Desired extensions that are not currently enabled
    pub to_enable: ExtensionSet,

    /// Enabled extensions that are not desired
    pub to_disable: ExtensionSet,
}

impl ReconciliationPlan {
    /// Compute the plan. Pure; runs in O(|desired| + |installed|).
    pub fn compute(desired: &ExtensionSet, state: &SystemState) -> Self {
        Self {
            to_install: desired.difference(&state.installed).cloned().collect(),
            to_enable: desired.difference(&state.enabled).cloned().collect(),
            to_disable: state.enabled.difference(desired).cloned().collect(),
        }
    }

    /// True when applying the plan would change nothing
    pub fn is_empty(&self) -> bool {
        self.to_install.is_empty() && self.to_enable.is_empty() && self.to_disable.is_empty()
    }

    /// Total number of actions, counting install and enable separately
    pub fn action_count(&self) -> usize {
        self.to_install.len() + self.to_enable.len() + self.to_disable.len()
    }
}
