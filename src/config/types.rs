// Configuration type definitions

use serde::Deserialize;

/// How clear timers of overlapping publishes interact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// A new publish cancels the pending clear and schedules a fresh one
    #[default]
    Restart,
    /// Every publish keeps its own timer; each clears unconditionally
    Independent,
}

/// Toast channel configuration section
///
/// The clear delay is fixed, so unknown keys such as a delay override are
/// rejected rather than silently ignored.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ToastConfig {
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub toast: ToastConfig,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
