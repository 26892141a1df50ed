//! Configuration value types

use serde::{Deserialize, Serialize};

/// What a series constructor does when both per-sample `timestamps` and
/// `starting_time` + `rate` are supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingConflict {
    /// Use the timestamps and log a warning
    #[default]
    PreferTimestamps,
    /// Fail construction
    Reject,
}

/// Policy knobs for container construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionConfig {
    pub timing_conflict: TimingConflict,
    /// Require the last segment of every link path to equal the linked
    /// container's name.
    pub verify_link_paths: bool,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            timing_conflict: TimingConflict::PreferTimestamps,
            verify_link_paths: true,
        }
    }
}
