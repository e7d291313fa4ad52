//! Core configuration for cuesheet-core.

use serde::{Deserialize, Serialize};

/// Scheduler-wide defaults. The scheduler itself is driven by the host's
/// frame loop; `default_frame_interval` is advisory for hosts that want a
/// suggested tick rate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Duration, in seconds, used by tweens and implicit waits that do not
    /// specify their own.
    pub default_duration: f32,
    /// Suggested interval between host `tick` calls, in seconds.
    pub default_frame_interval: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_duration: 0.5,
            default_frame_interval: 1.0 / 60.0,
        }
    }
}
