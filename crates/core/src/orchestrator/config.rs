//! Orchestrator configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// How often the synthetic progress advances (milliseconds).
    #[serde(default = "default_tick")]
    pub progress_tick_ms: u64,

    /// Synthetic progress never passes this percentage before the run ends.
    #[serde(default = "default_ceiling")]
    pub progress_ceiling: f32,

    /// Upper bound of the random increment applied on each tick.
    #[serde(default = "default_max_step")]
    pub progress_max_step: f32,

    /// Runs at least this long (milliseconds) get a pause at 100% before
    /// the session moves to finished.
    #[serde(default = "default_pacing_threshold")]
    pub pacing_threshold_ms: u64,

    /// Length of that pause (milliseconds).
    #[serde(default = "default_pacing_delay")]
    pub pacing_delay_ms: u64,
}

fn default_tick() -> u64 {
    200
}

fn default_ceiling() -> f32 {
    90.0
}

fn default_max_step() -> f32 {
    10.0
}

fn default_pacing_threshold() -> u64 {
    3000
}

fn default_pacing_delay() -> u64 {
    500
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            progress_tick_ms: default_tick(),
            progress_ceiling: default_ceiling(),
            progress_max_step: default_max_step(),
            pacing_threshold_ms: default_pacing_threshold(),
            pacing_delay_ms: default_pacing_delay(),
        }
    }
}

impl OrchestratorConfig {
    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    /// Delay to insert before finishing a run that took `elapsed`.
    ///
    /// Short runs finish at once; longer ones hold the 100% state briefly.
    /// Purely cosmetic.
    pub fn finish_delay(&self, elapsed: Duration) -> Option<Duration> {
        if elapsed < Duration::from_millis(self.pacing_threshold_ms) {
            None
        } else {
            Some(Duration::from_millis(self.pacing_delay_ms))
        }
    }
}
