//! Check cycle and probing configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the periodic check cycle and the probe workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between check cycles.
    #[serde(default = "default_cycle_interval")]
    pub cycle_interval_seconds: u64,
    /// Number of concurrent probe workers per cycle.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Per-probe request timeout in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cycle_interval_seconds: default_cycle_interval(),
            worker_count: default_worker_count(),
            probe_timeout_seconds: default_probe_timeout(),
        }
    }
}

fn default_cycle_interval() -> u64 {
    60
}

fn default_worker_count() -> usize {
    5
}

fn default_probe_timeout() -> u64 {
    10
}
