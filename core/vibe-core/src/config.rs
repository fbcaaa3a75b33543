//! Engine timing configuration.
//!
//! Defaults reproduce the documented cadence: 5s poll, 60s counter-window
//! reset, 1s typing debounce, 3s test cool-down. A JSON file can override
//! any subset of fields.

use std::path::Path;

use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VibeError};
use crate::types::Millis;

/// Timer intervals for the engine. Classification thresholds are fixed
/// constants in [`crate::classifier`]; only the cadence is configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed interval between snapshot-classify-report ticks.
    pub poll_interval_ms: Millis,
    /// Fixed interval between tab-switch/file-change counter resets.
    pub counter_reset_interval_ms: Millis,
    /// Quiet period after a keystroke before the typing burst decays.
    pub typing_debounce_ms: Millis,
    /// Cool-down after a test verdict before reverting to productive.
    pub test_revert_ms: Millis,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
            counter_reset_interval_ms: 60_000,
            typing_debounce_ms: 1_000,
            test_revert_ms: 3_000,
        }
    }
}

impl EngineConfig {
    /// Loads a config file, surfacing I/O and parse failures. Missing fields
    /// fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| VibeError::Io {
            context: format!("Failed to read config {}", path.display()),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| VibeError::ConfigMalformed {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }
}
