//! Safety-limit configuration for extraction runs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounds and settle delays applied by the extraction engine.
///
/// Every delay is injectable so tests can run with zeroed waits; every cap
/// is advisory — hitting one marks the run partial instead of failing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionLimits {
    /// Hard cap on processed turns per run.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
    /// Iteration cap for the scroll-to-load phase.
    #[serde(default = "default_max_scroll_iterations")]
    pub max_scroll_iterations: usize,
    /// Global time budget for one extraction run.
    #[serde(default = "default_max_extraction_time_ms")]
    pub max_extraction_time_ms: u64,
    /// Per-turn content cap in characters; longer content is truncated.
    #[serde(default = "default_max_single_turn_size")]
    pub max_single_turn_size: usize,
    /// Consecutive stable re-counts required to end the scroll phase.
    #[serde(default = "default_scroll_stability_threshold")]
    pub scroll_stability_threshold: usize,
    /// Settle delay between a copy-button click and the clipboard read.
    #[serde(default = "default_clipboard_read_delay_ms")]
    pub clipboard_read_delay_ms: u64,
    /// Settle delay after each scroll step.
    #[serde(default = "default_scroll_step_delay_ms")]
    pub scroll_step_delay_ms: u64,
    /// Settle delay before interacting with a turn's action bar.
    #[serde(default = "default_hover_settle_ms")]
    pub hover_settle_ms: u64,
    /// Path this config was loaded from (not serialized).
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_max_turns() -> usize {
    500
}
fn default_max_scroll_iterations() -> usize {
    100
}
fn default_max_extraction_time_ms() -> u64 {
    60_000
}
fn default_max_single_turn_size() -> usize {
    100_000
}
fn default_scroll_stability_threshold() -> usize {
    3
}
fn default_clipboard_read_delay_ms() -> u64 {
    175
}
fn default_scroll_step_delay_ms() -> u64 {
    300
}
fn default_hover_settle_ms() -> u64 {
    50
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            max_scroll_iterations: default_max_scroll_iterations(),
            max_extraction_time_ms: default_max_extraction_time_ms(),
            max_single_turn_size: default_max_single_turn_size(),
            scroll_stability_threshold: default_scroll_stability_threshold(),
            clipboard_read_delay_ms: default_clipboard_read_delay_ms(),
            scroll_step_delay_ms: default_scroll_step_delay_ms(),
            hover_settle_ms: default_hover_settle_ms(),
            config_path: PathBuf::new(),
        }
    }
}

impl ExtractionLimits {
    /// Load limits from `<config_dir>/limits.json`, or return defaults.
    pub fn load(config_dir: &Path) -> Self {
        let config_path = config_dir.join("limits.json");
        let mut limits: ExtractionLimits = std::fs::read_to_string(&config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        limits.config_path = config_path;
        limits
    }

    /// Save limits to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(&self.config_path, json)
    }

    /// All delays zeroed, for deterministic tests.
    pub fn instant() -> Self {
        Self {
            clipboard_read_delay_ms: 0,
            scroll_step_delay_ms: 0,
            hover_settle_ms: 0,
            ..Self::default()
        }
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.max_extraction_time_ms)
    }

    pub fn clipboard_read_delay(&self) -> Duration {
        Duration::from_millis(self.clipboard_read_delay_ms)
    }

    pub fn scroll_step_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_step_delay_ms)
    }

    pub fn hover_settle(&self) -> Duration {
        Duration::from_millis(self.hover_settle_ms)
    }
}
