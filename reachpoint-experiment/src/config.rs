use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Task parameters. The defaults reproduce the lab setup; a JSON file
/// next to the executable can override any subset on development rigs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Root folder for participant output.
    pub data_dir: PathBuf,
    /// Instruction font.
    pub font_path: PathBuf,
    /// Borderless fullscreen on the primary monitor, or a small window
    /// for development.
    pub fullscreen: bool,
    /// Physical diagonal of the display, in inches.
    pub screen_size_in: f64,
    pub viewing_distance_cm: f64,
    pub display_width_cm: f64,
    /// Reach target diameter.
    pub stimulus_diameter_mm: f64,
    /// Foreperiod bounds between the armed spacebar and target onset.
    pub foreperiod_min_ms: u64,
    pub foreperiod_max_ms: u64,
    /// Upper bound on one input poll.
    pub poll_interval_ms: u64,
    /// Pause around instruction screens.
    pub settle_ms: u64,
    /// Black screen at the end of each trial, before the goggles reopen.
    pub post_trial_ms: u64,
    /// Wrap width for instruction text, in pixels.
    pub text_wrap_px: u32,
    /// Device node for the trigger port; codes are logged only when unset.
    pub trigger_device: Option<PathBuf>,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("_Data"),
            font_path: PathBuf::from("_Resources").join("DejaVuSans.ttf"),
            fullscreen: true,
            screen_size_in: 24.0,
            viewing_distance_cm: 100.0,
            display_width_cm: 100.0,
            stimulus_diameter_mm: 10.0,
            foreperiod_min_ms: 400,
            foreperiod_max_ms: 600,
            poll_interval_ms: 1,
            settle_ms: 500,
            post_trial_ms: 250,
            text_wrap_px: 780,
            trigger_device: None,
        }
    }
}

impl TaskConfig {
    /// Loads overrides from `path` if the file exists, otherwise
    /// returns the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}
