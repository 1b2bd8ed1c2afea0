//! Filter Settings
//!
//! The two properties a host can set on a delta filter: the gain as an
//! integer percentage and the silent flag that suppresses the format dump.
//! Settings can be loaded from and saved to JSON and accessed by parameter
//! name.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{DeltaError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Minimum gain in percent
pub const MIN_GAIN_PERCENT: u32 = 0;

/// Maximum gain in percent
pub const MAX_GAIN_PERCENT: u32 = 200;

/// Default gain in percent (delta amplified 1:1)
pub const DEFAULT_GAIN_PERCENT: u32 = 100;

// ============================================================================
// Settings
// ============================================================================

/// Gain and verbosity for a delta filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaSettings {
    /// Delta gain in percent (0-200)
    gain_percent: u32,
    /// Suppress the format dump on format changes
    silent: bool,
}

impl Default for DeltaSettings {
    fn default() -> Self {
        Self {
            gain_percent: DEFAULT_GAIN_PERCENT,
            silent: true,
        }
    }
}

impl DeltaSettings {
    /// Create settings with a gain percentage
    ///
    /// # Errors
    /// * `InvalidParameter` - If `gain_percent` is above 200
    pub fn new(gain_percent: u32, silent: bool) -> Result<Self> {
        let mut settings = Self {
            silent,
            ..Self::default()
        };
        settings.set_gain_percent(gain_percent)?;
        Ok(settings)
    }

    /// Gain in percent
    pub fn gain_percent(&self) -> u32 {
        self.gain_percent
    }

    /// Set the gain in percent
    ///
    /// Values outside 0..=200 are rejected and leave the gain unchanged.
    pub fn set_gain_percent(&mut self, percent: u32) -> Result<()> {
        if !(MIN_GAIN_PERCENT..=MAX_GAIN_PERCENT).contains(&percent) {
            return Err(DeltaError::invalid_param(
                "gain",
                format!(
                    "{} is outside {}..={}",
                    percent, MIN_GAIN_PERCENT, MAX_GAIN_PERCENT
                ),
            ));
        }
        self.gain_percent = percent;
        Ok(())
    }

    /// Gain as the multiplier the kernels use (percent / 100)
    pub fn gain(&self) -> f32 {
        self.gain_percent as f32 / 100.0
    }

    /// Whether the format dump is suppressed
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Enable or suppress the format dump
    pub fn set_silent(&mut self, silent: bool) {
        self.silent = silent;
    }

    /// Load settings from a JSON file
    ///
    /// Missing fields fall back to their defaults. The gain is range checked.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DeltaError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let settings: DeltaSettings = serde_json::from_str(&text)?;
        // re-run validation on deserialized values
        Self::new(settings.gain_percent, settings.silent)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// All parameters as JSON (for hosts and the CLI)
    pub fn get_params(&self) -> Value {
        json!({
            "gain": self.gain_percent,
            "silent": self.silent,
        })
    }

    /// Set a single parameter by name
    pub fn set_param(&mut self, name: &str, value: &Value) -> Result<()> {
        match name {
            "gain" | "gain_percent" => {
                let percent = value.as_u64().ok_or_else(|| {
                    DeltaError::invalid_param(
                        name,
                        format!("expected non-negative integer, got {:?}", value),
                    )
                })?;
                let percent = u32::try_from(percent)
                    .map_err(|_| DeltaError::invalid_param(name, "value out of range"))?;
                self.set_gain_percent(percent)
            }
            "silent" => {
                let silent = value.as_bool().ok_or_else(|| {
                    DeltaError::invalid_param(name, format!("expected bool, got {:?}", value))
                })?;
                self.silent = silent;
                Ok(())
            }
            _ => Err(DeltaError::invalid_param(name, "unknown parameter")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
