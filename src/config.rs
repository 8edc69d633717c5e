//! Player configuration module.
//!
//! Contains the synthesis and device-selection parameters for a
//! [`DtmfPlayer`](crate::player::DtmfPlayer). Values are fixed at
//! construction time; every key is optional and falls back to its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::WavLayout;
use crate::error::{DtmfError, Result};

/// Default output device name mask.
pub const DEFAULT_DEVICE_NAME_MASK: &str = "cable";

/// Default bind timeout in milliseconds.
pub const DEFAULT_BIND_TIMEOUT_MS: u64 = 10_000;

/// Runtime configuration for a player instance.
///
/// Serialized with camelCase keys (`devUseDefault`, `toneDuration2`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerConfig {
    /// Fall back to the default output device when no label matches the mask,
    /// and skip the binding phase even when one does.
    pub dev_use_default: bool,

    /// Case-insensitive substring matched against output device labels.
    pub dev_name_mask: String,

    /// Duration of the sustained low-group pulse in seconds.
    pub tone_duration: f64,

    /// Duration of the centered high-group pulse in seconds.
    pub tone_duration2: f64,

    /// Gain of the high-group pulse (0-1).
    pub tone_gain: f64,

    /// Gain of the low-group pulse (0-1).
    pub tone_gain2: f64,

    /// Silence before and after each tone in seconds.
    pub silence_part_duration: f64,

    /// Linear fade-in duration in seconds.
    pub fade_in_duration: f64,

    /// Linear fade-out duration in seconds.
    pub fade_out_duration: f64,

    /// Opaque instance identifier exposed to callers.
    pub id: u64,

    /// Upper bound for a single device binding, in milliseconds. 0 disables it.
    pub bind_timeout_ms: u64,

    /// Header layout of the encoded tone assets.
    pub wav_layout: WavLayout,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            dev_use_default: false,
            dev_name_mask: DEFAULT_DEVICE_NAME_MASK.to_string(),
            tone_duration: 0.2,
            tone_duration2: 0.1,
            tone_gain: 1.0,
            tone_gain2: 0.9,
            silence_part_duration: 0.1,
            fade_in_duration: 0.005,
            fade_out_duration: 0.005,
            id: 1,
            bind_timeout_ms: DEFAULT_BIND_TIMEOUT_MS,
            wav_layout: WavLayout::default(),
        }
    }
}

impl PlayerConfig {
    /// Creates a new PlayerConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DtmfError::invalid_config(e.to_string()))
    }

    /// Loads a configuration file in JSON format.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DtmfError::io(format!("Failed to read {}", path.display()), e))?;
        Self::from_json_str(&text)
    }

    /// Applies overrides from environment variables on top of `self`.
    ///
    /// Reads the following environment variables:
    /// - `DTMF_DEV_USE_DEFAULT` - true/false/1/0
    /// - `DTMF_DEV_NAME_MASK` - output device label mask
    /// - `DTMF_TONE_DURATION`, `DTMF_TONE_DURATION2` - seconds
    /// - `DTMF_TONE_GAIN`, `DTMF_TONE_GAIN2` - 0-1
    /// - `DTMF_SILENCE_PART_DURATION` - seconds
    /// - `DTMF_FADE_IN_DURATION`, `DTMF_FADE_OUT_DURATION` - seconds
    /// - `DTMF_ID` - instance identifier
    /// - `DTMF_BIND_TIMEOUT_MS` - milliseconds
    ///
    /// Unset or unparsable variables leave the current value untouched.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var("DTMF_DEV_USE_DEFAULT") {
            match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.dev_use_default = true,
                "0" | "false" | "no" => self.dev_use_default = false,
                _ => {}
            }
        }

        if let Ok(mask) = std::env::var("DTMF_DEV_NAME_MASK") {
            if !mask.is_empty() {
                self.dev_name_mask = mask;
            }
        }

        env_f64("DTMF_TONE_DURATION", &mut self.tone_duration);
        env_f64("DTMF_TONE_DURATION2", &mut self.tone_duration2);
        env_f64("DTMF_TONE_GAIN", &mut self.tone_gain);
        env_f64("DTMF_TONE_GAIN2", &mut self.tone_gain2);
        env_f64("DTMF_SILENCE_PART_DURATION", &mut self.silence_part_duration);
        env_f64("DTMF_FADE_IN_DURATION", &mut self.fade_in_duration);
        env_f64("DTMF_FADE_OUT_DURATION", &mut self.fade_out_duration);

        if let Ok(id) = std::env::var("DTMF_ID") {
            if let Ok(id) = id.parse::<u64>() {
                self.id = id;
            }
        }

        if let Ok(timeout) = std::env::var("DTMF_BIND_TIMEOUT_MS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                self.bind_timeout_ms = timeout;
            }
        }

        self
    }

    /// Creates a configuration from defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Returns the silence padding placed on each side of the high-group pulse.
    pub fn high_pulse_offset(&self) -> f64 {
        (self.tone_duration - self.tone_duration2) / 2.0
    }

    /// Returns the per-bind timeout, or None when disabled.
    pub fn bind_timeout(&self) -> Option<std::time::Duration> {
        if self.bind_timeout_ms == 0 {
            None
        } else {
            Some(std::time::Duration::from_millis(self.bind_timeout_ms))
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        let durations = [
            ("toneDuration", self.tone_duration),
            ("toneDuration2", self.tone_duration2),
            ("silencePartDuration", self.silence_part_duration),
            ("fadeInDuration", self.fade_in_duration),
            ("fadeOutDuration", self.fade_out_duration),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Some(format!("{} must be >= 0, got {}", name, value));
            }
        }

        if self.tone_duration <= 0.0 {
            return Some("toneDuration must be > 0".to_string());
        }

        // tone() reads a zero duration as unset
        if self.tone_duration2 <= 0.0 {
            return Some("toneDuration2 must be > 0".to_string());
        }

        if self.tone_duration2 > self.tone_duration {
            return Some(format!(
                "toneDuration2 ({}) must not exceed toneDuration ({})",
                self.tone_duration2, self.tone_duration
            ));
        }

        for (name, gain) in [("toneGain", self.tone_gain), ("toneGain2", self.tone_gain2)] {
            if !(0.0..=1.0).contains(&gain) {
                return Some(format!("{} must be between 0 and 1, got {}", name, gain));
            }
        }

        None
    }
}

fn env_f64(name: &str, target: &mut f64) {
    if let Ok(value) = std::env::var(name) {
        if let Ok(value) = value.parse::<f64>() {
            if value.is_finite() {
                *target = value;
            }
        }
    }
}

/// Returns the platform-specific default configuration file path.
///
/// - macOS: ~/Library/Application Support/dtmf-player/config.json
/// - Linux: ~/.config/dtmf-player/config.json
/// - Windows: C:\Users\<user>\AppData\Roaming\dtmf-player\config\config.json
pub fn default_config_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "dtmf-player") {
        proj_dirs.config_dir().join("config.json")
    } else {
        PathBuf::from("./dtmf-player.json")
    }
}
