//! Media device descriptors and output-device matching.

use serde::{Deserialize, Serialize};

/// Kind of a media device as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    AudioInput,
    AudioOutput,
    VideoInput,
}

impl DeviceKind {
    /// Returns the host's string for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::AudioInput => "audioinput",
            DeviceKind::AudioOutput => "audiooutput",
            DeviceKind::VideoInput => "videoinput",
        }
    }
}

/// A media device returned by enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDevice {
    pub kind: DeviceKind,
    /// Human-readable label. Empty until permission has been granted.
    pub label: String,
    /// Opaque host identifier used for binding.
    pub device_id: String,
}

impl OutputDevice {
    /// Creates an audio output device descriptor.
    pub fn audio_output(label: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            kind: DeviceKind::AudioOutput,
            label: label.into(),
            device_id: device_id.into(),
        }
    }

    /// Returns true if this device's label contains `mask`, ignoring case.
    pub fn label_matches(&self, mask: &str) -> bool {
        self.label.to_lowercase().contains(&mask.to_lowercase())
    }
}

/// Selects the output device for a name mask.
///
/// Only `audiooutput` devices are considered. When several labels match,
/// the last one in enumeration order wins.
pub fn select_output_device<'a>(devices: &'a [OutputDevice], mask: &str) -> Option<&'a OutputDevice> {
    devices
        .iter()
        .rev()
        .find(|d| d.kind == DeviceKind::AudioOutput && d.label_matches(mask))
}
