//! Host audio environment seam.
//!
//! The player does not talk to audio hardware itself. A host supplies
//! permission handling, device enumeration, object URLs for encoded assets
//! and playable elements that can be routed to an output device.

use std::fmt;

use async_trait::async_trait;

use crate::audio::WavAsset;
use crate::types::OutputDevice;

/// Failure reported by a host operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for HostError {}

/// A playable element, one per tone.
#[async_trait]
pub trait PlaybackElement: Send {
    /// Routes this element's output to the device with `device_id`.
    async fn set_sink_id(&mut self, device_id: &str) -> Result<(), HostError>;

    /// Assigns the object URL the element plays from.
    fn set_source(&mut self, url: &str);

    /// Returns the assigned object URL, if any.
    fn source(&self) -> Option<&str>;

    /// Starts playback. Returns immediately; playback failures are not reported.
    fn play(&self);
}

/// The host audio environment.
#[async_trait]
pub trait AudioHost: Send + Sync {
    type Element: PlaybackElement;

    /// Whether elements can be routed to a chosen output device.
    fn supports_sink_selection(&self) -> bool;

    /// Sample rate of the host's audio context in Hz.
    fn sample_rate(&self) -> u32;

    /// Asks the user for audio device access.
    async fn request_permission(&self) -> Result<(), HostError>;

    /// Lists media devices in host order.
    async fn enumerate_devices(&self) -> Result<Vec<OutputDevice>, HostError>;

    /// Exposes an encoded asset under a URL elements can play from.
    fn create_object_url(&self, asset: &WavAsset) -> String;

    /// Creates a new element with no source.
    fn create_element(&self) -> Self::Element;

    /// Inserts a sourced element into the host environment.
    fn attach(&self, element: &Self::Element);
}
