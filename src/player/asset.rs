//! ToneAsset: one keypad symbol's playable element.

use tracing::debug;

use crate::config::PlayerConfig;
use crate::error::Result;
use crate::generation::{build_tone_asset, SynthContext};
use crate::host::{AudioHost, PlaybackElement};
use crate::types::ToneKey;

/// A keypad symbol's encoded tone, exposed through an element of the host.
///
/// The element is created unsourced; [`ToneAsset::finalize`] assigns the
/// object URL and attaches it, after the device binding when there is one.
#[derive(Debug)]
pub struct ToneAsset<E> {
    key: ToneKey,
    frequencies: (f64, f64),
    url: String,
    element: E,
    device_id: Option<String>,
}

impl<E: PlaybackElement> ToneAsset<E> {
    /// Renders, encodes and wraps the tone of `key` in a new element.
    pub fn build<H>(host: &H, ctx: &SynthContext, config: &PlayerConfig, key: ToneKey) -> Result<Self>
    where
        H: AudioHost<Element = E>,
    {
        let wav = build_tone_asset(ctx, config, key)?;
        let url = host.create_object_url(&wav);
        debug!(key = %key, bytes = wav.len(), url = %url, "built tone asset");

        Ok(Self {
            key,
            frequencies: key.frequencies(),
            url,
            element: host.create_element(),
            device_id: None,
        })
    }

    pub fn key(&self) -> ToneKey {
        self.key
    }

    /// (low group, high group) frequencies in Hz.
    pub fn frequencies(&self) -> (f64, f64) {
        self.frequencies
    }

    /// Object URL of the encoded waveform.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Device this asset was bound to, or None for the default device.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    /// True once the element has a source to play from.
    pub fn is_playable(&self) -> bool {
        self.element.source().is_some()
    }

    /// Routes the element to `device_id`. The source is not assigned here.
    pub(crate) async fn bind(&mut self, device_id: &str) -> std::result::Result<(), crate::host::HostError> {
        self.element.set_sink_id(device_id).await?;
        self.device_id = Some(device_id.to_string());
        Ok(())
    }

    /// Assigns the source and inserts the element into the host.
    pub(crate) fn finalize<H>(&mut self, host: &H)
    where
        H: AudioHost<Element = E>,
    {
        self.element.set_source(&self.url);
        host.attach(&self.element);
    }

    /// Triggers playback without waiting for it.
    pub(crate) fn play(&self) {
        self.element.play();
    }
}
