//! Sequential device binding.
//!
//! Tone elements are routed to the selected output device one at a time:
//! each bind is awaited before the next one is issued. Pending symbols sit
//! on a [`BindQueue`] that hands out the most recently pushed symbol first.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::{DtmfError, Result};
use crate::host::AudioHost;
use crate::types::ToneKey;

use super::asset::ToneAsset;

/// Work stack of symbols waiting for their device binding.
#[derive(Debug, Default)]
pub struct BindQueue {
    pending: Vec<ToneKey>,
}

impl BindQueue {
    /// Creates a new empty bind queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a symbol to the queue.
    pub fn push(&mut self, key: ToneKey) {
        self.pending.push(key);
    }

    /// Removes and returns the next symbol to bind, last pushed first.
    pub fn pop_next(&mut self) -> Option<ToneKey> {
        self.pending.pop()
    }

    /// Returns the number of symbols waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Drains `queue`, binding each asset to `device_id` and then finalizing it.
///
/// Stops at the first failed or timed out bind; assets bound before it keep
/// their binding. `on_progress` receives (bound, total) after every success.
pub(crate) async fn bind_all<H, F>(
    host: &H,
    assets: &mut BTreeMap<ToneKey, ToneAsset<H::Element>>,
    mut queue: BindQueue,
    device_id: &str,
    timeout: Option<Duration>,
    mut on_progress: F,
) -> Result<()>
where
    H: AudioHost,
    F: FnMut(usize, usize),
{
    let total = queue.len();
    let mut bound = 0;

    while let Some(key) = queue.pop_next() {
        let Some(asset) = assets.get_mut(&key) else {
            continue;
        };

        debug!(key = %key, device = device_id, "binding tone");

        let outcome = match timeout {
            Some(limit) => match tokio::time::timeout(limit, asset.bind(device_id)).await {
                Ok(result) => result,
                Err(_) => {
                    let err = DtmfError::bind_timeout(key.symbol(), limit.as_millis() as u64);
                    error!(key = %key, "{}", err.message);
                    return Err(err);
                }
            },
            None => asset.bind(device_id).await,
        };

        if let Err(cause) = outcome {
            let err = DtmfError::bind_failed(key.symbol(), &cause);
            error!(key = %key, "{}", err.message);
            return Err(err);
        }

        asset.finalize(host);
        bound += 1;
        on_progress(bound, total);
    }

    info!(count = bound, device = device_id, "tones bound to output device");
    Ok(())
}
