//! Device binding orchestrator.
//!
//! A [`DtmfPlayer`] walks through
//! `Uninitialized → Enumerating → Matching → Binding → Ready` (or `Failed`)
//! exactly once:
//!
//! 1. request audio permission and enumerate devices,
//! 2. select the last output device whose label contains the name mask,
//! 3. build one [`ToneAsset`] per keypad symbol,
//! 4. bind every asset to the selected device, one at a time.
//!
//! Without an explicit device (no match with fallback enabled, or
//! `devUseDefault` set) step 4 is skipped and each asset is sourced as soon
//! as it is built.

mod asset;
mod binding;

use std::collections::BTreeMap;
use std::sync::{Mutex, OnceLock};

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::config::PlayerConfig;
use crate::error::{DtmfError, Result};
use crate::generation::SynthContext;
use crate::host::AudioHost;
use crate::types::{select_output_device, OutputDevice, ToneKey};

pub use asset::ToneAsset;
pub use binding::BindQueue;

/// Lifecycle state of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum InitState {
    Uninitialized,
    Enumerating,
    Matching,
    /// `done` of `total` assets bound.
    Binding { done: usize, total: usize },
    Ready,
    Failed,
}

impl InitState {
    /// Returns true if the lifecycle has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InitState::Ready | InitState::Failed)
    }
}

/// Outcome of a successful initialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ready {
    /// The bound output device, or None for the host default.
    pub device: Option<OutputDevice>,
    /// Instance identifier from the configuration.
    pub id: u64,
}

/// Plays DTMF tones through a host output device.
pub struct DtmfPlayer<H: AudioHost> {
    host: H,
    config: PlayerConfig,
    context: SynthContext,
    state: Mutex<InitState>,
    device: OnceLock<OutputDevice>,
    assets: OnceLock<BTreeMap<ToneKey, ToneAsset<H::Element>>>,
    outcome: OnceCell<Result<Ready>>,
}

impl<H: AudioHost> DtmfPlayer<H> {
    /// Creates a player for `host`.
    ///
    /// Fails if the configuration is invalid, if the host reports a zero
    /// sample rate, or if the host cannot route elements to a device.
    pub fn new(host: H, config: PlayerConfig) -> Result<Self> {
        if let Some(reason) = config.validate() {
            return Err(DtmfError::invalid_config(reason));
        }

        if !host.supports_sink_selection() {
            error!("setSinkId not supported");
            return Err(DtmfError::sink_selection_unsupported());
        }

        let context = SynthContext::new(host.sample_rate())?;
        debug!(
            use_default = config.dev_use_default,
            sample_rate = context.sample_rate(),
            "player created"
        );

        Ok(Self {
            host,
            config,
            context,
            state: Mutex::new(InitState::Uninitialized),
            device: OnceLock::new(),
            assets: OnceLock::new(),
            outcome: OnceCell::new(),
        })
    }

    /// Runs the initialization lifecycle once.
    ///
    /// Every call, including concurrent ones, resolves to the outcome of the
    /// single lifecycle; later calls never enumerate or bind again. If the
    /// first `init()` future is dropped mid-way, the next call resolves to
    /// [`ErrorCode::InitAbandoned`](crate::ErrorCode::InitAbandoned) instead
    /// of starting over.
    pub async fn init(&self) -> Result<Ready> {
        self.outcome
            .get_or_init(|| async {
                if !self.begin() {
                    return self.fail(DtmfError::init_abandoned());
                }
                self.run_lifecycle().await
            })
            .await
            .clone()
    }

    /// Plays the tone for a keypad symbol such as `"5"` or `"#"`.
    ///
    /// Returns false, logging an error, for unknown symbols or tones that
    /// are not playable yet.
    pub fn play(&self, key: &str) -> bool {
        match key.parse::<ToneKey>() {
            Ok(key) => self.play_key(key),
            Err(_) => {
                error!(key, "invalid toneKey");
                false
            }
        }
    }

    /// Plays the tone for `key`. See [`DtmfPlayer::play`].
    pub fn play_key(&self, key: ToneKey) -> bool {
        match self.asset(key) {
            Some(asset) if asset.is_playable() => {
                asset.play();
                debug!(key = %key, "play");
                true
            }
            _ => {
                error!(key = %key, "toneKey element not found");
                false
            }
        }
    }

    /// The selected output device, once matching has run.
    pub fn device(&self) -> Option<&OutputDevice> {
        self.device.get()
    }

    /// Instance identifier from the configuration.
    pub fn id(&self) -> u64 {
        self.config.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> InitState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The asset of `key`, once assets have been built.
    pub fn asset(&self, key: ToneKey) -> Option<&ToneAsset<H::Element>> {
        self.assets.get().and_then(|assets| assets.get(&key))
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn context(&self) -> &SynthContext {
        &self.context
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn set_state(&self, state: InitState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Moves out of `Uninitialized`. Returns false if a lifecycle already started.
    fn begin(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state != InitState::Uninitialized {
            return false;
        }
        *state = InitState::Enumerating;
        true
    }

    fn fail(&self, err: DtmfError) -> Result<Ready> {
        error!(code = %err.code, "{}", err.message);
        self.set_state(InitState::Failed);
        Err(err)
    }

    async fn run_lifecycle(&self) -> Result<Ready> {
        info!(id = self.config.id, "init...");

        if let Err(cause) = self.host.request_permission().await {
            return self.fail(DtmfError::permission_denied(cause));
        }

        let devices = match self.host.enumerate_devices().await {
            Ok(devices) => devices,
            Err(cause) => return self.fail(DtmfError::enumeration_failed(cause)),
        };
        debug!(count = devices.len(), "devices enumerated");

        self.set_state(InitState::Matching);
        let mask = &self.config.dev_name_mask;
        let device = select_output_device(&devices, mask).cloned();

        let bind_target = match &device {
            None if !self.config.dev_use_default => {
                return self.fail(DtmfError::device_not_found(mask));
            }
            None => {
                info!(mask = %mask, "no output device matched, using default device");
                None
            }
            Some(device) => {
                info!(label = %device.label, device_id = %device.device_id, "select device");
                let _ = self.device.set(device.clone());
                (!self.config.dev_use_default).then(|| device.device_id.clone())
            }
        };

        let mut assets = BTreeMap::new();
        let mut queue = BindQueue::new();
        for key in ToneKey::ALL {
            let mut asset = match ToneAsset::build(&self.host, &self.context, &self.config, key) {
                Ok(asset) => asset,
                Err(err) => return self.fail(err),
            };

            if bind_target.is_some() {
                queue.push(key);
            } else {
                asset.finalize(&self.host);
            }
            assets.insert(key, asset);
        }

        let bound = match &bind_target {
            Some(device_id) => {
                self.set_state(InitState::Binding {
                    done: 0,
                    total: queue.len(),
                });
                binding::bind_all(
                    &self.host,
                    &mut assets,
                    queue,
                    device_id,
                    self.config.bind_timeout(),
                    |done, total| self.set_state(InitState::Binding { done, total }),
                )
                .await
            }
            None => Ok(()),
        };

        // assets stay reachable after a failed bind; the ones already bound keep playing
        let _ = self.assets.set(assets);

        match bound {
            Ok(()) => {
                self.set_state(InitState::Ready);
                info!(id = self.config.id, "ready");
                Ok(Ready { device, id: self.config.id })
            }
            Err(err) => self.fail(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::audio::{read_header, WavAsset};
    use crate::error::ErrorCode;
    use crate::host::{HostError, PlaybackElement};
    use crate::types::DeviceKind;

    #[derive(Debug, Default)]
    struct HostLog {
        permission_calls: usize,
        enumerate_calls: usize,
        /// (element index, device id) per completed bind
        binds: Vec<(usize, String)>,
        /// element index per play trigger
        plays: Vec<usize>,
        attached: Vec<usize>,
        max_in_flight: usize,
        asset_sizes: Vec<usize>,
    }

    #[derive(Clone, Copy, PartialEq)]
    enum BindBehavior {
        Succeed,
        FailAt(usize),
        HangAt(usize),
    }

    struct MockHost {
        devices: Vec<OutputDevice>,
        deny_permission: bool,
        sink_supported: bool,
        bind: BindBehavior,
        log: Arc<Mutex<HostLog>>,
        created: AtomicUsize,
        in_flight: Arc<AtomicUsize>,
    }

    impl MockHost {
        fn new(labels: &[&str]) -> Self {
            Self {
                devices: labels
                    .iter()
                    .enumerate()
                    .map(|(i, l)| OutputDevice::audio_output(*l, format!("dev-{}", i)))
                    .collect(),
                deny_permission: false,
                sink_supported: true,
                bind: BindBehavior::Succeed,
                log: Arc::new(Mutex::new(HostLog::default())),
                created: AtomicUsize::new(0),
                in_flight: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn log(&self) -> std::sync::MutexGuard<'_, HostLog> {
            self.log.lock().unwrap()
        }
    }

    struct MockElement {
        index: usize,
        source: Option<String>,
        bind: BindBehavior,
        log: Arc<Mutex<HostLog>>,
        in_flight: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PlaybackElement for MockElement {
        async fn set_sink_id(&mut self, device_id: &str) -> std::result::Result<(), HostError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            {
                let mut log = self.log.lock().unwrap();
                log.max_in_flight = log.max_in_flight.max(now);
            }
            tokio::task::yield_now().await;

            let result = match self.bind {
                BindBehavior::FailAt(i) if i == self.index => {
                    Err(HostError::new("NotFoundError"))
                }
                BindBehavior::HangAt(i) if i == self.index => {
                    std::future::pending::<()>().await;
                    Ok(())
                }
                _ => {
                    self.log
                        .lock()
                        .unwrap()
                        .binds
                        .push((self.index, device_id.to_string()));
                    Ok(())
                }
            };
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn set_source(&mut self, url: &str) {
            self.source = Some(url.to_string());
        }

        fn source(&self) -> Option<&str> {
            self.source.as_deref()
        }

        fn play(&self) {
            self.log.lock().unwrap().plays.push(self.index);
        }
    }

    #[async_trait]
    impl AudioHost for MockHost {
        type Element = MockElement;

        fn supports_sink_selection(&self) -> bool {
            self.sink_supported
        }

        fn sample_rate(&self) -> u32 {
            8000
        }

        async fn request_permission(&self) -> std::result::Result<(), HostError> {
            self.log().permission_calls += 1;
            if self.deny_permission {
                Err(HostError::new("NotAllowedError"))
            } else {
                Ok(())
            }
        }

        async fn enumerate_devices(&self) -> std::result::Result<Vec<OutputDevice>, HostError> {
            self.log().enumerate_calls += 1;
            tokio::task::yield_now().await;
            Ok(self.devices.clone())
        }

        fn create_object_url(&self, asset: &WavAsset) -> String {
            let mut log = self.log();
            log.asset_sizes.push(asset.len());
            format!("blob:mock/{}", log.asset_sizes.len())
        }

        fn create_element(&self) -> MockElement {
            MockElement {
                index: self.created.fetch_add(1, Ordering::SeqCst),
                source: None,
                bind: self.bind,
                log: Arc::clone(&self.log),
                in_flight: Arc::clone(&self.in_flight),
            }
        }

        fn attach(&self, element: &MockElement) {
            self.log().attached.push(element.index);
        }
    }

    fn index_of(key: ToneKey) -> usize {
        ToneKey::ALL.iter().position(|k| *k == key).unwrap()
    }

    #[tokio::test]
    async fn init_binds_every_tone_to_matched_device() {
        let host = MockHost::new(&["Speakers", "CABLE Input", "Cable Output"]);
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();

        let ready = player.init().await.unwrap();
        assert_eq!(ready.device.as_ref().unwrap().label, "Cable Output");
        assert_eq!(ready.id, 1);
        assert_eq!(player.device().unwrap().device_id, "dev-2");
        assert_eq!(player.state(), InitState::Ready);

        let log = player.host().log();
        assert_eq!(log.binds.len(), 16);
        assert!(log.binds.iter().all(|(_, dev)| dev == "dev-2"));
        assert_eq!(log.max_in_flight, 1);
        assert_eq!(log.attached.len(), 16);

        // last built is bound first
        let order: Vec<usize> = log.binds.iter().map(|(i, _)| *i).collect();
        let expected: Vec<usize> = (0..16).rev().collect();
        assert_eq!(order, expected);
    }

    #[tokio::test]
    async fn every_symbol_plays_once_per_call() {
        let host = MockHost::new(&["Cable Output"]);
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();
        player.init().await.unwrap();

        for key in ToneKey::ALL {
            assert!(player.play(&key.to_string()));
            let log = player.host().log();
            assert_eq!(log.plays.last(), Some(&index_of(key)));
        }
        assert_eq!(player.host().log().plays.len(), 16);

        let asset = player.asset(ToneKey::Pound).unwrap();
        assert_eq!(asset.device_id(), Some("dev-0"));
        assert_eq!(asset.frequencies(), (941.0, 1477.0));
        assert!(asset.url().starts_with("blob:mock/"));
    }

    #[tokio::test]
    async fn unknown_symbols_do_not_play() {
        let host = MockHost::new(&["Cable Output"]);
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();
        player.init().await.unwrap();

        for key in ["E", "x", "", "12", "**", " "] {
            assert!(!player.play(key), "{:?}", key);
        }
        assert!(player.host().log().plays.is_empty());
    }

    #[tokio::test]
    async fn play_before_init_returns_false() {
        let host = MockHost::new(&["Cable Output"]);
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();
        assert_eq!(player.state(), InitState::Uninitialized);
        assert!(!player.play("1"));
        assert!(player.host().log().plays.is_empty());
    }

    #[tokio::test]
    async fn second_init_does_not_rebind() {
        let host = MockHost::new(&["Cable Output"]);
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();

        let first = player.init().await.unwrap();
        let second = player.init().await.unwrap();
        assert_eq!(first, second);

        let log = player.host().log();
        assert_eq!(log.permission_calls, 1);
        assert_eq!(log.enumerate_calls, 1);
        assert_eq!(log.binds.len(), 16);
    }

    #[tokio::test]
    async fn concurrent_init_shares_one_lifecycle() {
        let host = MockHost::new(&["Cable Output"]);
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();

        let (a, b) = tokio::join!(player.init(), player.init());
        assert_eq!(a.unwrap(), b.unwrap());

        let log = player.host().log();
        assert_eq!(log.enumerate_calls, 1);
        assert_eq!(log.binds.len(), 16);
    }

    #[tokio::test]
    async fn dropped_init_is_not_restarted() {
        let mut host = MockHost::new(&["Cable Output"]);
        host.bind = BindBehavior::HangAt(15);
        let config = PlayerConfig {
            bind_timeout_ms: 0,
            ..PlayerConfig::default()
        };
        let player = DtmfPlayer::new(host, config).unwrap();

        let first =
            tokio::time::timeout(std::time::Duration::from_millis(20), player.init()).await;
        assert!(first.is_err());

        let err = player.init().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InitAbandoned);
        assert_eq!(player.state(), InitState::Failed);

        // the outcome is latched
        let again = player.init().await.unwrap_err();
        assert_eq!(again.code, ErrorCode::InitAbandoned);

        let log = player.host().log();
        assert_eq!(log.permission_calls, 1);
        assert_eq!(log.enumerate_calls, 1);
        assert!(log.binds.is_empty());
        drop(log);
        assert!(!player.play("1"));
    }

    #[tokio::test]
    async fn no_match_without_fallback_rejects() {
        let host = MockHost::new(&["Speakers", "Headphones"]);
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();

        let err = player.init().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DeviceNotFound);
        assert!(err.message.contains("cable"));
        assert_eq!(player.state(), InitState::Failed);
        assert!(player.device().is_none());

        // the failure is final
        let again = player.init().await.unwrap_err();
        assert_eq!(again.code, ErrorCode::DeviceNotFound);
        assert_eq!(player.host().log().enumerate_calls, 1);
    }

    #[tokio::test]
    async fn no_match_with_fallback_uses_default_device() {
        let host = MockHost::new(&["Speakers"]);
        let config = PlayerConfig {
            dev_use_default: true,
            ..PlayerConfig::default()
        };
        let player = DtmfPlayer::new(host, config).unwrap();

        let ready = player.init().await.unwrap();
        assert!(ready.device.is_none());
        assert!(player.play("0"));

        let log = player.host().log();
        assert!(log.binds.is_empty());
        assert_eq!(log.attached.len(), 16);
        drop(log);
        assert!(player.asset(ToneKey::Zero).unwrap().device_id().is_none());
    }

    #[tokio::test]
    async fn forced_default_skips_binding_even_with_match() {
        let host = MockHost::new(&["Cable Output"]);
        let config = PlayerConfig {
            dev_use_default: true,
            ..PlayerConfig::default()
        };
        let player = DtmfPlayer::new(host, config).unwrap();

        let ready = player.init().await.unwrap();
        assert_eq!(ready.device.unwrap().label, "Cable Output");
        assert!(player.host().log().binds.is_empty());
        assert!(player.play("#"));
    }

    #[tokio::test]
    async fn failed_bind_rejects_and_keeps_completed_binds() {
        let mut host = MockHost::new(&["Cable Output"]);
        // elements are bound from index 15 down, so 15..=11 succeed first
        host.bind = BindBehavior::FailAt(10);
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();

        let err = player.init().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DeviceBindFailed);
        assert!(err.message.contains(&format!("({})", ToneKey::ALL[10])));
        assert!(err.message.contains("NotFoundError"));
        assert_eq!(player.state(), InitState::Failed);

        assert_eq!(player.host().log().binds.len(), 5);
        assert!(player.play(&ToneKey::ALL[15].to_string()));
        assert!(!player.play(&ToneKey::ALL[10].to_string()));
        assert!(!player.play(&ToneKey::ALL[0].to_string()));
        assert!(player.device().is_some());
    }

    #[tokio::test]
    async fn hung_bind_times_out() {
        let mut host = MockHost::new(&["Cable Output"]);
        host.bind = BindBehavior::HangAt(15);
        let config = PlayerConfig {
            bind_timeout_ms: 20,
            ..PlayerConfig::default()
        };
        let player = DtmfPlayer::new(host, config).unwrap();

        let err = player.init().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DeviceBindTimeout);
        assert!(err.message.contains(&format!("({})", ToneKey::ALL[15])));
    }

    #[tokio::test]
    async fn permission_denied_rejects() {
        let mut host = MockHost::new(&["Cable Output"]);
        host.deny_permission = true;
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();

        let err = player.init().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert!(err.message.contains("NotAllowedError"));
        assert_eq!(player.host().log().enumerate_calls, 0);
    }

    #[tokio::test]
    async fn input_devices_are_not_selected() {
        let mut host = MockHost::new(&[]);
        host.devices.push(OutputDevice {
            kind: DeviceKind::AudioInput,
            label: "Cable Microphone".to_string(),
            device_id: "mic".to_string(),
        });
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();
        assert_eq!(
            player.init().await.unwrap_err().code,
            ErrorCode::DeviceNotFound
        );
    }

    #[test]
    fn unsupported_sink_selection_is_rejected() {
        let mut host = MockHost::new(&["Cable Output"]);
        host.sink_supported = false;
        let err = DtmfPlayer::new(host, PlayerConfig::default()).err().unwrap();
        assert_eq!(err.code, ErrorCode::SinkSelectionUnsupported);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let host = MockHost::new(&["Cable Output"]);
        let config = PlayerConfig {
            tone_gain: 2.0,
            ..PlayerConfig::default()
        };
        let err = DtmfPlayer::new(host, config).err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidConfig);

        let host = MockHost::new(&["Cable Output"]);
        let config = PlayerConfig {
            tone_duration2: 0.0,
            ..PlayerConfig::default()
        };
        let err = DtmfPlayer::new(host, config).err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidConfig);
    }

    #[tokio::test]
    async fn assets_are_mono_wav_at_host_rate() {
        let host = MockHost::new(&["Cable Output"]);
        let player = DtmfPlayer::new(host, PlayerConfig::default()).unwrap();
        player.init().await.unwrap();

        let wav = crate::generation::build_tone_asset(
            player.context(),
            player.config(),
            ToneKey::One,
        )
        .unwrap();
        let header = read_header(wav.as_bytes()).unwrap();
        assert_eq!(header.sample_rate, 8000);
        assert_eq!(header.channels, 1);

        let log = player.host().log();
        assert_eq!(log.asset_sizes.len(), 16);
        assert!(log.asset_sizes.iter().all(|size| *size == wav.len()));
    }

    #[test]
    fn init_state_serializes_with_tag() {
        let json = serde_json::to_string(&InitState::Binding { done: 3, total: 16 }).unwrap();
        assert_eq!(json, r#"{"state":"binding","done":3,"total":16}"#);
        assert!(InitState::Ready.is_terminal());
        assert!(!InitState::Matching.is_terminal());
    }
}
