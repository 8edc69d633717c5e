//! dtmf-player: DTMF tone synthesis and device-bound playback.
//!
//! The crate renders the 16 DTMF keypad tones, encodes them as WAV assets
//! and binds each one to a chosen audio output device of a host audio
//! environment before playing them on demand.
//!
//! # Modules
//!
//! - [`generation`]: signal generator and per-symbol tone pipeline
//! - [`audio`]: WAV encoder
//! - [`host`]: traits the host audio environment implements
//! - [`player`]: device matching, sequential binding and playback
//! - [`config`]: player configuration (PlayerConfig)
//! - [`error`]: error types and codes (DtmfError, ErrorCode)
//!
//! # Example
//!
//! ```rust,ignore
//! use dtmf_player::{DtmfPlayer, PlayerConfig};
//!
//! let config = PlayerConfig {
//!     dev_name_mask: "cable".to_string(),
//!     ..Default::default()
//! };
//! let player = DtmfPlayer::new(host, config)?;
//! player.init().await?;
//! player.play("5");
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod host;
pub mod logging;
pub mod player;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use audio::{WavAsset, WavLayout};
pub use config::PlayerConfig;
pub use error::{DtmfError, ErrorCode, Result};
pub use host::{AudioHost, HostError, PlaybackElement};
pub use player::{DtmfPlayer, InitState, Ready, ToneAsset};
pub use types::{DeviceKind, OutputDevice, ToneKey};
