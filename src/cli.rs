//! CLI argument parser for offline tone rendering.
//!
//! Renders DTMF tones to WAV files with the same pipeline the player uses,
//! without a host audio environment.

use std::path::PathBuf;

use clap::Parser;

use crate::audio::WavLayout;
use crate::config::{default_config_path, PlayerConfig};
use crate::error::Result;

/// Default sample rate for offline rendering.
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// dtmf-player: render DTMF tones to WAV
#[derive(Parser, Debug)]
#[command(name = "dtmf-player")]
#[command(about = "DTMF tone synthesis and WAV rendering")]
#[command(version)]
pub struct Cli {
    /// Keypad symbols to render back to back (0-9, *, #, A-D; separators ignored)
    #[arg(short, long)]
    pub dial: Option<String>,

    /// Directory to write one WAV file per keypad symbol into
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Output WAV file path for --dial
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sample rate in Hz
    #[arg(short, long, default_value_t = DEFAULT_SAMPLE_RATE, value_parser = clap::value_parser!(u32).range(1000..=384000))]
    pub sample_rate: u32,

    /// WAV header layout (overrides the configured wavLayout)
    #[arg(short, long, value_enum)]
    pub layout: Option<WavLayout>,

    /// JSON configuration file (defaults to the platform config path if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Returns true if a dial string was given.
    pub fn is_dial_mode(&self) -> bool {
        self.dial.is_some()
    }

    /// Returns true if an export directory was given.
    pub fn is_export_mode(&self) -> bool {
        self.export.is_some()
    }

    /// Returns the effective output path.
    ///
    /// Defaults to "dtmf.wav" in the current directory if not specified.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("dtmf.wav"))
    }

    /// Builds the player configuration.
    ///
    /// An explicit `--config` must exist; otherwise the platform default is
    /// read when present. Environment overrides apply next, then `--layout`
    /// if it was given.
    pub fn player_config(&self) -> Result<PlayerConfig> {
        let base = match &self.config {
            Some(path) => PlayerConfig::load(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    PlayerConfig::load(&path)?
                } else {
                    PlayerConfig::default()
                }
            }
        };

        let mut config = base.with_env_overrides();
        if let Some(layout) = self.layout {
            config.wav_layout = layout;
        }
        Ok(config)
    }
}
