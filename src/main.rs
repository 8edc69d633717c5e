//! dtmf-player: offline DTMF tone rendering.
//!
//! This binary can run in two modes:
//! - Dial mode: render a key sequence into a single WAV file
//! - Export mode: write the 16 keypad tones as separate WAV files

use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context};

use dtmf_player::audio::{encode_with_layout, samples_to_duration};
use dtmf_player::cli::Cli;
use dtmf_player::config::PlayerConfig;
use dtmf_player::generation::{build_tone_asset, render_sequence, SynthContext};
use dtmf_player::logging::init_logging;
use dtmf_player::types::ToneKey;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logging(&cli.log_level)?;

    if !cli.is_dial_mode() && !cli.is_export_mode() {
        print_usage();
        return Ok(());
    }

    let config = cli.player_config()?;
    if let Some(reason) = config.validate() {
        bail!("invalid configuration: {}", reason);
    }
    let ctx = SynthContext::new(cli.sample_rate)?;

    if let Some(dir) = &cli.export {
        export_tones(&ctx, &config, dir)?;
    }

    if let Some(dial) = &cli.dial {
        render_dial(&ctx, &config, dial, &cli.output_path())?;
    }

    Ok(())
}

/// Renders a dial string into one WAV file.
fn render_dial(ctx: &SynthContext, config: &PlayerConfig, dial: &str, output: &Path) -> anyhow::Result<()> {
    let keys = match ToneKey::parse_sequence(dial) {
        Ok(keys) if !keys.is_empty() => keys,
        Ok(_) => bail!("dial string {:?} contains no keypad symbols", dial),
        Err(c) => bail!("invalid keypad symbol {:?} in {:?}", c, dial),
    };

    eprintln!("=== dtmf-player dial ===");
    eprintln!("Keys: {}", keys.iter().map(|k| k.symbol()).collect::<String>());
    eprintln!("Sample rate: {} Hz", ctx.sample_rate());
    eprintln!("Output: {}", output.display());

    let start_time = Instant::now();
    let samples = render_sequence(ctx, config, &keys);
    let asset = encode_with_layout(config.wav_layout, ctx.sample_rate(), &samples, None)?;
    asset
        .write_to(output)
        .with_context(|| format!("writing {}", output.display()))?;

    eprintln!(
        "Rendered {:.2}s of audio in {:.1}ms",
        samples_to_duration(samples.len(), ctx.sample_rate()),
        start_time.elapsed().as_secs_f32() * 1000.0
    );
    Ok(())
}

/// Writes every keypad tone into `dir`.
fn export_tones(ctx: &SynthContext, config: &PlayerConfig, dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    eprintln!("=== dtmf-player export ===");
    eprintln!("Directory: {}", dir.display());

    for key in ToneKey::ALL {
        let asset = build_tone_asset(ctx, config, key)?;
        let path = dir.join(format!("dtmf-{}.wav", file_stem(key)));
        asset.write_to(&path)?;
        eprintln!("  {} -> {}", key, path.display());
    }
    Ok(())
}

/// File-name-safe name of a keypad symbol.
fn file_stem(key: ToneKey) -> String {
    match key {
        ToneKey::Star => "star".to_string(),
        ToneKey::Pound => "pound".to_string(),
        other => other.symbol().to_string(),
    }
}

/// Prints usage information.
fn print_usage() {
    eprintln!("dtmf-player: DTMF tone synthesis");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  Render a dial sequence:");
    eprintln!("    dtmf-player --dial \"555-0123#\" --output dial.wav");
    eprintln!();
    eprintln!("  Export all 16 keypad tones:");
    eprintln!("    dtmf-player --export ./tones --layout standard");
    eprintln!();
    eprintln!("Run 'dtmf-player --help' for full options.");
}
