use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use mc_audio::batch::BatchExtractor;
use mc_core::config::{MfccConfig, load_config};

pub mod cli;
pub mod output;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider la source
    cli.validate_source()?;

    // 4. Charger la config, puis les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);

    // 5. Extraire
    let mut extractor = BatchExtractor::new(config.clone()).context("Configuration MFCC invalide")?;
    let mut matrix = if let Some(ref path) = cli.input {
        extractor.extract_file(path)?
    } else {
        let freq = cli.tone.unwrap_or(440.0);
        extractor.extract_all(&synth_tone(freq, config.sample_rate))?
    };

    if cli.cmn {
        matrix.subtract_mean();
    }

    // 6. Écrire sur stdout
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    output::write_matrix(&matrix, cli.format, &mut out)?;
    out.flush()?;

    log::info!(
        "{} frames × {} coefficients écrites",
        matrix.total_frames(),
        matrix.num_coefficients
    );
    Ok(())
}

/// One second of a unit-amplitude sine at `freq` Hz.
fn synth_tone(freq: f32, sample_rate: u32) -> Vec<f32> {
    let tau = 2.0 * std::f32::consts::PI;
    (0..sample_rate as usize)
        .map(|i| (tau * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Config file if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<MfccConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(MfccConfig::default())
    }
}
