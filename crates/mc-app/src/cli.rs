use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mc_core::config::{MfccConfig, SpectralBackend, WindowKind};

/// melcep — extraction de coefficients MFCC.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier audio à analyser (WAV, FLAC, MP3, OGG, AAC).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Analyser une sinusoïde synthétique d'une seconde à cette fréquence (Hz).
    #[arg(long)]
    pub tone: Option<f32>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Taux d'échantillonnage (ignoré pour --input : le taux du fichier prime).
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Taille de frame en échantillons.
    #[arg(long)]
    pub frame_size: Option<usize>,

    /// Hop entre deux frames en échantillons.
    #[arg(long)]
    pub hop_size: Option<usize>,

    /// Nombre de coefficients par frame.
    #[arg(short = 'n', long)]
    pub coefficients: Option<usize>,

    /// Fenêtre d'analyse.
    #[arg(long, value_enum)]
    pub window: Option<WindowArg>,

    /// Backend spectral.
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Lifter sinusoïdal HTK de paramètre L (remplace le lifter du fichier).
    #[arg(long)]
    pub lifter: Option<f32>,

    /// Soustraire la moyenne cepstrale de chaque coefficient.
    #[arg(long, default_value_t = false)]
    pub cmn: bool,

    /// Format de sortie sur stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WindowArg {
    Rectangular,
    Hann,
    Hamming,
}

impl From<WindowArg> for WindowKind {
    fn from(w: WindowArg) -> Self {
        match w {
            WindowArg::Rectangular => Self::Rectangular,
            WindowArg::Hann => Self::Hann,
            WindowArg::Hamming => Self::Hamming,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Fft,
    Dft,
}

impl From<BackendArg> for SpectralBackend {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Fft => Self::Fft,
            BackendArg::Dft => Self::Dft,
        }
    }
}

/// Output encoding of the feature matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per frame: time then coefficients.
    Csv,
    /// The whole matrix as a JSON object.
    Json,
}

impl Cli {
    /// Validate that exactly one signal source is provided.
    ///
    /// # Errors
    /// Returns an error if zero or both sources are specified.
    pub fn validate_source(&self) -> anyhow::Result<()> {
        match (self.input.is_some(), self.tone.is_some()) {
            (false, false) => anyhow::bail!(
                "Aucune source spécifiée. Utilisez --input <fichier> ou --tone <Hz>."
            ),
            (true, true) => anyhow::bail!(
                "Une seule source à la fois. Spécifiez --input OU --tone."
            ),
            _ => Ok(()),
        }
    }

    /// Apply command-line overrides on top of `config`.
    pub fn apply_overrides(&self, config: &mut MfccConfig) {
        if let Some(v) = self.sample_rate {
            config.sample_rate = v;
        }
        if let Some(v) = self.frame_size {
            config.frame_size = v;
            if self.hop_size.is_none() {
                config.hop_size = (v / 2).max(1);
            }
        }
        if let Some(v) = self.hop_size {
            config.hop_size = v;
        }
        if let Some(v) = self.coefficients {
            config.num_coefficients = v;
        }
        if let Some(v) = self.window {
            config.window = v.into();
        }
        if let Some(v) = self.backend {
            config.backend = v.into();
        }
        if let Some(l) = self.lifter {
            config.lifter = mc_audio::lifter::sinusoidal_from(
                config.dct_offset.value(),
                config.num_coefficients,
                l,
            );
        }
    }
}
