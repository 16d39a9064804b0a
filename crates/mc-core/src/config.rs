use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::MfccError;

/// Number of Mel filters used when the configuration does not say otherwise.
pub const DEFAULT_MEL_FILTERS: usize = 24;

/// Configuration complète de l'extracteur MFCC.
///
/// Immutable once a pipeline is built from it: changing any field means
/// building a new pipeline (filter bank and DCT basis depend on it).
///
/// # Example
/// ```
/// use mc_core::config::MfccConfig;
/// let config = MfccConfig::default();
/// assert_eq!(config.num_mel_filters, 24);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MfccConfig {
    /// Taux d'échantillonnage en Hz.
    pub sample_rate: u32,
    /// Taille d'une frame d'analyse en échantillons.
    pub frame_size: usize,
    /// Nombre de coefficients cepstraux produits par frame.
    pub num_coefficients: usize,
    /// Nombre de filtres triangulaires Mel.
    pub num_mel_filters: usize,
    /// Per-coefficient lifter multipliers. Missing tail entries count as 1.
    pub lifter: Vec<f32>,
    /// Pre-emphasis factor α in `y[n] = x[n] - α·x[n-1]`, [0.0, 1.0). 0 = copy.
    pub pre_emphasis: f32,
    /// Fenêtre appliquée avant l'analyse spectrale.
    pub window: WindowKind,
    /// First DCT basis index.
    pub dct_offset: BasisOffset,
    /// Backend d'analyse spectrale.
    pub backend: SpectralBackend,
    /// Hop between consecutive frames for batch extraction, in samples.
    pub hop_size: usize,
}

/// Analysis window applied to each frame.
///
/// # Example
/// ```
/// use mc_core::config::WindowKind;
/// assert!(matches!(WindowKind::default(), WindowKind::Rectangular));
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum WindowKind {
    /// Identity: the caller already windowed the frame.
    #[default]
    Rectangular,
    /// Hann (raised cosine, zero at both ends).
    Hann,
    /// Hamming (0.54 - 0.46 cos).
    Hamming,
}

/// Index of the first DCT-II basis function.
///
/// `Zero` keeps C0 (the frame's log-energy mean), `One` drops it.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum BasisOffset {
    /// Rows use basis indices `0..rows`.
    Zero,
    /// Rows use basis indices `1..=rows`.
    #[default]
    One,
}

impl BasisOffset {
    /// Numeric offset added to the row index.
    #[must_use]
    pub fn value(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// Spectral transform implementation.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum SpectralBackend {
    /// realfft, O(n log n).
    #[default]
    Fft,
    /// Direct summation, O(n²). Reference oracle.
    Dft,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            frame_size: 256,
            num_coefficients: 12,
            num_mel_filters: DEFAULT_MEL_FILTERS,
            lifter: Vec::new(),
            pre_emphasis: 0.0,
            window: WindowKind::Rectangular,
            dct_offset: BasisOffset::One,
            backend: SpectralBackend::Fft,
            hop_size: 128,
        }
    }
}

impl MfccConfig {
    /// Configuration with the three user-facing sizes and defaults elsewhere.
    ///
    /// # Example
    /// ```
    /// use mc_core::config::MfccConfig;
    /// let c = MfccConfig::new(44_100, 1024, 13);
    /// assert_eq!(c.hop_size, 512);
    /// ```
    #[must_use]
    pub fn new(sample_rate: u32, frame_size: usize, num_coefficients: usize) -> Self {
        Self {
            sample_rate,
            frame_size,
            num_coefficients,
            hop_size: (frame_size / 2).max(1),
            ..Self::default()
        }
    }

    /// Number of spectral bins the filter bank covers (`frame_size / 2 + 1`).
    #[must_use]
    pub fn spectral_resolution(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Check every construction-time invariant.
    ///
    /// # Errors
    /// Returns [`MfccError::InvalidConfiguration`] on the first violated rule.
    pub fn validate(&self) -> Result<(), MfccError> {
        if self.sample_rate == 0 {
            return Err(MfccError::invalid("sample_rate doit être > 0"));
        }
        if self.frame_size == 0 {
            return Err(MfccError::invalid("frame_size doit être > 0"));
        }
        if self.num_coefficients == 0 {
            return Err(MfccError::invalid("num_coefficients doit être > 0"));
        }
        if self.num_mel_filters == 0 {
            return Err(MfccError::invalid("num_mel_filters doit être > 0"));
        }
        if self.hop_size == 0 {
            return Err(MfccError::invalid("hop_size doit être > 0"));
        }
        if !self.pre_emphasis.is_finite() || !(0.0..1.0).contains(&self.pre_emphasis) {
            return Err(MfccError::invalid(format!(
                "pre_emphasis hors de [0, 1) : {}",
                self.pre_emphasis
            )));
        }
        if let Some(bad) = self.lifter.iter().position(|v| !v.is_finite()) {
            return Err(MfccError::invalid(format!(
                "lifter[{bad}] n'est pas un nombre fini"
            )));
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    mfcc: Option<MfccSection>,
}

/// `[mfcc]` section, all fields optional for partial override.
#[derive(Deserialize)]
struct MfccSection {
    sample_rate: Option<u32>,
    frame_size: Option<usize>,
    num_coefficients: Option<usize>,
    num_mel_filters: Option<usize>,
    lifter: Option<Vec<f32>>,
    pre_emphasis: Option<f32>,
    window: Option<WindowKind>,
    dct_offset: Option<BasisOffset>,
    backend: Option<SpectralBackend>,
    hop_size: Option<usize>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for the `[mfcc]` section.
///
/// # Example
/// ```
/// use mc_core::config::parse_config;
/// let c = parse_config("[mfcc]\nframe_size = 512\n").unwrap();
/// assert_eq!(c.frame_size, 512);
/// assert_eq!(c.sample_rate, 16_000);
/// ```
pub fn parse_config(content: &str) -> Result<MfccConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = MfccConfig::default();
    let Some(s) = file.mfcc else {
        return Ok(config);
    };

    if let Some(v) = s.sample_rate {
        config.sample_rate = v;
    }
    if let Some(v) = s.frame_size {
        config.frame_size = v;
        // Hop follows the frame unless given explicitly.
        config.hop_size = (v / 2).max(1);
    }
    if let Some(v) = s.num_coefficients {
        config.num_coefficients = v;
    }
    if let Some(v) = s.num_mel_filters {
        config.num_mel_filters = v;
    }
    if let Some(v) = s.lifter {
        config.lifter = v;
    }
    if let Some(v) = s.pre_emphasis {
        config.pre_emphasis = v;
    }
    if let Some(v) = s.window {
        config.window = v;
    }
    if let Some(v) = s.dct_offset {
        config.dct_offset = v;
    }
    if let Some(v) = s.backend {
        config.backend = v;
    }
    if let Some(v) = s.hop_size {
        config.hop_size = v;
    }

    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// Validation is left to pipeline construction so the caller can still
/// apply CLI overrides on top of the file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use mc_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<MfccConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Configuration invalide dans {}", path.display()))?;
    log::debug!("Config chargée depuis {}: {config:?}", path.display());
    Ok(config)
}
