//! MFCC extraction for one frame.
//!
//! pre-emphasis → window → spectrum → Mel filtering → log floor → DCT-II
//! → liftering. Per-bin energies `re² + im²` of bins `0..=N/2` feed the
//! filter bank.

use mc_core::config::MfccConfig;
use mc_core::error::MfccError;

use crate::dct::Dct;
use crate::filterbank::MelFilterBank;
use crate::lifter::apply_lifter;
use crate::spectrum::{SpectralTransform, make_transform};
use crate::window::{coefficients, pre_emphasis};

/// Floor applied before the logarithm. Zero-energy filters land on
/// `ln(1e-10)` instead of `-inf`.
pub const LOG_FLOOR: f32 = 1e-10;

/// `ln(clamp(e, LOG_FLOOR, f32::MAX))` per entry. Always finite.
///
/// `inf` and `NaN` (overflow) map to `ln(f32::MAX)`, never to the floor.
///
/// # Example
/// ```
/// use mc_audio::pipeline::{log_compress, LOG_FLOOR};
/// let out = log_compress(&[0.0, 1.0, f32::INFINITY]);
/// assert_eq!(out, vec![LOG_FLOOR.ln(), 0.0, f32::MAX.ln()]);
/// ```
#[must_use]
pub fn log_compress(energies: &[f32]) -> Vec<f32> {
    energies
        .iter()
        .map(|&e| {
            let e = if e.is_nan() { f32::MAX } else { e };
            e.clamp(LOG_FLOOR, f32::MAX).ln()
        })
        .collect()
}

/// Frame → MFCC vector, with every table precomputed.
///
/// Immutable after construction. `compute` takes `&self`, so one pipeline
/// can be shared across threads (`MfccPipeline: Send + Sync`).
///
/// # Example
/// ```
/// use mc_audio::pipeline::MfccPipeline;
/// use mc_core::config::MfccConfig;
///
/// let pipeline = MfccPipeline::new(MfccConfig::new(16_000, 256, 12)).unwrap();
/// let mfcc = pipeline.compute(&[0.0f32; 256]).unwrap();
/// assert_eq!(mfcc.len(), 12);
/// assert!(mfcc.iter().all(|c| c.is_finite()));
/// ```
pub struct MfccPipeline {
    config: MfccConfig,
    filter_bank: MelFilterBank,
    dct: Dct,
    window: Vec<f32>,
    spectral: Box<dyn SpectralTransform>,
}

impl MfccPipeline {
    /// Validate `config` and build the filter bank, DCT basis, window and
    /// spectral plan.
    ///
    /// # Errors
    /// Returns [`MfccError::InvalidConfiguration`] if any size is zero or
    /// a parameter is out of range.
    pub fn new(config: MfccConfig) -> Result<Self, MfccError> {
        config.validate()?;

        let filter_bank =
            MelFilterBank::new(config.num_mel_filters, config.frame_size, config.sample_rate)?;
        let dct = Dct::with_shape(
            config.num_coefficients,
            config.num_mel_filters,
            config.dct_offset,
        )?;
        let window = coefficients(config.window, config.frame_size);
        let spectral = make_transform(config.backend, config.frame_size)?;

        log::info!(
            "Pipeline MFCC : {} Hz, frame {}, {} filtres → {} coeffs ({}, {:?})",
            config.sample_rate,
            config.frame_size,
            config.num_mel_filters,
            config.num_coefficients,
            spectral.name(),
            config.window,
        );

        Ok(Self {
            config,
            filter_bank,
            dct,
            window,
            spectral,
        })
    }

    /// Full MFCC vector of one frame, `num_coefficients` long. Finite for
    /// every finite frame, however loud.
    ///
    /// # Errors
    /// Returns [`MfccError::DimensionMismatch`] if `signal.len() != frame_size`,
    /// [`MfccError::NonFiniteSample`] if a sample is `NaN` or infinite.
    pub fn compute(&self, signal: &[f32]) -> Result<Vec<f32>, MfccError> {
        let log_energies = self.log_mel_energies(signal)?;
        self.cepstrum(&log_energies)
    }

    /// Linear Mel filter energies, one per filter, saturated at `f32::MAX`.
    ///
    /// # Errors
    /// Returns [`MfccError::DimensionMismatch`] if `signal.len() != frame_size`,
    /// [`MfccError::NonFiniteSample`] if a sample is `NaN` or infinite.
    pub fn mel_energies(&self, signal: &[f32]) -> Result<Vec<f32>, MfccError> {
        if signal.len() != self.config.frame_size {
            return Err(MfccError::mismatch(
                "signal",
                self.config.frame_size,
                signal.len(),
            ));
        }
        if let Some(index) = signal.iter().position(|s| !s.is_finite()) {
            return Err(MfccError::NonFiniteSample { index });
        }

        let mut frame = pre_emphasis(signal, self.config.pre_emphasis);
        for (s, w) in frame.iter_mut().zip(&self.window) {
            *s *= w;
        }

        let spectrum = self.spectral.transform(&frame)?;
        self.filter_bank.apply(&spectrum.one_sided_energies())
    }

    /// Log-compressed Mel energies (the DCT input).
    ///
    /// # Errors
    /// Same as [`MfccPipeline::mel_energies`].
    pub fn log_mel_energies(&self, signal: &[f32]) -> Result<Vec<f32>, MfccError> {
        Ok(log_compress(&self.mel_energies(signal)?))
    }

    /// DCT-II projection of log energies followed by liftering.
    ///
    /// # Errors
    /// Returns [`MfccError::DimensionMismatch`] if `log_energies.len()`
    /// differs from the filter count.
    pub fn cepstrum(&self, log_energies: &[f32]) -> Result<Vec<f32>, MfccError> {
        let mut coeffs = self.dct.transform(log_energies)?;
        apply_lifter(&mut coeffs, &self.config.lifter);
        Ok(coeffs)
    }

    #[must_use]
    pub fn config(&self) -> &MfccConfig {
        &self.config
    }

    #[must_use]
    pub fn filter_bank(&self) -> &MelFilterBank {
        &self.filter_bank
    }

    #[must_use]
    pub fn dct(&self) -> &Dct {
        &self.dct
    }
}
