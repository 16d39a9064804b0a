//! Triangular Mel filter bank.
//!
//! `num_filters + 2` break points equally spaced on the Mel scale over
//! `[0, sample_rate / 2]`. Filter `m` rises from break `m-1` to `m` and
//! falls to `m+1`, so neighbours overlap by half and the bank covers the
//! whole band. Built once per configuration, read-only afterwards.

use mc_core::error::MfccError;

use crate::scale::mel_points;
use crate::spectrum::saturate;

/// Hz between two consecutive bins.
#[inline]
fn bin_width(sample_rate: u32, frame_size: usize) -> f32 {
    sample_rate as f32 / frame_size as f32
}

/// One triangular filter, sampled on the spectral bins.
#[derive(Clone, Debug, PartialEq)]
pub struct MelFilter {
    /// Lower edge in Hz (weight 0).
    pub left_hz: f32,
    /// Peak in Hz (weight 1).
    pub center_hz: f32,
    /// Upper edge in Hz (weight 0).
    pub right_hz: f32,
    /// One weight per bin, zero outside `[left_hz, right_hz]`.
    pub weights: Vec<f32>,
}

impl MelFilter {
    /// Continuous triangle evaluated at `freq` Hz.
    ///
    /// # Example
    /// ```
    /// use mc_audio::filterbank::MelFilter;
    /// let f = MelFilter { left_hz: 100.0, center_hz: 200.0, right_hz: 400.0, weights: vec![] };
    /// assert_eq!(f.response(200.0), 1.0);
    /// assert_eq!(f.response(150.0), 0.5);
    /// assert_eq!(f.response(300.0), 0.5);
    /// assert_eq!(f.response(400.0), 0.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn response(&self, freq: f32) -> f32 {
        if freq < self.left_hz {
            0.0
        } else if freq < self.center_hz {
            (freq - self.left_hz) / (self.center_hz - self.left_hz)
        } else if freq < self.right_hz {
            (self.right_hz - freq) / (self.right_hz - self.center_hz)
        } else {
            0.0
        }
    }

    /// First and last bin with a non-zero weight, `None` if the triangle
    /// falls between two bins.
    #[must_use]
    pub fn support(&self) -> Option<(usize, usize)> {
        let first = self.weights.iter().position(|&w| w > 0.0)?;
        let last = self.weights.iter().rposition(|&w| w > 0.0)?;
        Some((first, last))
    }

    /// Weighted sum of `energies` over the filter, saturated at `f32::MAX`.
    ///
    /// Bins outside the triangle are skipped, so an `inf` there cannot
    /// become `0 · inf = NaN`.
    #[inline]
    fn weigh(&self, energies: &[f32]) -> f32 {
        let sum = self
            .weights
            .iter()
            .zip(energies)
            .filter(|&(&w, _)| w > 0.0)
            .map(|(&w, &e)| f64::from(w) * f64::from(e))
            .sum::<f64>();
        saturate(sum)
    }
}

/// Ordered set of overlapping [`MelFilter`]s.
///
/// # Example
/// ```
/// use mc_audio::filterbank::MelFilterBank;
/// let bank = MelFilterBank::new(24, 256, 16_000).unwrap();
/// assert_eq!(bank.len(), 24);
/// assert_eq!(bank.resolution(), 129);
/// ```
#[derive(Clone, Debug)]
pub struct MelFilterBank {
    filters: Vec<MelFilter>,
    resolution: usize,
    frame_size: usize,
    sample_rate: u32,
}

impl MelFilterBank {
    /// Bank covering the `frame_size / 2 + 1` non-redundant bins.
    ///
    /// # Errors
    /// See [`MelFilterBank::with_resolution`].
    pub fn new(num_filters: usize, frame_size: usize, sample_rate: u32) -> Result<Self, MfccError> {
        Self::with_resolution(num_filters, frame_size / 2 + 1, frame_size, sample_rate)
    }

    /// Bank with an explicit bin count.
    ///
    /// Bin `i` sits at `i · sample_rate / frame_size` Hz: the spacing comes
    /// from the frame size, so a bank only fits spectra of that frame size.
    /// `num_filters == 0` yields an empty bank.
    ///
    /// # Errors
    /// Returns [`MfccError::InvalidConfiguration`] if `frame_size` or
    /// `sample_rate` is 0, if `spectral_resolution` would cut the filters
    /// below Nyquist, or if the Mel break points collapse.
    pub fn with_resolution(
        num_filters: usize,
        spectral_resolution: usize,
        frame_size: usize,
        sample_rate: u32,
    ) -> Result<Self, MfccError> {
        if frame_size == 0 || sample_rate == 0 {
            return Err(MfccError::invalid(format!(
                "banc Mel : frame_size={frame_size}, sample_rate={sample_rate}"
            )));
        }
        let needed = frame_size / 2 + 1;
        if spectral_resolution < needed {
            return Err(MfccError::invalid(format!(
                "banc Mel tronqué : {spectral_resolution} bins < {needed} requis \
                 pour frame_size={frame_size}"
            )));
        }

        let nyquist = sample_rate as f32 / 2.0;
        let mut edges = mel_points(0.0, nyquist, num_filters + 2);
        if let Some(last) = edges.last_mut() {
            *last = nyquist;
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MfccError::invalid(format!(
                "{num_filters} filtres : points Mel non strictement croissants"
            )));
        }

        let bin_hz = bin_width(sample_rate, frame_size);
        let filters: Vec<MelFilter> = edges
            .windows(3)
            .take(num_filters)
            .map(|w| {
                let mut filter = MelFilter {
                    left_hz: w[0],
                    center_hz: w[1],
                    right_hz: w[2],
                    weights: Vec::new(),
                };
                filter.weights = (0..spectral_resolution)
                    .map(|i| filter.response(i as f32 * bin_hz))
                    .collect();
                filter
            })
            .collect();

        log::debug!(
            "Banc Mel : {} filtres, {spectral_resolution} bins, {bin_hz:.2} Hz/bin",
            filters.len()
        );

        Ok(Self {
            filters,
            resolution: spectral_resolution,
            frame_size,
            sample_rate,
        })
    }

    /// One energy per filter: `Σ_i weight[i] · energies[i]`.
    ///
    /// # Errors
    /// Returns [`MfccError::DimensionMismatch`] if `energies.len()` differs
    /// from [`MelFilterBank::resolution`].
    pub fn apply(&self, energies: &[f32]) -> Result<Vec<f32>, MfccError> {
        if energies.len() != self.resolution {
            return Err(MfccError::mismatch(
                "banc Mel",
                self.resolution,
                energies.len(),
            ));
        }
        Ok(self.filters.iter().map(|f| f.weigh(energies)).collect())
    }

    /// Index of the filter whose center is closest to `freq` Hz.
    #[must_use]
    pub fn nearest_filter(&self, freq: f32) -> Option<usize> {
        self.filters
            .iter()
            .enumerate()
            .min_by(|a, b| {
                (a.1.center_hz - freq)
                    .abs()
                    .total_cmp(&(b.1.center_hz - freq).abs())
            })
            .map(|(i, _)| i)
    }

    /// Frequency in Hz of bin `i`.
    #[inline]
    #[must_use]
    pub fn bin_frequency(&self, i: usize) -> f32 {
        i as f32 * bin_width(self.sample_rate, self.frame_size)
    }

    #[must_use]
    pub fn filters(&self) -> &[MelFilter] {
        &self.filters
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Number of bins each filter spans.
    #[must_use]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[must_use]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
