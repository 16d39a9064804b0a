use std::sync::Arc;

use mc_core::config::SpectralBackend;
use mc_core::error::MfccError;
use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

/// Discrete Fourier spectrum of one frame, `N` bins.
///
/// `real[k] = Σ x[n]·cos(2πkn/N)`, `imag[k] = -Σ x[n]·sin(2πkn/N)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spectrum {
    /// Real parts, one per bin.
    pub real: Vec<f32>,
    /// Imaginary parts, one per bin.
    pub imag: Vec<f32>,
}

impl Spectrum {
    /// Number of bins (`N`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.real.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    /// Energy `re² + im²` of every bin.
    ///
    /// Squared in f64, then saturated at `f32::MAX`: loud bins never turn
    /// into `inf`.
    #[must_use]
    pub fn energies(&self) -> Vec<f32> {
        self.real
            .iter()
            .zip(&self.imag)
            .map(|(&re, &im)| {
                let (re, im) = (f64::from(re), f64::from(im));
                saturate(re * re + im * im)
            })
            .collect()
    }

    /// Energies of the non-redundant bins `0..=N/2`.
    ///
    /// # Example
    /// ```
    /// use mc_audio::spectrum::Spectrum;
    /// let s = Spectrum { real: vec![1.0, 2.0, 3.0, 2.0], imag: vec![0.0; 4] };
    /// assert_eq!(s.one_sided_energies(), vec![1.0, 4.0, 9.0]);
    /// ```
    #[must_use]
    pub fn one_sided_energies(&self) -> Vec<f32> {
        let half = self.len() / 2 + 1;
        let mut e = self.energies();
        e.truncate(half);
        e
    }
}

/// Narrow an energy to f32, clamping overflow to `f32::MAX`.
///
/// `NaN` only arises from overflow inside the transform (`inf - inf`), so
/// it saturates too.
///
/// # Example
/// ```
/// use mc_audio::spectrum::saturate;
/// assert_eq!(saturate(1e40), f32::MAX);
/// assert_eq!(saturate(f64::NAN), f32::MAX);
/// assert_eq!(saturate(2.5), 2.5);
/// ```
#[inline]
#[must_use]
pub fn saturate(energy: f64) -> f32 {
    if energy.is_nan() {
        f32::MAX
    } else {
        energy.min(f64::from(f32::MAX)) as f32
    }
}

/// Time-domain frame → spectrum.
///
/// Implementations hold only immutable tables, so one instance can serve
/// many threads.
pub trait SpectralTransform: Send + Sync {
    /// Frame length the transform was planned for.
    fn size(&self) -> usize;

    /// Compute the full `N`-bin spectrum of `signal`.
    ///
    /// # Errors
    /// Returns [`MfccError::DimensionMismatch`] if `signal.len() != self.size()`.
    fn transform(&self, signal: &[f32]) -> Result<Spectrum, MfccError>;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}

/// Build the transform selected by `backend`.
///
/// # Errors
/// Returns [`MfccError::InvalidConfiguration`] if `size` is 0.
pub fn make_transform(
    backend: SpectralBackend,
    size: usize,
) -> Result<Box<dyn SpectralTransform>, MfccError> {
    Ok(match backend {
        SpectralBackend::Fft => Box::new(FftAnalyzer::new(size)?),
        SpectralBackend::Dft => Box::new(NaiveDft::new(size)?),
    })
}

/// Direct O(n²) DFT. Slow, simple, used as the reference oracle.
///
/// # Example
/// ```
/// use mc_audio::spectrum::{NaiveDft, SpectralTransform};
/// let dft = NaiveDft::new(4).unwrap();
/// let s = dft.transform(&[1.0, 0.0, 0.0, 0.0]).unwrap();
/// assert_eq!(s.real, vec![1.0; 4]);
/// ```
#[derive(Clone, Debug)]
pub struct NaiveDft {
    size: usize,
}

impl NaiveDft {
    /// # Errors
    /// Returns [`MfccError::InvalidConfiguration`] if `size` is 0.
    pub fn new(size: usize) -> Result<Self, MfccError> {
        if size == 0 {
            return Err(MfccError::invalid("taille DFT nulle"));
        }
        Ok(Self { size })
    }
}

impl SpectralTransform for NaiveDft {
    fn size(&self) -> usize {
        self.size
    }

    fn transform(&self, signal: &[f32]) -> Result<Spectrum, MfccError> {
        let n_pts = self.size;
        if signal.len() != n_pts {
            return Err(MfccError::mismatch("dft", n_pts, signal.len()));
        }

        let step = 2.0 * std::f64::consts::PI / n_pts as f64;
        let mut real = Vec::with_capacity(n_pts);
        let mut imag = Vec::with_capacity(n_pts);
        for k in 0..n_pts {
            let (mut re, mut im) = (0.0f64, 0.0f64);
            for (n, &x) in signal.iter().enumerate() {
                // Reduce k·n mod N first to keep the angle small.
                let theta = step * ((k * n) % n_pts) as f64;
                re += f64::from(x) * theta.cos();
                im -= f64::from(x) * theta.sin();
            }
            real.push(re as f32);
            imag.push(im as f32);
        }
        Ok(Spectrum { real, imag })
    }

    fn name(&self) -> &'static str {
        "dft"
    }
}

/// Real-input FFT via realfft. Same contract as [`NaiveDft`].
///
/// The plan is shared; scratch buffers are allocated per call so that
/// `transform` only needs `&self`.
///
/// # Example
/// ```
/// use mc_audio::spectrum::{FftAnalyzer, SpectralTransform};
/// let fft = FftAnalyzer::new(256).unwrap();
/// let s = fft.transform(&vec![0.0f32; 256]).unwrap();
/// assert_eq!(s.len(), 256);
/// assert_eq!(s.one_sided_energies().len(), 129); // N/2 + 1
/// ```
pub struct FftAnalyzer {
    size: usize,
    plan: Arc<dyn RealToComplex<f32>>,
}

impl FftAnalyzer {
    /// Plan a forward FFT of `size` points.
    ///
    /// # Errors
    /// Returns [`MfccError::InvalidConfiguration`] if `size` is 0.
    pub fn new(size: usize) -> Result<Self, MfccError> {
        if size == 0 {
            return Err(MfccError::invalid("taille FFT nulle"));
        }
        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(size);
        Ok(Self { size, plan })
    }
}

impl SpectralTransform for FftAnalyzer {
    fn size(&self) -> usize {
        self.size
    }

    fn transform(&self, signal: &[f32]) -> Result<Spectrum, MfccError> {
        let n_pts = self.size;
        if signal.len() != n_pts {
            return Err(MfccError::mismatch("fft", n_pts, signal.len()));
        }

        let mut input = signal.to_vec();
        let mut output: Vec<Complex<f32>> = self.plan.make_output_vec();
        let mut scratch = self.plan.make_scratch_vec();
        self.plan
            .process_with_scratch(&mut input, &mut output, &mut scratch)
            .map_err(|_| MfccError::mismatch("fft", n_pts, signal.len()))?;

        // Bins above N/2 are the complex conjugates of their mirror.
        let mut real = Vec::with_capacity(n_pts);
        let mut imag = Vec::with_capacity(n_pts);
        for k in 0..n_pts {
            let (c, sign) = if k < output.len() {
                (output[k], 1.0)
            } else {
                (output[n_pts - k], -1.0)
            };
            real.push(c.re);
            imag.push(sign * c.im);
        }
        Ok(Spectrum { real, imag })
    }

    fn name(&self) -> &'static str {
        "fft"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signal(n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| {
                let t = i as f32;
                (0.3 * t).sin() + 0.5 * (1.7 * t).cos() - 0.2 * ((i % 5) as f32)
            })
            .collect()
    }

    #[test]
    fn fft_agrees_with_dft() {
        for n in [2usize, 7, 8, 16, 31, 64] {
            let x = test_signal(n);
            let a = NaiveDft::new(n).unwrap().transform(&x).unwrap();
            let b = FftAnalyzer::new(n).unwrap().transform(&x).unwrap();
            assert_eq!(a.len(), b.len());
            for k in 0..n {
                assert!((a.real[k] - b.real[k]).abs() < 1e-3, "n={n} re[{k}]");
                assert!((a.imag[k] - b.imag[k]).abs() < 1e-3, "n={n} im[{k}]");
            }
        }
    }

    #[test]
    fn dc_signal_lands_in_bin_zero() {
        let dft = NaiveDft::new(8).unwrap();
        let s = dft.transform(&[1.0; 8]).unwrap();
        assert!((s.real[0] - 8.0).abs() < 1e-5);
        assert!(s.energies()[1..].iter().all(|&e| e < 1e-8));
    }

    #[test]
    fn loud_bins_saturate_instead_of_overflowing() {
        let s = Spectrum {
            real: vec![1e20, 3.0, f32::INFINITY],
            imag: vec![1e20, 4.0, f32::NEG_INFINITY],
        };
        assert_eq!(s.energies(), vec![f32::MAX, 25.0, f32::MAX]);
    }

    #[test]
    fn cosine_peaks_at_its_bin() {
        let n = 64;
        let x: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 5.0 * i as f32 / n as f32).cos())
            .collect();
        let s = FftAnalyzer::new(n).unwrap().transform(&x).unwrap();
        let e = s.one_sided_energies();
        let peak = e
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(5));
        // Full spectrum mirrors it.
        assert!((s.energies()[n - 5] - e[5]).abs() < 1e-2);
    }

    #[test]
    fn sine_has_negative_imaginary_part() {
        let n = 16;
        let x: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * i as f32 / n as f32).sin())
            .collect();
        let s = NaiveDft::new(n).unwrap().transform(&x).unwrap();
        assert!((s.imag[1] + 8.0).abs() < 1e-4);
        assert!((s.imag[n - 1] - 8.0).abs() < 1e-4);
    }

    #[test]
    fn wrong_length_rejected() {
        let fft = FftAnalyzer::new(32).unwrap();
        assert_eq!(
            fft.transform(&[0.0; 31]).unwrap_err(),
            MfccError::mismatch("fft", 32, 31)
        );
        let dft = NaiveDft::new(32).unwrap();
        assert!(dft.transform(&[0.0; 33]).is_err());
    }

    #[test]
    fn zero_size_rejected() {
        assert!(FftAnalyzer::new(0).is_err());
        assert!(NaiveDft::new(0).is_err());
        assert!(make_transform(SpectralBackend::Fft, 0).is_err());
    }

    #[test]
    fn factory_picks_backend() {
        assert_eq!(make_transform(SpectralBackend::Fft, 8).unwrap().name(), "fft");
        assert_eq!(make_transform(SpectralBackend::Dft, 8).unwrap().name(), "dft");
    }
}
