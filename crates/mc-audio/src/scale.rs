//! Linear frequency ⇄ Mel scale conversions.
//!
//! `freq_to_mel` uses the base-10 form (2595·log10), `mel_to_freq` the
//! natural-log form (1127·ln). The two constants agree to about 1e-5
//! relative, so a round trip is exact up to that rounding.

/// Hz to Mel.
///
/// # Example
/// ```
/// use mc_audio::scale::freq_to_mel;
/// assert!((freq_to_mel(700.0) - 2595.0 * 2.0f32.log10()).abs() < 1e-3);
/// ```
#[inline]
#[must_use]
pub fn freq_to_mel(freq: f32) -> f32 {
    (2595.0 * (1.0 + f64::from(freq) / 700.0).log10()) as f32
}

/// Mel to Hz.
#[inline]
#[must_use]
pub fn mel_to_freq(mel: f32) -> f32 {
    (700.0 * ((f64::from(mel) / 1127.0).exp() - 1.0)) as f32
}

/// `count` frequencies in Hz, equally spaced on the Mel scale between
/// `min_hz` and `max_hz` inclusive.
///
/// # Example
/// ```
/// use mc_audio::scale::mel_points;
/// let pts = mel_points(0.0, 8000.0, 26);
/// assert_eq!(pts.len(), 26);
/// assert_eq!(pts[0], 0.0);
/// assert!(pts.windows(2).all(|w| w[0] < w[1]));
/// ```
#[must_use]
pub fn mel_points(min_hz: f32, max_hz: f32, count: usize) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let lo = freq_to_mel(min_hz);
    let hi = freq_to_mel(max_hz);
    let steps = (count - 1).max(1) as f32;
    (0..count)
        .map(|i| mel_to_freq(lo + (hi - lo) * i as f32 / steps))
        .collect()
}
