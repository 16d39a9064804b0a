//! Cepstral liftering.

/// Multiply coefficient `i` by `lifter[i]`.
///
/// A lifter shorter than `coeffs` leaves the tail unchanged (multiplier 1);
/// extra lifter entries are ignored.
///
/// # Example
/// ```
/// use mc_audio::lifter::apply_lifter;
/// let mut c = vec![1.0, 2.0, 3.0];
/// apply_lifter(&mut c, &[0.5]);
/// assert_eq!(c, vec![0.5, 2.0, 3.0]);
/// ```
pub fn apply_lifter(coeffs: &mut [f32], lifter: &[f32]) {
    for (c, &l) in coeffs.iter_mut().zip(lifter) {
        *c *= l;
    }
}

/// HTK sinusoidal lifter `1 + (l/2)·sin(π·i/l)` for `i` in `0..n`.
///
/// `l <= 0` gives a flat lifter.
#[must_use]
pub fn sinusoidal(n: usize, l: f32) -> Vec<f32> {
    sinusoidal_from(0, n, l)
}

/// Sinusoidal lifter for `n` coefficients whose cepstral indices start at
/// `first` (the DCT basis offset), so entry `i` weighs index `first + i`.
///
/// # Example
/// ```
/// use mc_audio::lifter::sinusoidal_from;
/// let l = sinusoidal_from(1, 12, 22.0);
/// let c1 = 1.0 + 11.0 * (std::f32::consts::PI / 22.0).sin();
/// assert!((l[0] - c1).abs() < 1e-5);
/// ```
#[must_use]
pub fn sinusoidal_from(first: usize, n: usize, l: f32) -> Vec<f32> {
    if l <= 0.0 {
        return flat(n);
    }
    (first..first + n)
        .map(|k| 1.0 + 0.5 * l * (std::f32::consts::PI * k as f32 / l).sin())
        .collect()
}

/// All-ones lifter (no reweighting).
#[must_use]
pub fn flat(n: usize) -> Vec<f32> {
    vec![1.0; n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lifter_leaves_tail() {
        let original: Vec<f32> = (0..12).map(|i| i as f32 - 4.5).collect();
        let mut c = original.clone();
        apply_lifter(&mut c, &[2.0, 0.5, 3.0]);
        assert_eq!(c[0], original[0] * 2.0);
        assert_eq!(c[1], original[1] * 0.5);
        assert_eq!(c[2], original[2] * 3.0);
        assert_eq!(&c[3..], &original[3..]);
    }

    #[test]
    fn long_lifter_is_truncated() {
        let mut c = vec![1.0, 1.0];
        apply_lifter(&mut c, &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(c, vec![2.0, 3.0]);
    }

    #[test]
    fn flat_is_identity() {
        let mut c = vec![0.25, -1.5, 7.0];
        apply_lifter(&mut c, &flat(3));
        assert_eq!(c, vec![0.25, -1.5, 7.0]);
    }

    #[test]
    fn sinusoidal_shape() {
        let l = sinusoidal(23, 22.0);
        assert_eq!(l[0], 1.0);
        assert!((l[11] - 12.0).abs() < 1e-4);
        assert!(l.iter().all(|&v| v >= 1.0 - 1e-4));
        assert_eq!(sinusoidal(4, 0.0), flat(4));
    }

    #[test]
    fn offset_lifter_follows_cepstral_index() {
        let from_zero = sinusoidal(13, 22.0);
        let from_one = sinusoidal_from(1, 12, 22.0);
        assert_eq!(from_one.len(), 12);
        assert_eq!(&from_one[..], &from_zero[1..]);
        let c1 = 1.0 + 11.0 * (std::f32::consts::PI / 22.0).sin();
        assert!((from_one[0] - c1).abs() < 1e-5);
        assert_eq!(sinusoidal_from(1, 3, -1.0), flat(3));
    }
}
