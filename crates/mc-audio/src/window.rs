use mc_core::config::WindowKind;

/// Window coefficients for a frame of `size` samples.
///
/// Rectangular is all ones. Hann and Hamming use the symmetric
/// `N - 1` denominator.
///
/// # Example
/// ```
/// use mc_audio::window::coefficients;
/// use mc_core::config::WindowKind;
/// let w = coefficients(WindowKind::Hann, 5);
/// assert_eq!(w.len(), 5);
/// assert!(w[0].abs() < 1e-6 && (w[2] - 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn coefficients(kind: WindowKind, size: usize) -> Vec<f32> {
    if size <= 1 {
        return vec![1.0; size];
    }
    let denom = (size - 1) as f32;
    let tau = 2.0 * std::f32::consts::PI;
    match kind {
        WindowKind::Rectangular => vec![1.0; size],
        WindowKind::Hann => (0..size)
            .map(|i| 0.5 * (1.0 - (tau * i as f32 / denom).cos()))
            .collect(),
        WindowKind::Hamming => (0..size)
            .map(|i| 0.54 - 0.46 * (tau * i as f32 / denom).cos())
            .collect(),
    }
}

/// First-order pre-emphasis: `y[0] = x[0]`, `y[n] = x[n] - α·x[n-1]`.
///
/// `α = 0` is an exact copy.
///
/// # Example
/// ```
/// use mc_audio::window::pre_emphasis;
/// assert_eq!(pre_emphasis(&[1.0, 1.0, 1.0], 0.5), vec![1.0, 0.5, 0.5]);
/// ```
#[must_use]
pub fn pre_emphasis(signal: &[f32], alpha: f32) -> Vec<f32> {
    if alpha == 0.0 {
        return signal.to_vec();
    }
    let mut out = Vec::with_capacity(signal.len());
    let mut prev = 0.0f32;
    for (i, &x) in signal.iter().enumerate() {
        out.push(if i == 0 { x } else { x - alpha * prev });
        prev = x;
    }
    out
}
