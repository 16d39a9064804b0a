use mc_core::config::BasisOffset;
use mc_core::error::MfccError;

/// DCT-II basis matrix and projection.
///
/// Row `k` holds `sqrt(2/cols) · cos(π · (k + offset) · (n + 0.5) / cols)`.
/// Square with offset `Zero` for generic use, `num_coefficients ×
/// num_mel_filters` for the cepstral step.
///
/// # Example
/// ```
/// use mc_audio::dct::Dct;
/// let dct = Dct::new(8).unwrap();
/// let out = dct.transform(&[1.0; 8]).unwrap();
/// assert_eq!(out.len(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct Dct {
    rows: usize,
    cols: usize,
    offset: BasisOffset,
    /// Row-major `rows × cols`.
    matrix: Vec<f32>,
}

impl Dct {
    /// Square `size × size` basis starting at index 0.
    ///
    /// # Errors
    /// Returns [`MfccError::InvalidConfiguration`] if `size` is 0.
    pub fn new(size: usize) -> Result<Self, MfccError> {
        Self::with_shape(size, size, BasisOffset::Zero)
    }

    /// Rectangular basis: `rows` outputs from `cols` inputs.
    ///
    /// # Errors
    /// Returns [`MfccError::InvalidConfiguration`] if either side is 0.
    pub fn with_shape(rows: usize, cols: usize, offset: BasisOffset) -> Result<Self, MfccError> {
        if rows == 0 || cols == 0 {
            return Err(MfccError::invalid(format!(
                "matrice DCT vide ({rows}×{cols})"
            )));
        }

        let norm = (2.0 / cols as f64).sqrt();
        let first = offset.value();
        let mut matrix = Vec::with_capacity(rows * cols);
        for k in 0..rows {
            let basis = (k + first) as f64;
            for n in 0..cols {
                let theta = std::f64::consts::PI * basis * (n as f64 + 0.5) / cols as f64;
                matrix.push((norm * theta.cos()) as f32);
            }
        }

        log::debug!("DCT-II {rows}×{cols} (offset {first}) construite");

        Ok(Self {
            rows,
            cols,
            offset,
            matrix,
        })
    }

    /// Project `data` onto the basis: `out[k] = Σ_n data[n] · m[k][n]`.
    ///
    /// # Errors
    /// Returns [`MfccError::DimensionMismatch`] if `data.len() != cols`.
    pub fn transform(&self, data: &[f32]) -> Result<Vec<f32>, MfccError> {
        if data.len() != self.cols {
            return Err(MfccError::mismatch("dct", self.cols, data.len()));
        }
        Ok(self
            .matrix
            .chunks_exact(self.cols)
            .map(|row| {
                row.iter()
                    .zip(data)
                    .map(|(&w, &x)| f64::from(w) * f64::from(x))
                    .sum::<f64>() as f32
            })
            .collect())
    }

    /// Basis row `k`, or `None` past the last row.
    #[must_use]
    pub fn row(&self, k: usize) -> Option<&[f32]> {
        self.matrix.chunks_exact(self.cols).nth(k)
    }

    /// Output dimension.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Input dimension.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn offset(&self) -> BasisOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn zero_in_zero_out() {
        for size in [1, 2, 7, 24, 64] {
            let dct = Dct::new(size).unwrap();
            let out = dct.transform(&vec![0.0; size]).unwrap();
            assert!(out.iter().all(|&v| v == 0.0), "size {size}");
        }
        let rect = Dct::with_shape(12, 24, BasisOffset::One).unwrap();
        assert!(rect.transform(&[0.0; 24]).unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn linearity() {
        let dct = Dct::with_shape(12, 24, BasisOffset::One).unwrap();
        let x: Vec<f32> = (0..24).map(|i| (i as f32 * 0.37).sin()).collect();
        let y: Vec<f32> = (0..24).map(|i| (i as f32 * 0.11).cos() - 0.5).collect();
        let (a, b) = (2.5f32, -0.75f32);
        let mixed: Vec<f32> = x.iter().zip(&y).map(|(p, q)| a * p + b * q).collect();

        let lhs = dct.transform(&mixed).unwrap();
        let tx = dct.transform(&x).unwrap();
        let ty = dct.transform(&y).unwrap();
        for k in 0..12 {
            let rhs = a * tx[k] + b * ty[k];
            assert!((lhs[k] - rhs).abs() < 1e-4, "k={k}: {} vs {rhs}", lhs[k]);
        }
    }

    #[test]
    fn rows_are_orthogonal() {
        let dct = Dct::new(16).unwrap();
        for i in 1..16 {
            for j in 1..16 {
                let d = dot(dct.row(i).unwrap(), dct.row(j).unwrap());
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((d - expected).abs() < 1e-5, "rows {i},{j}: {d}");
            }
        }
        // Row 0 carries the flat basis with norm² = 2 under sqrt(2/N) scaling.
        let r0 = dct.row(0).unwrap();
        assert!((dot(r0, r0) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn offset_shifts_basis_index() {
        let zero = Dct::with_shape(4, 8, BasisOffset::Zero).unwrap();
        let one = Dct::with_shape(4, 8, BasisOffset::One).unwrap();
        assert_eq!(zero.row(1), one.row(0));
        assert_eq!(zero.row(3), one.row(2));
        assert!(one.row(4).is_none());
    }

    #[test]
    fn constant_input_lands_in_c0() {
        let dct = Dct::new(8).unwrap();
        let out = dct.transform(&[1.0; 8]).unwrap();
        assert!((out[0] - (2.0f32 / 8.0).sqrt() * 8.0).abs() < 1e-5);
        assert!(out[1..].iter().all(|v| v.abs() < 1e-5));
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let dct = Dct::with_shape(12, 24, BasisOffset::One).unwrap();
        assert_eq!(
            dct.transform(&[1.0; 23]),
            Err(MfccError::mismatch("dct", 24, 23))
        );
        assert!(dct.transform(&[1.0; 25]).is_err());
    }

    #[test]
    fn empty_shape_rejected() {
        assert!(matches!(Dct::new(0), Err(MfccError::InvalidConfiguration(_))));
        assert!(Dct::with_shape(3, 0, BasisOffset::Zero).is_err());
    }
}
