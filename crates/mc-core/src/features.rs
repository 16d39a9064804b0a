use serde::Serialize;

/// Une matrice complète de coefficients MFCC, une ligne par frame.
/// Produite par l'extraction batch sur un signal long.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct FeatureMatrix {
    /// One MFCC vector per analysed frame, in signal order.
    pub frames: Vec<Vec<f32>>,
    /// Durée entre deux débuts de frame consécutifs, en secondes.
    pub hop_duration: f32,
    /// Le taux d'échantillonnage de l'audio source.
    pub sample_rate: u32,
    /// Length of every row.
    pub num_coefficients: usize,
    /// Cepstral index of column 0 (the DCT basis offset): 0 when C0 is
    /// kept, 1 when it is dropped.
    pub first_coefficient: usize,
}

impl FeatureMatrix {
    /// Coefficients of the frame covering time `t` (in seconds).
    ///
    /// Clamps to the last frame; `None` only when the matrix is empty.
    ///
    /// # Example
    /// ```
    /// use mc_core::features::FeatureMatrix;
    /// let m = FeatureMatrix {
    ///     frames: vec![vec![1.0], vec![2.0]],
    ///     hop_duration: 0.5,
    ///     sample_rate: 8000,
    ///     num_coefficients: 1,
    ///     first_coefficient: 1,
    /// };
    /// assert_eq!(m.get_at_time(0.6), Some(&[2.0][..]));
    /// assert_eq!(m.get_at_time(99.0), Some(&[2.0][..]));
    /// ```
    #[must_use]
    pub fn get_at_time(&self, time: f64) -> Option<&[f32]> {
        if self.frames.is_empty() || self.hop_duration <= 0.0 {
            return self.frames.first().map(Vec::as_slice);
        }
        let index = (time.max(0.0) as f32 / self.hop_duration) as usize;
        let clamped = index.min(self.frames.len() - 1);
        self.frames.get(clamped).map(Vec::as_slice)
    }

    /// Nombre total de frames analysées.
    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// Per-coefficient mean over all frames. Zeros when empty.
    #[must_use]
    pub fn mean(&self) -> Vec<f32> {
        let mut acc = vec![0.0f64; self.num_coefficients];
        for row in &self.frames {
            for (a, &v) in acc.iter_mut().zip(row) {
                *a += f64::from(v);
            }
        }
        let n = self.frames.len().max(1) as f64;
        acc.into_iter().map(|a| (a / n) as f32).collect()
    }

    /// Cepstral mean normalisation: subtract the per-coefficient mean from
    /// every frame, removing stationary channel effects.
    pub fn subtract_mean(&mut self) {
        if self.frames.len() < 2 {
            return;
        }
        let mean = self.mean();
        for row in &mut self.frames {
            for (v, m) in row.iter_mut().zip(&mean) {
                *v -= m;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> FeatureMatrix {
        FeatureMatrix {
            frames: vec![vec![1.0, -2.0], vec![3.0, 2.0], vec![5.0, 6.0]],
            hop_duration: 0.01,
            sample_rate: 16_000,
            num_coefficients: 2,
            first_coefficient: 1,
        }
    }

    #[test]
    fn mean_per_coefficient() {
        let m = matrix().mean();
        assert!((m[0] - 3.0).abs() < 1e-6);
        assert!((m[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn subtract_mean_centres_columns() {
        let mut m = matrix();
        m.subtract_mean();
        for c in m.mean() {
            assert!(c.abs() < 1e-6);
        }
        assert!((m.frames[0][0] + 2.0).abs() < 1e-6);
    }

    #[test]
    fn single_frame_left_untouched() {
        let mut m = FeatureMatrix {
            frames: vec![vec![4.0, 5.0]],
            hop_duration: 0.01,
            sample_rate: 16_000,
            num_coefficients: 2,
            first_coefficient: 1,
        };
        m.subtract_mean();
        assert_eq!(m.frames[0], vec![4.0, 5.0]);
    }

    #[test]
    fn lookup_by_time() {
        let m = matrix();
        assert_eq!(m.get_at_time(0.0), Some(&[1.0, -2.0][..]));
        assert_eq!(m.get_at_time(0.015), Some(&[3.0, 2.0][..]));
        assert_eq!(m.total_frames(), 3);
    }

    #[test]
    fn empty_matrix_has_no_frame() {
        let m = FeatureMatrix::default();
        assert!(m.get_at_time(1.0).is_none());
        assert!(m.mean().is_empty());
    }
}
