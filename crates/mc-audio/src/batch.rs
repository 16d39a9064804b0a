use std::path::Path;

use anyhow::Result;
use mc_core::config::MfccConfig;
use mc_core::error::MfccError;
use mc_core::features::FeatureMatrix;
use rayon::prelude::*;

use crate::pipeline::MfccPipeline;

/// Extracteur MFCC pour le traitement offline d'un signal long.
///
/// Découpe le signal en frames de `frame_size` espacées de `hop_size`,
/// zero-pad la dernière, et répartit les frames sur le pool rayon.
/// The pipeline tables are shared read-only between workers.
pub struct BatchExtractor {
    pipeline: MfccPipeline,
}

impl BatchExtractor {
    /// Build the underlying pipeline.
    ///
    /// # Errors
    /// Returns [`MfccError::InvalidConfiguration`] if `config` is invalid.
    ///
    /// # Example
    /// ```
    /// use mc_audio::batch::BatchExtractor;
    /// use mc_core::config::MfccConfig;
    /// let extractor = BatchExtractor::new(MfccConfig::default()).unwrap();
    /// ```
    pub fn new(config: MfccConfig) -> Result<Self, MfccError> {
        Ok(Self {
            pipeline: MfccPipeline::new(config)?,
        })
    }

    /// Number of frames a signal of `len` samples yields.
    ///
    /// # Example
    /// ```
    /// use mc_audio::batch::BatchExtractor;
    /// use mc_core::config::MfccConfig;
    /// let ex = BatchExtractor::new(MfccConfig::default()).unwrap(); // 256 / 128
    /// assert_eq!(ex.frame_count(0), 0);
    /// assert_eq!(ex.frame_count(100), 1);
    /// assert_eq!(ex.frame_count(256), 1);
    /// assert_eq!(ex.frame_count(257), 2);
    /// assert_eq!(ex.frame_count(512), 3);
    /// ```
    #[must_use]
    pub fn frame_count(&self, len: usize) -> usize {
        let config = self.pipeline.config();
        if len == 0 {
            0
        } else if len <= config.frame_size {
            1
        } else {
            1 + (len - config.frame_size).div_ceil(config.hop_size)
        }
    }

    /// Frame `index` of `samples`, zero-padded to `frame_size`.
    fn frame_at(&self, samples: &[f32], index: usize) -> Vec<f32> {
        let config = self.pipeline.config();
        let start = (index * config.hop_size).min(samples.len());
        let end = (start + config.frame_size).min(samples.len());
        let mut frame = Vec::with_capacity(config.frame_size);
        frame.extend_from_slice(&samples[start..end]);
        frame.resize(config.frame_size, 0.0);
        frame
    }

    /// Analyse l'intégralité d'un buffer et génère une `FeatureMatrix`.
    ///
    /// # Errors
    /// Propagates the first per-frame error (none occur for well-formed
    /// frames, which this method always builds).
    ///
    /// # Example
    /// ```
    /// use mc_audio::batch::BatchExtractor;
    /// use mc_core::config::MfccConfig;
    /// let ex = BatchExtractor::new(MfccConfig::default()).unwrap();
    /// let m = ex.extract_all(&vec![0.0; 16_000]).unwrap();
    /// assert_eq!(m.total_frames(), 124);
    /// assert_eq!(m.num_coefficients, 12);
    /// ```
    pub fn extract_all(&self, samples: &[f32]) -> Result<FeatureMatrix, MfccError> {
        let config = self.pipeline.config();
        let num_frames = self.frame_count(samples.len());

        let frames = (0..num_frames)
            .into_par_iter()
            .map(|i| self.pipeline.compute(&self.frame_at(samples, i)))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "{} frames extraites ({} échantillons, hop {})",
            frames.len(),
            samples.len(),
            config.hop_size
        );

        Ok(FeatureMatrix {
            frames,
            hop_duration: config.hop_size as f32 / config.sample_rate as f32,
            sample_rate: config.sample_rate,
            num_coefficients: config.num_coefficients,
            first_coefficient: config.dct_offset.value(),
        })
    }

    /// Décode un fichier audio et analyse l'intégralité de ses échantillons.
    ///
    /// If the file's rate differs from the configured one, the pipeline is
    /// rebuilt for the file's rate.
    ///
    /// # Errors
    /// Retourne une erreur si le fichier ne peut être décodé.
    pub fn extract_file(&mut self, path: &Path) -> Result<FeatureMatrix> {
        let audio = crate::decode::decode_file(path)?;
        if audio.sample_rate != self.pipeline.config().sample_rate {
            log::warn!(
                "Taux du fichier ({} Hz) ≠ configuration ({} Hz), reconstruction du pipeline",
                audio.sample_rate,
                self.pipeline.config().sample_rate
            );
            let config = MfccConfig {
                sample_rate: audio.sample_rate,
                ..self.pipeline.config().clone()
            };
            self.pipeline = MfccPipeline::new(config)?;
        }
        Ok(self.extract_all(&audio.samples)?)
    }

    #[must_use]
    pub fn pipeline(&self) -> &MfccPipeline {
        &self.pipeline
    }
}
