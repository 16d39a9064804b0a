use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use symphonia::core::audio::{Channels, SampleBuffer};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Mono PCM decoded from a file.
#[derive(Clone, Debug, Default)]
pub struct DecodedAudio {
    /// Downmixed samples, normalised to [-1, 1].
    pub samples: Vec<f32>,
    /// Native sample rate of the track.
    pub sample_rate: u32,
    /// Channel count before downmix.
    pub channels: usize,
}

impl DecodedAudio {
    /// Duration in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Average interleaved frames of `channels` samples into mono.
fn downmix(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    let channels = channels.max(1);
    let scale = 1.0 / channels as f32;
    out.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() * scale),
    );
}

/// Decode the default track of an audio file into mono f32 samples at
/// its native rate.
///
/// Supports WAV, MP3, FLAC, OGG, AAC via symphonia.
///
/// # Errors
/// Returns an error if the file cannot be opened, probed or has no track.
///
/// # Example
/// ```no_run
/// use mc_audio::decode::decode_file;
/// let audio = decode_file("speech.wav").unwrap();
/// println!("{} samples @ {} Hz", audio.samples.len(), audio.sample_rate);
/// ```
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedAudio> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Impossible d'ouvrir le fichier audio : {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Format audio non reconnu")?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .context("Aucune piste audio par défaut")?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Taux d'échantillonnage absent de la piste")?;
    let channels = track.codec_params.channels.map_or(1, Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Impossible de créer le décodeur audio")?;

    let mut samples = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut buf_frames = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Paquet audio illisible, arrêt du décodage : {e}");
                break;
            }
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Frame audio corrompue ignorée : {e}");
                continue;
            }
            Err(e) => return Err(e).context("Erreur de décodage"),
        };

        // Grow the interleave buffer only when a packet outsizes it.
        let frames = decoded.capacity();
        if sample_buf.is_none() || frames > buf_frames {
            sample_buf = Some(SampleBuffer::<f32>::new(frames as u64, *decoded.spec()));
            buf_frames = frames;
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);
        downmix(buf.samples(), channels, &mut samples);
    }

    log::info!(
        "Décodé {} échantillons @ {sample_rate} Hz ({channels} canaux) depuis {}",
        samples.len(),
        path.display()
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_channels() {
        let mut out = Vec::new();
        downmix(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2, &mut out);
        assert_eq!(out, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn downmix_mono_is_copy() {
        let mut out = vec![9.0];
        downmix(&[0.1, 0.2], 1, &mut out);
        assert_eq!(out, vec![9.0, 0.1, 0.2]);
    }

    #[test]
    fn duration_from_rate() {
        let a = DecodedAudio {
            samples: vec![0.0; 8000],
            sample_rate: 16_000,
            channels: 1,
        };
        assert!((a.duration_secs() - 0.5).abs() < 1e-9);
        assert_eq!(DecodedAudio::default().duration_secs(), 0.0);
    }

    /// Minimal 16-bit PCM RIFF/WAVE file.
    fn wav_bytes(sample_rate: u32, channels: u16, interleaved: &[i16]) -> Vec<u8> {
        let data_len = (interleaved.len() * 2) as u32;
        let block_align = channels * 2;
        let mut b = Vec::with_capacity(44 + data_len as usize);
        b.extend_from_slice(b"RIFF");
        b.extend_from_slice(&(36 + data_len).to_le_bytes());
        b.extend_from_slice(b"WAVEfmt ");
        b.extend_from_slice(&16u32.to_le_bytes());
        b.extend_from_slice(&1u16.to_le_bytes());
        b.extend_from_slice(&channels.to_le_bytes());
        b.extend_from_slice(&sample_rate.to_le_bytes());
        b.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
        b.extend_from_slice(&block_align.to_le_bytes());
        b.extend_from_slice(&16u16.to_le_bytes());
        b.extend_from_slice(b"data");
        b.extend_from_slice(&data_len.to_le_bytes());
        for s in interleaved {
            b.extend_from_slice(&s.to_le_bytes());
        }
        b
    }

    #[test]
    fn decodes_stereo_wav_to_mono() {
        // Left at half scale, right silent: mono is a quarter scale.
        let interleaved: Vec<i16> = (0..800).flat_map(|_| [16_384i16, 0]).collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        std::fs::write(&path, wav_bytes(8000, 2, &interleaved)).unwrap();

        let audio = decode_file(&path).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.samples.len(), 800);
        assert!(audio.samples.iter().all(|s| (s - 0.25).abs() < 1e-3));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(decode_file("/nonexistent/audio.wav").is_err());
    }
}
