//! Pitch-only tones
//!
//! A [`Sound`] is a mono waveform with its sample rate. Its main producer is
//! [`Sound::from_contour`], which turns a dense pitch contour into a sine
//! tone that follows the contour's frequency sample by sample, so a listener
//! hears the intonation of a recording without its words.

use std::f64::consts::PI;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use crate::contour::DenseContour;
use crate::{ContourError, Result};

const TWO_PI: f64 = 2.0 * PI;
/// Full scale of a 16-bit sample
const PCM16_SCALE: f64 = 32767.0;

/// Mono 16-bit PCM, the only layout this crate writes
fn pcm16_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Audio samples with associated sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    /// Audio samples (mono, in the [-1, 1] range)
    samples: Vec<f64>,
    /// Sample rate in Hz
    sample_rate: f64,
}

impl Sound {
    /// Create a Sound from raw samples
    ///
    /// # Example
    /// ```
    /// use pitch_contour::Sound;
    ///
    /// let samples = vec![0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0, -0.5];
    /// let sound = Sound::from_samples(&samples, 44100.0);
    /// assert_eq!(sound.sample_rate(), 44100.0);
    /// ```
    pub fn from_samples(samples: &[f64], sample_rate: f64) -> Self {
        Self {
            samples: samples.to_vec(),
            sample_rate,
        }
    }

    /// Synthesize the pitch-only tone of a contour
    ///
    /// One output sample per contour sample, at the contour's rate. Unvoiced
    /// samples add no phase, so silence between segments is a held value
    /// rather than a return to zero. An empty contour gives an empty Sound.
    pub fn from_contour(contour: &DenseContour) -> Self {
        let sample_rate = contour.sample_rate().hertz();
        let samples = synthesize(contour.frequencies(), sample_rate);
        tracing::debug!(
            samples = samples.len(),
            sample_rate,
            "synthesized pitch tone"
        );
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a pure tone (sine wave)
    ///
    /// # Arguments
    /// * `frequency` - Frequency in Hz
    /// * `duration` - Duration in seconds
    /// * `sample_rate` - Sample rate in Hz
    /// * `amplitude` - Peak amplitude (0.0 to 1.0)
    /// * `phase` - Initial phase in radians
    pub fn create_tone(
        frequency: f64,
        duration: f64,
        sample_rate: f64,
        amplitude: f64,
        phase: f64,
    ) -> Sound {
        let n_samples = (duration * sample_rate).round() as usize;
        let omega = TWO_PI * frequency / sample_rate;

        let samples: Vec<f64> = (0..n_samples)
            .map(|i| amplitude * (omega * i as f64 + phase).sin())
            .collect();

        Sound {
            samples,
            sample_rate,
        }
    }

    /// Load a mono 16-bit PCM WAV file, as written by [`Sound::write_wav`]
    ///
    /// # Errors
    /// [`ContourError::InvalidParameter`] for any other channel count or
    /// sample format.
    pub fn from_wav_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        if spec.channels != 1
            || spec.sample_format != hound::SampleFormat::Int
            || spec.bits_per_sample != 16
        {
            return Err(ContourError::InvalidParameter(format!(
                "expected mono 16-bit PCM, got {} channel(s) of {}-bit {:?}",
                spec.channels, spec.bits_per_sample, spec.sample_format
            )));
        }

        let samples = reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| v as f64 / PCM16_SCALE))
            .collect::<std::result::Result<_, _>>()?;

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate as f64,
        })
    }

    /// Write the sound as a mono 16-bit PCM WAV file
    pub fn write_wav<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let spec = pcm16_spec(self.wav_sample_rate()?);
        let writer = hound::WavWriter::create(path, spec)?;
        self.write_samples(writer)
    }

    /// Encode the sound as an in-memory 16-bit PCM WAV file
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let spec = pcm16_spec(self.wav_sample_rate()?);
        let mut cursor = Cursor::new(Vec::new());
        {
            let writer = hound::WavWriter::new(&mut cursor, spec)?;
            self.write_samples(writer)?;
        }
        Ok(cursor.into_inner())
    }

    fn write_samples<W: Write + Seek>(&self, mut writer: hound::WavWriter<W>) -> Result<()> {
        for &sample in &self.samples {
            let sample = sample.clamp(-1.0, 1.0);
            writer.write_sample((sample * PCM16_SCALE).round() as i16)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// WAV headers store the rate as a whole number of Hz
    fn wav_sample_rate(&self) -> Result<u32> {
        let rate = self.sample_rate;
        if rate.fract() != 0.0 || rate < 1.0 || rate > u32::MAX as f64 {
            return Err(ContourError::InvalidParameter(format!(
                "cannot write a WAV file at {} Hz; the rate must be a whole number of Hz",
                rate
            )));
        }
        Ok(rate as u32)
    }

    /// Get the sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Get a reference to the audio samples
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Get the number of samples
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Check if the sound holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the total duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Get the largest absolute sample value
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |peak, s| peak.max(s.abs()))
    }

    /// Get the root-mean-square (RMS) amplitude
    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.samples.iter().map(|s| s * s).sum();
        (sum_sq / self.samples.len() as f64).sqrt()
    }
}

/// Phase-accumulating sine synthesis
///
/// `out[k] = sin(phase[k])` with `phase[k] = Σ_{i ≤ k} 2π f[i] / fs`. The
/// running phase is what keeps the waveform continuous when the frequency
/// changes from one sample to the next. It is kept in `[0, 2π)` so that long
/// inputs do not lose precision.
pub fn synthesize(frequencies: &[f64], sample_rate: f64) -> Vec<f64> {
    let mut phase = 0.0_f64;
    frequencies
        .iter()
        .map(|&f| {
            phase = (phase + TWO_PI * f / sample_rate).rem_euclid(TWO_PI);
            phase.sin()
        })
        .collect()
}
