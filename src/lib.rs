//! pitch-contour: continuous F0 contours from Praat pitch tracks
//!
//! This library turns the sparse, frame-based output of a pitch tracker
//! (Praat's text `.Pitch` format) into a uniformly sampled frequency contour,
//! and can resynthesize that contour as a "pitch-only" sine tone that carries
//! the intonation of a recording and nothing else.
//!
//! # Core Types
//!
//! - [`ParsedTrack`] - Frames and time-axis parameters read from a pitch file
//! - [`TimeSeries`] - Parallel time/frequency sequences (zero = unvoiced)
//! - [`DenseContour`] - Stitched contour resampled at a fixed rate
//! - [`Sound`] - Phase-continuous sine tone synthesized from a contour
//! - [`ContourExport`] - JSON exchange form of a contour
//!
//! # Example
//!
//! ```no_run
//! use pitch_contour::{ContourExport, DenseContour, SampleRate, Sound};
//!
//! let contour = DenseContour::from_file("speaker01.Pitch", SampleRate::CONTOUR)?;
//! let export = ContourExport::from_contour(&contour)?;
//! export.save("speaker01.json")?;
//!
//! let tone = pitch_contour::pitch_tone("speaker01.Pitch", SampleRate::AUDIO)?;
//! tone.write_wav("speaker01_pitch.wav")?;
//! # Ok::<(), pitch_contour::ContourError>(())
//! ```

pub mod track;
pub mod series;
pub mod interpolation;
pub mod contour;
pub mod sound;
pub mod export;
pub mod corpus;

pub mod utils;

use std::path::{Path, PathBuf};

// Re-export main types at crate root
pub use track::{ParseError, ParsedTrack, PitchCandidate, PitchFrame};
pub use series::{Segment, TimeSeries};
pub use interpolation::{Curve, Interpolation};
pub use contour::DenseContour;
pub use sound::Sound;
pub use export::{ContourExport, ContourPoint, FrequencyValue};

use thiserror::Error;

/// Errors that can occur while building, synthesizing or exporting contours
#[derive(Error, Debug)]
pub enum ContourError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV encoding error: {0}")]
    WavEncode(#[from] hound::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed pitch track: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Contour has no voiced samples")]
    EmptySeries,

    #[error("No recordings found in corpus")]
    NoRecordings,

    #[error("No pitch track found at {}", .0.display())]
    MissingPitchTrack(PathBuf),
}

pub type Result<T> = std::result::Result<T, ContourError>;

/// Target sample rate of a resampled contour or synthesized tone
///
/// Construction is the only place the rate is validated, so every stage
/// downstream can divide by it freely.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SampleRate(f64);

impl SampleRate {
    /// Rate used for the JSON contour export (one point per 10 ms)
    pub const CONTOUR: SampleRate = SampleRate(100.0);
    /// Rate used for audio synthesis
    pub const AUDIO: SampleRate = SampleRate(44100.0);

    /// Create a sample rate, rejecting zero, negative and non-finite values
    pub fn new(hz: f64) -> Result<Self> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(ContourError::InvalidParameter(format!(
                "sample rate must be a positive number of Hz, got {}",
                hz
            )));
        }
        Ok(Self(hz))
    }

    /// Rate in Hz
    pub fn hertz(self) -> f64 {
        self.0
    }

    /// Grid step in seconds (1 / rate)
    pub fn step(self) -> f64 {
        1.0 / self.0
    }
}

impl std::fmt::Display for SampleRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

/// Read a pitch track and synthesize its pitch-only tone in one call
///
/// A fully unvoiced track produces an empty [`Sound`], not an error.
pub fn pitch_tone<P: AsRef<Path>>(path: P, sample_rate: SampleRate) -> Result<Sound> {
    let contour = DenseContour::from_file(path, sample_rate)?;
    Ok(Sound::from_contour(&contour))
}
