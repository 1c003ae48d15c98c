//! Time/frequency series and voiced segments
//!
//! A [`TimeSeries`] is the frame-rate view of a pitch track: one timestamp
//! and one frequency per frame, with zero marking unvoiced frames. This
//! module builds it from a [`ParsedTrack`], strips leading silence, and
//! splits it into the voiced [`Segment`]s that are interpolated separately.

use crate::track::ParsedTrack;
use crate::{ContourError, Result};

/// Parallel time and frequency sequences
///
/// Times are strictly increasing; frequencies are non-negative, with 0.0
/// meaning "unvoiced at this instant". [`TimeSeries::new`] checks both. The
/// resampled series inside a [`DenseContour`](crate::DenseContour) keeps the
/// time order but may hold negative cubic undershoot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    times: Vec<f64>,
    frequencies: Vec<f64>,
}

impl TimeSeries {
    /// Create a series, validating its invariants
    pub fn new(times: Vec<f64>, frequencies: Vec<f64>) -> Result<Self> {
        if times.len() != frequencies.len() {
            return Err(ContourError::InvalidParameter(format!(
                "{} times but {} frequencies",
                times.len(),
                frequencies.len()
            )));
        }
        if let Some(pair) = times.windows(2).find(|w| !(w[1] > w[0])) {
            return Err(ContourError::InvalidParameter(format!(
                "times must be strictly increasing ({} followed by {})",
                pair[0], pair[1]
            )));
        }
        if let Some(f) = frequencies.iter().find(|f| !(**f >= 0.0) || f.is_infinite()) {
            return Err(ContourError::InvalidParameter(format!(
                "frequencies must be finite and non-negative, got {}",
                f
            )));
        }
        Ok(Self::from_parts(times, frequencies))
    }

    pub(crate) fn from_parts(times: Vec<f64>, frequencies: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), frequencies.len());
        Self { times, frequencies }
    }

    /// Lay the frames of a track out on their absolute time axis
    ///
    /// Frame `i` (1-based) sits at `x1 + (i - 1) * dx` and contributes the
    /// frequency of its first candidate.
    pub fn from_track(track: &ParsedTrack) -> Self {
        let (times, frequencies) = track
            .frames()
            .iter()
            .map(|frame| (track.get_time_from_frame(frame.index), frame.frequency()))
            .unzip();
        Self { times, frequencies }
    }

    /// Get the timestamps
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Get the frequencies
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Check if the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterate over `(time, frequency)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.frequencies.iter().copied())
    }

    /// Count samples with a positive frequency
    pub fn count_voiced(&self) -> usize {
        self.frequencies.iter().filter(|&&f| f > 0.0).count()
    }

    /// Drop leading unvoiced samples and shift time so the series starts at 0
    ///
    /// A series without any voiced sample trims to an empty series.
    pub fn trim_leading_silence(&self) -> TimeSeries {
        let Some(first) = self.frequencies.iter().position(|&f| f > 0.0) else {
            return TimeSeries::default();
        };
        let origin = self.times[first];
        Self {
            times: self.times[first..].iter().map(|t| t - origin).collect(),
            frequencies: self.frequencies[first..].to_vec(),
        }
    }

    /// Split into maximal runs of voiced samples
    ///
    /// Any number of consecutive unvoiced samples forms a single gap; no
    /// empty segment is ever produced.
    pub fn voiced_segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut current = Segment::default();

        for (time, frequency) in self.iter() {
            if frequency > 0.0 {
                current.times.push(time);
                current.frequencies.push(frequency);
            } else if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        segments
    }
}

/// A maximal run of voiced samples taken from a [`TimeSeries`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segment {
    times: Vec<f64>,
    frequencies: Vec<f64>,
}

impl Segment {
    /// Create a segment from voiced knots
    ///
    /// All frequencies must be positive and times non-decreasing.
    pub fn new(times: Vec<f64>, frequencies: Vec<f64>) -> Result<Self> {
        if times.is_empty() || times.len() != frequencies.len() {
            return Err(ContourError::InvalidParameter(format!(
                "segment needs matching, non-empty knots ({} times, {} frequencies)",
                times.len(),
                frequencies.len()
            )));
        }
        if times.windows(2).any(|w| w[1] < w[0]) {
            return Err(ContourError::InvalidParameter(
                "segment times must not decrease".to_string(),
            ));
        }
        if frequencies.iter().any(|f| !(*f > 0.0) || f.is_infinite()) {
            return Err(ContourError::InvalidParameter(
                "segment frequencies must be positive".to_string(),
            ));
        }
        Ok(Self { times, frequencies })
    }

    /// Get the knot times
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Get the knot frequencies
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Get the number of knots
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the first knot
    pub fn start_time(&self) -> f64 {
        self.times.first().copied().unwrap_or(0.0)
    }

    /// Time of the last knot
    pub fn end_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Check that no two knots share a timestamp
    pub fn has_distinct_times(&self) -> bool {
        self.times.windows(2).all(|w| w[1] > w[0])
    }
}
