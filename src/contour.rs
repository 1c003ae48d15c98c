//! Dense pitch contours
//!
//! Turns the frame-rate [`TimeSeries`] of a pitch track into a
//! [`DenseContour`] sampled on a uniform grid at a target rate: each voiced
//! segment is fitted with a [`Curve`] and resampled, then the segments are
//! stitched back together with explicit zero-frequency samples filling the
//! silence between them.

use std::path::Path;

use crate::interpolation::{Curve, Interpolation};
use crate::series::{Segment, TimeSeries};
use crate::track::ParsedTrack;
use crate::utils::{arange, closed_grid};
use crate::{Result, SampleRate};

/// One voiced segment resampled onto the output grid
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSegment {
    times: Vec<f64>,
    frequencies: Vec<f64>,
    interpolation: Interpolation,
}

impl ResampledSegment {
    /// Resample a segment with step `1 / sample_rate`
    ///
    /// The grid starts at the first knot and covers `[first, last)`; the last
    /// knot is kept only when it lands exactly on the grid. A single-knot
    /// segment therefore yields one sample holding its value.
    pub fn from_segment(segment: &Segment, sample_rate: SampleRate) -> Self {
        let curve = Curve::fit(segment);
        let times = closed_grid(segment.start_time(), segment.end_time(), sample_rate.step());
        let frequencies = curve.evaluate_all(&times);
        tracing::debug!(
            knots = segment.len(),
            samples = times.len(),
            interpolation = ?curve.interpolation(),
            "resampled voiced segment"
        );
        Self {
            times,
            frequencies,
            interpolation: curve.interpolation(),
        }
    }

    /// Get the resampled times
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Get the resampled frequencies
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Interpolation order used for this segment
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// A pitch contour sampled on a uniform grid
///
/// Covers the first voiced sample of the track (rebased to t = 0) through
/// the last one. Unvoiced stretches between voiced segments are present as
/// zero-frequency samples; nothing is added before the first or after the
/// last segment. Within a segment and within a gap the times step by exactly
/// `1 / sample_rate`; where a segment starts, the grid restarts at its first
/// knot, so that step may be shorter.
///
/// Gap samples are exactly 0.0. A cubic segment can undershoot between
/// steeply falling knots, so its samples may dip below zero; they are kept
/// as computed.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseContour {
    series: TimeSeries,
    sample_rate: SampleRate,
}

impl DenseContour {
    /// A contour without samples (fully unvoiced or frameless input)
    pub fn empty(sample_rate: SampleRate) -> Self {
        Self {
            series: TimeSeries::default(),
            sample_rate,
        }
    }

    /// Read a pitch-track file and build its contour
    pub fn from_file<P: AsRef<Path>>(path: P, sample_rate: SampleRate) -> Result<Self> {
        let track = ParsedTrack::from_file(path)?;
        Ok(Self::from_track(&track, sample_rate))
    }

    /// Build the contour of a parsed track
    pub fn from_track(track: &ParsedTrack, sample_rate: SampleRate) -> Self {
        Self::from_series(&TimeSeries::from_track(track), sample_rate)
    }

    /// Build the contour of a frame-rate series
    pub fn from_series(series: &TimeSeries, sample_rate: SampleRate) -> Self {
        let trimmed = series.trim_leading_silence();
        if trimmed.is_empty() {
            tracing::warn!(
                frames = series.len(),
                "pitch track has no voiced frames; contour is empty"
            );
            return Self::empty(sample_rate);
        }

        let segments = trimmed.voiced_segments();
        tracing::debug!(
            samples = trimmed.len(),
            segments = segments.len(),
            %sample_rate,
            "interpolating voiced segments"
        );

        let resampled: Vec<ResampledSegment> = segments
            .iter()
            .map(|segment| ResampledSegment::from_segment(segment, sample_rate))
            .collect();

        Self::stitch(&resampled, sample_rate)
    }

    /// Concatenate resampled segments, filling the gaps between them
    ///
    /// A segment covers one grid step past its last sample. When the next
    /// segment starts later than that, the uncovered span is filled with
    /// zero-frequency samples on the same grid. Empty segments are skipped.
    pub fn stitch(segments: &[ResampledSegment], sample_rate: SampleRate) -> Self {
        let step = sample_rate.step();
        let mut times = Vec::new();
        let mut frequencies = Vec::new();
        let mut covered_until: Option<f64> = None;

        for (k, segment) in segments.iter().enumerate() {
            let (Some(&first), Some(&last)) = (segment.times.first(), segment.times.last()) else {
                tracing::warn!(segment = k, "voiced segment resampled to no samples; skipping");
                continue;
            };

            if let Some(end) = covered_until {
                let silence = arange(end, first, step);
                frequencies.resize(frequencies.len() + silence.len(), 0.0);
                times.extend(silence);
            }

            times.extend_from_slice(&segment.times);
            frequencies.extend_from_slice(&segment.frequencies);
            covered_until = Some(last + step);
        }

        Self {
            series: TimeSeries::from_parts(times, frequencies),
            sample_rate,
        }
    }

    /// Get the sample times
    pub fn times(&self) -> &[f64] {
        self.series.times()
    }

    /// Get the frequencies (0.0 = unvoiced)
    pub fn frequencies(&self) -> &[f64] {
        self.series.frequencies()
    }

    /// Get the contour as a time series
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Rate of the sampling grid
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if the contour holds no samples
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Get the end time (time just after the last sample)
    pub fn end_time(&self) -> f64 {
        self.times()
            .last()
            .map_or(0.0, |t| t + self.sample_rate.step())
    }

    /// Count voiced samples
    pub fn count_voiced(&self) -> usize {
        self.series.count_voiced()
    }

    /// Get minimum frequency over voiced samples
    pub fn min(&self) -> Option<f64> {
        self.voiced_frequencies().reduce(f64::min)
    }

    /// Get maximum frequency over voiced samples
    pub fn max(&self) -> Option<f64> {
        self.voiced_frequencies().reduce(f64::max)
    }

    /// Get mean frequency over voiced samples
    pub fn mean(&self) -> Option<f64> {
        let count = self.count_voiced();
        if count == 0 {
            None
        } else {
            Some(self.voiced_frequencies().sum::<f64>() / count as f64)
        }
    }

    fn voiced_frequencies(&self) -> impl Iterator<Item = f64> + '_ {
        self.frequencies().iter().copied().filter(|&f| f > 0.0)
    }
}
