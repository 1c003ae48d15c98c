//! JSON exchange form of a contour
//!
//! ```json
//! {
//!   "max_frequency": 131.2,
//!   "min_frequency": 98.4,
//!   "data": [
//!     { "time": 0.0, "frequency": 120.0 },
//!     { "time": 0.01, "frequency": null }
//!   ]
//! }
//! ```
//!
//! Unvoiced samples carry `null`; every other sample, including a negative
//! cubic undershoot, is written as a number. Older exports wrote the string
//! `"NaN"` for unvoiced samples; it is still accepted when reading.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::contour::DenseContour;
use crate::{ContourError, Result};

/// Frequency of a contour point: a voiced value in Hz or an unvoiced marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrequency", into = "Option<f64>")]
pub enum FrequencyValue {
    Voiced(f64),
    Unvoiced,
}

impl FrequencyValue {
    /// Classify a contour frequency
    ///
    /// Only 0.0 marks an unvoiced sample. Negative values from cubic
    /// undershoot are carried through as numbers.
    pub fn from_hertz(hz: f64) -> Self {
        if hz == 0.0 || hz.is_nan() {
            FrequencyValue::Unvoiced
        } else {
            FrequencyValue::Voiced(hz)
        }
    }

    /// Frequency in Hz, or None if unvoiced
    pub fn hertz(self) -> Option<f64> {
        match self {
            FrequencyValue::Voiced(hz) => Some(hz),
            FrequencyValue::Unvoiced => None,
        }
    }

    pub fn is_voiced(self) -> bool {
        matches!(self, FrequencyValue::Voiced(_))
    }
}

impl From<FrequencyValue> for Option<f64> {
    fn from(value: FrequencyValue) -> Self {
        value.hertz()
    }
}

/// Wire forms accepted for a frequency
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFrequency {
    Number(Option<f64>),
    Marker(String),
}

impl TryFrom<RawFrequency> for FrequencyValue {
    type Error = String;

    fn try_from(raw: RawFrequency) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawFrequency::Number(Some(hz)) => Ok(FrequencyValue::from_hertz(hz)),
            RawFrequency::Number(None) => Ok(FrequencyValue::Unvoiced),
            RawFrequency::Marker(marker) if marker == "NaN" => Ok(FrequencyValue::Unvoiced),
            RawFrequency::Marker(marker) => Err(format!("unknown frequency marker {:?}", marker)),
        }
    }
}

/// A single `(time, frequency)` point of an export
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourPoint {
    pub time: f64,
    pub frequency: FrequencyValue,
}

/// A contour ready for JSON exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourExport {
    /// Highest voiced frequency
    pub max_frequency: f64,
    /// Lowest voiced frequency
    pub min_frequency: f64,
    pub data: Vec<ContourPoint>,
}

impl ContourExport {
    /// Build the export of a contour
    ///
    /// # Errors
    /// [`ContourError::EmptySeries`] if the contour has no voiced sample,
    /// since its frequency range is undefined.
    pub fn from_contour(contour: &DenseContour) -> Result<Self> {
        let (Some(min_frequency), Some(max_frequency)) = (contour.min(), contour.max()) else {
            return Err(ContourError::EmptySeries);
        };

        let data = contour
            .series()
            .iter()
            .map(|(time, hz)| ContourPoint {
                time,
                frequency: FrequencyValue::from_hertz(hz),
            })
            .collect();

        Ok(Self {
            max_frequency,
            min_frequency,
            data,
        })
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an export from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the export as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read an export written by [`ContourExport::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// `(time, frequency)` pairs of the non-null points, in order
    pub fn voiced_points(&self) -> Vec<(f64, f64)> {
        self.data
            .iter()
            .filter_map(|p| p.frequency.hertz().map(|hz| (p.time, hz)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TimeSeries;
    use crate::SampleRate;

    fn contour(frequencies: &[f64]) -> DenseContour {
        let times = (0..frequencies.len()).map(|i| i as f64 * 0.01).collect();
        let series = TimeSeries::new(times, frequencies.to_vec()).unwrap();
        DenseContour::from_series(&series, SampleRate::CONTOUR)
    }

    #[test]
    fn test_export_range_and_markers() {
        let export = ContourExport::from_contour(&contour(&[120.0, 130.0, 0.0, 0.0, 110.0])).unwrap();

        assert_eq!(export.max_frequency, 130.0);
        assert_eq!(export.min_frequency, 110.0);
        assert_eq!(export.data.len(), 5);
        assert_eq!(export.data[0].frequency, FrequencyValue::Voiced(120.0));
        assert_eq!(export.data[2].frequency, FrequencyValue::Unvoiced);
        assert_eq!(export.data[3].frequency, FrequencyValue::Unvoiced);
    }

    #[test]
    fn test_unvoiced_serializes_as_null() {
        let point = ContourPoint {
            time: 0.5,
            frequency: FrequencyValue::Unvoiced,
        };
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"time":0.5,"frequency":null}"#
        );

        let point = ContourPoint {
            time: 0.25,
            frequency: FrequencyValue::Voiced(101.5),
        };
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"time":0.25,"frequency":101.5}"#
        );
    }

    #[test]
    fn test_legacy_nan_marker_accepted() {
        let point: ContourPoint = serde_json::from_str(r#"{"time":0.1,"frequency":"NaN"}"#).unwrap();
        assert_eq!(point.frequency, FrequencyValue::Unvoiced);

        let bad = serde_json::from_str::<ContourPoint>(r#"{"time":0.1,"frequency":"high"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_undershoot_exported_as_number() {
        let knots = [500.0, 500.0, 500.0, 15.0, 15.0, 500.0, 500.0, 500.0];
        let times = (0..knots.len()).map(|i| i as f64 * 0.01).collect();
        let series = TimeSeries::new(times, knots.to_vec()).unwrap();
        let source = DenseContour::from_series(&series, SampleRate::new(1000.0).unwrap());
        let export = ContourExport::from_contour(&source).unwrap();

        let negatives = source.frequencies().iter().filter(|&&f| f < 0.0).count();
        assert!(negatives > 0);
        assert!(export
            .data
            .iter()
            .all(|p| p.frequency != FrequencyValue::Unvoiced));
        let written = export
            .data
            .iter()
            .filter(|p| p.frequency.hertz().is_some_and(|hz| hz < 0.0))
            .count();
        assert_eq!(written, negatives);
        assert!(export.min_frequency > 0.0);

        let json = export.to_json().unwrap();
        assert_eq!(ContourExport::from_json(&json).unwrap(), export);
    }

    #[test]
    fn test_empty_contour_refused() {
        let empty = DenseContour::empty(SampleRate::CONTOUR);
        assert!(matches!(
            ContourExport::from_contour(&empty),
            Err(ContourError::EmptySeries)
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let source = contour(&[120.0, 121.5, 123.25, 124.0, 0.0, 0.0, 98.75]);
        let export = ContourExport::from_contour(&source).unwrap();

        let json = export.to_json().unwrap();
        let parsed = ContourExport::from_json(&json).unwrap();

        assert_eq!(parsed, export);
        let expected: Vec<(f64, f64)> = source.series().iter().filter(|&(_, f)| f > 0.0).collect();
        assert_eq!(parsed.voiced_points(), expected);
    }
}
