//! Praat pitch-track files
//!
//! Reads the text ("ooTextFile") form of a Praat `Pitch` object: the
//! time-axis parameters `x1`/`dx` and one block per analysis frame holding
//! its pitch candidates. Only the lines needed to rebuild a contour are
//! interpreted; everything else in the file (`xmin`, `nx`, `ceiling`,
//! `intensity`, `nCandidates`, `candidates [i]:` ...) is skipped.
//!
//! ```text
//! x1 = 0.025
//! dx = 0.01
//! frames []:
//!     frames [1]:
//!         candidates [1]:
//!             frequency = 0
//!             strength = 0.3
//!     frames [2]:
//!         ...
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Reasons a pitch-track file is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("missing `{0}` header")]
    MissingHeader(&'static str),

    #[error("line {line}: time step dx must be positive, got {value}")]
    NonPositiveStep { line: usize, value: f64 },

    #[error("line {line}: invalid number {text:?}")]
    InvalidNumber { line: usize, text: String },

    #[error("line {line}: `{key}` appears outside of any frame")]
    OutsideFrame { line: usize, key: &'static str },

    #[error("line {line}: strength before any frequency in frame {frame}")]
    StrengthBeforeFrequency { line: usize, frame: usize },

    #[error("line {line}: negative frequency {value}")]
    NegativeFrequency { line: usize, value: f64 },

    #[error("line {line}: expected frame {expected}, found frame {found}")]
    UnexpectedFrameIndex {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("time step dx must be positive, got {0}")]
    InvalidStep(f64),

    #[error("frame at position {position} is numbered {found}")]
    FrameOutOfSequence { position: usize, found: usize },

    #[error("frame {0} has no candidates")]
    EmptyFrame(usize),

    #[error("no frames in pitch track")]
    NoFrames,
}

/// A pitch candidate for a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchCandidate {
    /// Frequency in Hz (0.0 for unvoiced)
    pub frequency: f64,
    /// Strength (autocorrelation value)
    pub strength: f64,
}

/// A single analysis frame of a pitch track
#[derive(Debug, Clone, PartialEq)]
pub struct PitchFrame {
    /// 1-based frame number as written in the file
    pub index: usize,
    /// Pitch candidates in file order (the first is the tracker's choice)
    pub candidates: Vec<PitchCandidate>,
}

impl PitchFrame {
    /// Frequency of the first candidate
    ///
    /// Frames always carry at least one candidate once they are part of a
    /// [`ParsedTrack`]; an empty frame reads as unvoiced.
    pub fn frequency(&self) -> f64 {
        self.candidates.first().map_or(0.0, |c| c.frequency)
    }

    /// Check if the tracker marked this frame voiced
    pub fn is_voiced(&self) -> bool {
        self.frequency() > 0.0
    }
}

/// Frames of a pitch track plus the parameters of its linear time axis
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTrack {
    /// Time of frame 1
    x1: f64,
    /// Time step between frames
    dx: f64,
    frames: Vec<PitchFrame>,
}

impl ParsedTrack {
    /// Assemble a track from already-decoded frames
    ///
    /// Frame indices must run 1, 2, 3, ... in order and every frame needs at
    /// least one candidate. An empty frame list is accepted here; it simply
    /// produces an empty contour.
    pub fn new(x1: f64, dx: f64, frames: Vec<PitchFrame>) -> Result<Self, ParseError> {
        if dx.is_nan() || dx <= 0.0 {
            return Err(ParseError::InvalidStep(dx));
        }
        for (position, frame) in frames.iter().enumerate() {
            if frame.index != position + 1 {
                return Err(ParseError::FrameOutOfSequence {
                    position: position + 1,
                    found: frame.index,
                });
            }
            if frame.candidates.is_empty() {
                return Err(ParseError::EmptyFrame(frame.index));
            }
        }
        Ok(Self { x1, dx, frames })
    }

    /// Read and parse a pitch-track file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let track = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            frames = track.num_frames(),
            x1 = track.x1,
            dx = track.dx,
            "parsed pitch track"
        );
        Ok(track)
    }

    /// Parse the text of a pitch-track file
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut x1 = None;
        let mut dx = None;
        let mut frames: Vec<PitchFrame> = Vec::new();
        let mut current: Option<PitchFrame> = None;

        for (i, raw) in content.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim();

            if let Some(index) = frame_header(line) {
                if let Some(frame) = current.take() {
                    frames.push(close_frame(frame)?);
                }
                let expected = frames.len() + 1;
                if index != expected {
                    return Err(ParseError::UnexpectedFrameIndex {
                        line: line_no,
                        expected,
                        found: index,
                    });
                }
                current = Some(PitchFrame {
                    index,
                    candidates: Vec::new(),
                });
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };

            match key.trim() {
                "x1" => x1 = Some(parse_number(value, line_no)?),
                "dx" => {
                    let step = parse_number(value, line_no)?;
                    if step <= 0.0 {
                        return Err(ParseError::NonPositiveStep {
                            line: line_no,
                            value: step,
                        });
                    }
                    dx = Some(step);
                }
                "frequency" => {
                    let frequency = parse_number(value, line_no)?;
                    if frequency < 0.0 {
                        return Err(ParseError::NegativeFrequency {
                            line: line_no,
                            value: frequency,
                        });
                    }
                    let frame = current.as_mut().ok_or(ParseError::OutsideFrame {
                        line: line_no,
                        key: "frequency",
                    })?;
                    frame.candidates.push(PitchCandidate {
                        frequency,
                        strength: 0.0,
                    });
                }
                "strength" => {
                    let strength = parse_number(value, line_no)?;
                    let frame = current.as_mut().ok_or(ParseError::OutsideFrame {
                        line: line_no,
                        key: "strength",
                    })?;
                    let frame_index = frame.index;
                    let candidate = frame.candidates.last_mut().ok_or(
                        ParseError::StrengthBeforeFrequency {
                            line: line_no,
                            frame: frame_index,
                        },
                    )?;
                    candidate.strength = strength;
                }
                _ => {}
            }
        }

        if let Some(frame) = current.take() {
            frames.push(close_frame(frame)?);
        }

        let x1 = x1.ok_or(ParseError::MissingHeader("x1"))?;
        let dx = dx.ok_or(ParseError::MissingHeader("dx"))?;
        if frames.is_empty() {
            return Err(ParseError::NoFrames);
        }

        Ok(Self { x1, dx, frames })
    }

    /// Time of frame 1
    pub fn x1(&self) -> f64 {
        self.x1
    }

    /// Time step between frames
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Get a reference to the frames
    pub fn frames(&self) -> &[PitchFrame] {
        &self.frames
    }

    /// Get the number of frames
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Get the time of a frame from its 1-based index
    pub fn get_time_from_frame(&self, index: usize) -> f64 {
        self.x1 + (index as f64 - 1.0) * self.dx
    }

    /// Count voiced frames
    pub fn count_voiced(&self) -> usize {
        self.frames.iter().filter(|f| f.is_voiced()).count()
    }
}

impl FromStr for ParsedTrack {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Recognize `frames [N]` (optionally followed by `:`)
///
/// Returns None for anything else, including the `frames []:` collection
/// header whose brackets hold no integer.
fn frame_header(line: &str) -> Option<usize> {
    let rest = line.strip_prefix("frames")?.trim_start();
    let inner = rest.strip_prefix('[')?;
    let (index, _) = inner.split_once(']')?;
    index.trim().parse().ok()
}

fn close_frame(frame: PitchFrame) -> Result<PitchFrame, ParseError> {
    if frame.candidates.is_empty() {
        Err(ParseError::EmptyFrame(frame.index))
    } else {
        Ok(frame)
    }
}

fn parse_number(text: &str, line: usize) -> Result<f64, ParseError> {
    let text = text.trim();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::InvalidNumber {
            line,
            text: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PRAAT_HEADER: &str = "File type = \"ooTextFile\"\n\
        Object class = \"Pitch 1\"\n\
        \n\
        xmin = 0\n\
        xmax = 0.06\n\
        nx = 2\n\
        dx = 0.01\n\
        x1 = 0.025\n\
        ceiling = 600\n\
        maxnCandidates = 15\n\
        frames []:\n";

    #[test]
    fn test_parse_praat_layout() {
        let text = format!(
            "{}    frames [1]:\n\
             \x20       intensity = 0.2\n\
             \x20       nCandidates = 2\n\
             \x20       candidates []:\n\
             \x20           candidates [1]:\n\
             \x20               frequency = 0\n\
             \x20               strength = 0.31\n\
             \x20           candidates [2]:\n\
             \x20               frequency = 310.5\n\
             \x20               strength = 0.29\n\
             \x20   frames [2]:\n\
             \x20       candidates [1]:\n\
             \x20           frequency = 118.25\n\
             \x20           strength = 0.87\n",
            PRAAT_HEADER
        );

        let track = ParsedTrack::parse(&text).unwrap();
        assert_relative_eq!(track.x1(), 0.025);
        assert_relative_eq!(track.dx(), 0.01);
        assert_eq!(track.num_frames(), 2);

        let first = &track.frames()[0];
        assert_eq!(first.index, 1);
        assert_eq!(first.candidates.len(), 2);
        assert_relative_eq!(first.candidates[1].frequency, 310.5);
        assert_relative_eq!(first.candidates[1].strength, 0.29);
        assert!(!first.is_voiced());

        let second = &track.frames()[1];
        assert_relative_eq!(second.frequency(), 118.25);
        assert_relative_eq!(second.candidates[0].strength, 0.87);
        assert_eq!(track.count_voiced(), 1);
        assert_relative_eq!(track.get_time_from_frame(2), 0.035, epsilon = 1e-12);
    }

    #[test]
    fn test_whitespace_around_equals() {
        let text = "x1=0.5\ndx   =  0.02\nframes [1]\nfrequency=100\nstrength =0.9\n";
        let track: ParsedTrack = text.parse().unwrap();
        assert_relative_eq!(track.x1(), 0.5);
        assert_relative_eq!(track.dx(), 0.02);
        assert_relative_eq!(track.frames()[0].frequency(), 100.0);
    }

    #[test]
    fn test_missing_strength_keeps_zero() {
        let text = "x1 = 0\ndx = 0.01\nframes [1]:\nfrequency = 200\n";
        let track = ParsedTrack::parse(text).unwrap();
        assert_eq!(track.frames()[0].candidates[0].strength, 0.0);
    }

    #[test]
    fn test_missing_headers() {
        let text = "dx = 0.01\nframes [1]:\nfrequency = 100\n";
        assert_eq!(
            ParsedTrack::parse(text),
            Err(ParseError::MissingHeader("x1"))
        );

        let text = "x1 = 0.01\nframes [1]:\nfrequency = 100\n";
        assert_eq!(
            ParsedTrack::parse(text),
            Err(ParseError::MissingHeader("dx"))
        );
    }

    #[test]
    fn test_no_frames() {
        let text = "x1 = 0.01\ndx = 0.01\nframes []:\n";
        assert_eq!(ParsedTrack::parse(text), Err(ParseError::NoFrames));
    }

    #[test]
    fn test_strength_before_frequency() {
        let text = "x1 = 0\ndx = 0.01\nframes [1]:\nstrength = 0.5\nfrequency = 100\n";
        assert_eq!(
            ParsedTrack::parse(text),
            Err(ParseError::StrengthBeforeFrequency { line: 4, frame: 1 })
        );

        // A new frame resets the candidate list, so the previous frame's
        // frequency does not count
        let text = "x1 = 0\ndx = 0.01\nframes [1]:\nfrequency = 100\nframes [2]:\nstrength = 0.5\n";
        assert_eq!(
            ParsedTrack::parse(text),
            Err(ParseError::StrengthBeforeFrequency { line: 6, frame: 2 })
        );
    }

    #[test]
    fn test_candidate_outside_frame() {
        let text = "x1 = 0\ndx = 0.01\nfrequency = 100\n";
        assert_eq!(
            ParsedTrack::parse(text),
            Err(ParseError::OutsideFrame {
                line: 3,
                key: "frequency"
            })
        );
    }

    #[test]
    fn test_frame_gap_rejected() {
        let text = "x1 = 0\ndx = 0.01\nframes [1]:\nfrequency = 100\nframes [3]:\nfrequency = 100\n";
        assert_eq!(
            ParsedTrack::parse(text),
            Err(ParseError::UnexpectedFrameIndex {
                line: 5,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_empty_frame_rejected() {
        let text = "x1 = 0\ndx = 0.01\nframes [1]:\nframes [2]:\nfrequency = 100\n";
        assert_eq!(ParsedTrack::parse(text), Err(ParseError::EmptyFrame(1)));
    }

    #[test]
    fn test_invalid_values() {
        let text = "x1 = abc\ndx = 0.01\n";
        assert!(matches!(
            ParsedTrack::parse(text),
            Err(ParseError::InvalidNumber { line: 1, .. })
        ));

        let text = "x1 = 0\ndx = 0\nframes [1]:\nfrequency = 100\n";
        assert!(matches!(
            ParsedTrack::parse(text),
            Err(ParseError::NonPositiveStep { line: 2, .. })
        ));

        let text = "x1 = 0\ndx = 0.01\nframes [1]:\nfrequency = -5\n";
        assert!(matches!(
            ParsedTrack::parse(text),
            Err(ParseError::NegativeFrequency { line: 4, .. })
        ));
    }

    #[test]
    fn test_frame_header_recognition() {
        assert_eq!(frame_header("frames [12]:"), Some(12));
        assert_eq!(frame_header("frames [ 3 ]"), Some(3));
        assert_eq!(frame_header("frames []:"), None);
        assert_eq!(frame_header("frames [x]:"), None);
        assert_eq!(frame_header("candidates [1]:"), None);
    }

    #[test]
    fn test_new_validates_indices() {
        let frame = |index| PitchFrame {
            index,
            candidates: vec![PitchCandidate {
                frequency: 100.0,
                strength: 1.0,
            }],
        };
        assert!(ParsedTrack::new(0.0, 0.01, vec![frame(1), frame(2)]).is_ok());
        assert!(ParsedTrack::new(0.0, 0.01, Vec::new()).is_ok());

        let err = ParsedTrack::new(0.0, 0.01, vec![frame(1), frame(3)]).unwrap_err();
        assert_eq!(
            err,
            ParseError::FrameOutOfSequence {
                position: 2,
                found: 3
            }
        );
        assert_eq!(err.to_string(), "frame at position 2 is numbered 3");

        let err = ParsedTrack::new(0.0, 0.0, vec![frame(1)]).unwrap_err();
        assert_eq!(err, ParseError::InvalidStep(0.0));
        assert!(!err.to_string().contains("line"));
        assert!(matches!(
            ParsedTrack::new(0.0, f64::NAN, vec![frame(1)]),
            Err(ParseError::InvalidStep(_))
        ));
    }
}
