//! Recordings and their pitch tracks
//!
//! A corpus is a directory of `.wav` recordings, each with a Praat pitch
//! track of the same stem next to it (`speaker01.wav` / `speaker01.Pitch`).
//! Callers keep track of which recording they are on and pass its index in
//! explicitly.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{ContourError, Result};

/// Extension of recordings in a corpus
pub const RECORDING_EXTENSION: &str = "wav";
/// Extension of pitch-track files in a corpus
pub const PITCH_EXTENSION: &str = "Pitch";

/// List the recordings in a corpus directory, sorted by file name
pub fn list_recordings<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let mut recordings = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(&format!(".{}", RECORDING_EXTENSION)) {
            recordings.push(name);
        }
    }
    recordings.sort();
    Ok(recordings)
}

/// Path of the pitch track that belongs to a recording
pub fn pitch_path_for<P: AsRef<Path>>(recording: P) -> PathBuf {
    recording.as_ref().with_extension(PITCH_EXTENSION)
}

/// Pitch track of the recording at `index`
///
/// # Errors
/// - [`ContourError::NoRecordings`] if the list is empty
/// - [`ContourError::InvalidParameter`] if `index` is out of range
/// - [`ContourError::MissingPitchTrack`] if the `.Pitch` file does not exist
pub fn pitch_track_path<P: AsRef<Path>>(
    dir: P,
    recordings: &[String],
    index: usize,
) -> Result<PathBuf> {
    if recordings.is_empty() {
        return Err(ContourError::NoRecordings);
    }
    let recording = recordings.get(index).ok_or_else(|| {
        ContourError::InvalidParameter(format!(
            "recording index {} out of range (corpus has {})",
            index,
            recordings.len()
        ))
    })?;

    let path = pitch_path_for(dir.as_ref().join(recording));
    if !path.is_file() {
        return Err(ContourError::MissingPitchTrack(path));
    }
    Ok(path)
}

/// Index of the recording after `index`, wrapping to the first
pub fn next_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (index + 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn corpus() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in ["b.wav", "a.wav", "a.Pitch", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.wav")).unwrap();
        dir
    }

    #[test]
    fn test_list_recordings_sorted() {
        let dir = corpus();
        let recordings = list_recordings(dir.path()).unwrap();
        assert_eq!(recordings, vec!["a.wav".to_string(), "b.wav".to_string()]);
    }

    #[test]
    fn test_pitch_track_path() {
        let dir = corpus();
        let recordings = list_recordings(dir.path()).unwrap();

        let path = pitch_track_path(dir.path(), &recordings, 0).unwrap();
        assert_eq!(path, dir.path().join("a.Pitch"));

        assert!(matches!(
            pitch_track_path(dir.path(), &recordings, 1),
            Err(ContourError::MissingPitchTrack(_))
        ));
        assert!(matches!(
            pitch_track_path(dir.path(), &recordings, 2),
            Err(ContourError::InvalidParameter(_))
        ));
        assert!(matches!(
            pitch_track_path(dir.path(), &[], 0),
            Err(ContourError::NoRecordings)
        ));
    }

    #[test]
    fn test_pitch_path_for() {
        assert_eq!(
            pitch_path_for("corpus/speaker01.wav"),
            PathBuf::from("corpus/speaker01.Pitch")
        );
    }

    #[test]
    fn test_next_index_wraps() {
        assert_eq!(next_index(0, 3), 1);
        assert_eq!(next_index(2, 3), 0);
        assert_eq!(next_index(5, 0), 0);
    }
}
