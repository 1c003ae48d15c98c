//! Build the pitch contour of a Praat pitch track and write it out.
//!
//! Usage:
//!   pitch_contour <pitch_file|recording.wav> <json|wav> <output> [sample_rate]
//!   pitch_contour --corpus <dir> <index> <json|wav> <output> [sample_rate]
//!
//! `json` writes the contour export (default 100 Hz), `wav` the pitch-only
//! tone (default 44100 Hz). Set `RUST_LOG` to control log output.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use pitch_contour::corpus::{self, RECORDING_EXTENSION};
use pitch_contour::{ContourError, ContourExport, DenseContour, Result, SampleRate, Sound};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Json,
    Wav,
}

impl Output {
    fn parse(text: &str) -> Result<Self> {
        match text {
            "json" => Ok(Output::Json),
            "wav" => Ok(Output::Wav),
            other => Err(ContourError::InvalidParameter(format!(
                "unknown output kind {:?} (expected json or wav)",
                other
            ))),
        }
    }

    fn default_rate(self) -> SampleRate {
        match self {
            Output::Json => SampleRate::CONTOUR,
            Output::Wav => SampleRate::AUDIO,
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn usage(program: &str) -> ContourError {
    ContourError::InvalidParameter(format!(
        "usage:\n  {0} <pitch_file|recording.wav> <json|wav> <output> [sample_rate]\n  \
         {0} --corpus <dir> <index> <json|wav> <output> [sample_rate]",
        program
    ))
}

/// Where the pitch track comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    /// A `.Pitch` file, or a recording whose `.Pitch` sits next to it
    File(PathBuf),
    /// The recording at `index` in a corpus directory
    Corpus { dir: PathBuf, index: usize },
}

impl Input {
    fn pitch_track(&self) -> Result<PathBuf> {
        match self {
            Input::File(path) => Ok(resolve_input(path)),
            Input::Corpus { dir, index } => {
                let recordings = corpus::list_recordings(dir)?;
                corpus::pitch_track_path(dir, &recordings, *index)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Invocation {
    input: Input,
    output: Output,
    destination: PathBuf,
    sample_rate: SampleRate,
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let program = args.first().map_or("pitch_contour", String::as_str);

    let (input, rest) = match args.get(1).map(String::as_str) {
        Some("--corpus") if args.len() >= 6 => {
            let index = args[3].parse().map_err(|_| {
                ContourError::InvalidParameter(format!("invalid recording index {:?}", args[3]))
            })?;
            let input = Input::Corpus {
                dir: PathBuf::from(&args[2]),
                index,
            };
            (input, &args[4..])
        }
        Some(input) if input != "--corpus" && args.len() >= 4 => {
            (Input::File(PathBuf::from(input)), &args[2..])
        }
        _ => return Err(usage(program)),
    };

    let output = Output::parse(&rest[0])?;
    let sample_rate = match rest.get(2) {
        Some(text) => parse_sample_rate(text)?,
        None => output.default_rate(),
    };

    Ok(Invocation {
        input,
        output,
        destination: PathBuf::from(&rest[1]),
        sample_rate,
    })
}

fn parse_sample_rate(text: &str) -> Result<SampleRate> {
    let hz = text
        .parse()
        .map_err(|_| ContourError::InvalidParameter(format!("invalid sample rate {:?}", text)))?;
    SampleRate::new(hz)
}

fn run(args: &[String]) -> Result<()> {
    let invocation = parse_args(args)?;
    let pitch_file = invocation.input.pitch_track()?;
    let destination = &invocation.destination;

    tracing::info!(
        input = %pitch_file.display(),
        output = %destination.display(),
        sample_rate = %invocation.sample_rate,
        "building pitch contour"
    );

    let contour = DenseContour::from_file(&pitch_file, invocation.sample_rate)?;
    match invocation.output {
        Output::Json => ContourExport::from_contour(&contour)?.save(destination)?,
        Output::Wav => Sound::from_contour(&contour).write_wav(destination)?,
    }

    tracing::info!(samples = contour.len(), "wrote {}", destination.display());
    Ok(())
}

/// Recordings are mapped to the pitch track stored next to them
fn resolve_input(path: &Path) -> PathBuf {
    let is_recording = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(RECORDING_EXTENSION));
    if is_recording {
        corpus::pitch_path_for(path)
    } else {
        path.to_path_buf()
    }
}
