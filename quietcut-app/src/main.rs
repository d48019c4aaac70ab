//! Quietcut command-line shell.
//!
//! Owns everything the core deliberately does not: WAV decode/encode,
//! output directory creation, config file loading and console reporting.
//! The core only ever sees a fully decoded `AudioBuffer`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use quietcut_core::{AudioBuffer, Pipeline, PipelineConfig, PipelineOutcome};
use tracing::{info, warn};

const USAGE: &str = "usage: quietcut <input.wav> [output.wav] [--config <file.json>] [--segments <file.json>]";

#[derive(Debug)]
struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    segments_report: Option<PathBuf>,
}

/// Parse command-line arguments. `Ok(None)` means help was requested.
fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Option<Args>> {
    let mut input = None;
    let mut output = None;
    let mut config = None;
    let mut segments_report = None;

    let mut argv = argv.into_iter();
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(PathBuf::from(
                    argv.next().context("--config requires a path")?,
                ));
            }
            "--segments" => {
                segments_report = Some(PathBuf::from(
                    argv.next().context("--segments requires a path")?,
                ));
            }
            "--help" | "-h" => return Ok(None),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ if output.is_none() => output = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument '{arg}'\n{USAGE}"),
        }
    }

    Ok(Some(Args {
        input: input.with_context(|| format!("missing input file\n{USAGE}"))?,
        output,
        config,
        segments_report,
    }))
}

/// Default output path: `output/<input stem>_condensed.wav`.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".into());
    PathBuf::from("output").join(format!("{stem}_condensed.wav"))
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    let config: PipelineConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
    Ok(config)
}

/// Decode a WAV file into an interleaved f32 buffer.
fn read_wav(path: &Path) -> Result<AudioBuffer> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open WAV file '{}'", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .context("failed to read float samples")?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .context("failed to read integer samples")?
        }
    };

    if samples.is_empty() {
        bail!("'{}' contains no samples", path.display());
    }

    info!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        "WAV loaded"
    );
    Ok(AudioBuffer::new(samples, spec.sample_rate, spec.channels))
}

/// Encode a buffer as 16-bit PCM WAV, creating missing parent directories.
fn write_wav(path: &Path, audio: &AudioBuffer) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
        }
    }

    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    for &sample in &audio.samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize().context("failed to finalize WAV file")?;
    Ok(())
}

fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    info!(?config, "pipeline configuration");

    let input = read_wav(&args.input)?;
    let input_ms = input.duration_ms();

    let pipeline = Pipeline::new(config);
    let outcome = pipeline.run(input)?;

    let (audio, segments) = match outcome {
        PipelineOutcome::Condensed { audio, segments } => (audio, segments),
        PipelineOutcome::NoSegments => {
            warn!("no segments were produced — check the silence detection parameters");
            eprintln!("No audio above the silence threshold; nothing was exported.");
            return Ok(ExitCode::from(2));
        }
    };

    if let Some(report_path) = &args.segments_report {
        let json = serde_json::to_string_pretty(&segments)?;
        fs::write(report_path, json)
            .with_context(|| format!("failed to write '{}'", report_path.display()))?;
        info!(path = %report_path.display(), "segment report written");
    }

    let output_path = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));
    write_wav(&output_path, &audio)?;

    info!(
        input_ms,
        output_ms = audio.duration_ms(),
        segments = segments.len(),
        path = %output_path.display(),
        "condensed audio exported"
    );
    println!(
        "Exported {} segment(s), {:.1} s → {:.1} s: {}",
        segments.len(),
        input_ms / 1000.0,
        audio.duration_ms() / 1000.0,
        output_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
