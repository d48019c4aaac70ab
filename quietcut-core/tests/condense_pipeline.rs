//! End-to-end pipeline scenarios over synthetic PCM patterns.

use approx::assert_abs_diff_eq;
use quietcut_core::{AudioBuffer, Pipeline, PipelineConfig, PipelineOutcome, Segment};

const RATE: u32 = 8000;

/// Build a mono buffer from (amplitude, duration_ms) stretches.
fn pattern(stretches: &[(f32, u64)]) -> AudioBuffer {
    let mut samples = Vec::new();
    for &(amplitude, duration_ms) in stretches {
        let frames = (duration_ms * RATE as u64 / 1000) as usize;
        samples.extend(std::iter::repeat(amplitude).take(frames));
    }
    AudioBuffer::new(samples, RATE, 1)
}

fn condensed(outcome: PipelineOutcome) -> (AudioBuffer, Vec<Segment>) {
    match outcome {
        PipelineOutcome::Condensed { audio, segments } => (audio, segments),
        PipelineOutcome::NoSegments => panic!("expected condensed output, got NoSegments"),
    }
}

#[test]
fn qualifying_gap_splits_and_pads_each_segment() {
    // 10 s recording: loud [0, 2000), silent [2000, 2500), loud [2500, 10000).
    // The 500 ms gap exceeds the default 200 ms minimum, so two segments
    // come out; with multiplier 2 the output is 2000×3 + 7500×3 = 28500 ms.
    let input = pattern(&[(0.5, 2000), (0.0, 500), (0.5, 7500)]);
    let pipeline = Pipeline::new(PipelineConfig::default());

    let (audio, segments) = condensed(pipeline.run(input).unwrap());

    assert_eq!(
        segments,
        vec![
            Segment { start_ms: 0, end_ms: 2000 },
            Segment { start_ms: 2500, end_ms: 10_000 },
        ]
    );
    assert_abs_diff_eq!(audio.duration_ms(), 28_500.0);
    // Segments were normalized from 0.5 peak up to full scale
    assert_abs_diff_eq!(audio.samples[0], 1.0, epsilon = 1e-6);
}

#[test]
fn fully_silent_recording_produces_nothing() {
    let input = pattern(&[(0.0, 3000)]);
    let pipeline = Pipeline::new(PipelineConfig::default());

    let outcome = pipeline.run(input).unwrap();
    assert!(matches!(outcome, PipelineOutcome::NoSegments));
}

#[test]
fn sub_minimum_gap_keeps_the_recording_whole() {
    // A 100 ms dip in an otherwise loud buffer is below the 200 ms minimum,
    // so segmentation spans the whole recording.
    let input = pattern(&[(0.5, 1500), (0.0, 100), (0.5, 1400)]);
    let pipeline = Pipeline::new(PipelineConfig::default());

    let (audio, segments) = condensed(pipeline.run(input).unwrap());

    assert_eq!(segments, vec![Segment { start_ms: 0, end_ms: 3000 }]);
    assert_abs_diff_eq!(audio.duration_ms(), 9000.0);
}

#[test]
fn pipeline_is_deterministic() {
    let input = pattern(&[(0.4, 1000), (0.0, 300), (0.6, 800), (0.0, 250), (0.2, 400)]);
    let pipeline = Pipeline::new(PipelineConfig::default());

    let (audio_a, segments_a) = condensed(pipeline.run(input.clone()).unwrap());
    let (audio_b, segments_b) = condensed(pipeline.run(input).unwrap());

    assert_eq!(segments_a, segments_b);
    assert_eq!(audio_a.samples, audio_b.samples);
}

#[test]
fn output_duration_is_segment_sum_times_multiplier_factor() {
    let input = pattern(&[(0.5, 600), (0.0, 400), (0.5, 900), (0.0, 300), (0.5, 500)]);
    let config = PipelineConfig {
        silence_multiplier: 1.0,
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(config);

    let (audio, segments) = condensed(pipeline.run(input).unwrap());

    let segment_ms: u64 = segments.iter().map(Segment::duration_ms).sum();
    assert_eq!(segment_ms, 2000);
    // multiplier 1.0 → each chunk doubles
    assert_abs_diff_eq!(audio.duration_ms(), 4000.0);
}

#[test]
fn kept_silence_widens_segments_without_overlap() {
    let input = pattern(&[(0.5, 800), (0.0, 400), (0.5, 800)]);
    let config = PipelineConfig {
        keep_silence_ms: 100,
        silence_multiplier: 0.0,
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(config);

    let (audio, segments) = condensed(pipeline.run(input).unwrap());

    assert_eq!(
        segments,
        vec![
            Segment { start_ms: 0, end_ms: 900 },
            Segment { start_ms: 1100, end_ms: 2000 },
        ]
    );
    assert_abs_diff_eq!(audio.duration_ms(), 1800.0);
}
