//! Per-segment processing: peak normalization followed by silence padding.

use tracing::debug;

use crate::buffer::{concat_buffers, AudioBuffer};

/// Normalize a segment and append padding silence after it.
///
/// The padding duration is `segment duration × silence_multiplier`
/// (`silence_multiplier` ≥ 0, conventionally 2), synthesized at the
/// segment's own rate and channel count, so the output duration is exactly
/// `input × (1 + silence_multiplier)`.
pub fn process(segment_audio: AudioBuffer, silence_multiplier: f64) -> AudioBuffer {
    let normalized = normalize(segment_audio);

    let pad_ms = (normalized.duration_ms() * silence_multiplier).round() as u64;
    let pad = AudioBuffer::silent(pad_ms, normalized.sample_rate, normalized.channels);
    debug!(
        segment_ms = normalized.duration_ms(),
        pad_ms,
        "chunk processed"
    );
    concat_buffers(&[normalized, pad])
}

/// Rescale samples so the peak amplitude reaches full scale (1.0).
///
/// A uniform gain preserves relative dynamics and channel balance. Buffers
/// that are fully silent, or whose peak is already at or above full scale,
/// pass through untouched.
pub fn normalize(mut buffer: AudioBuffer) -> AudioBuffer {
    let peak = buffer.peak();
    if peak <= 0.0 || peak >= 1.0 {
        return buffer;
    }

    let gain = 1.0 / peak;
    for sample in &mut buffer.samples {
        *sample *= gain;
    }
    buffer
}
