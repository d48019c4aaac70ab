//! Order-preserving concatenation of processed chunks.

use tracing::debug;

use crate::buffer::{concat_buffers, AudioBuffer};
use crate::error::{QuietcutError, Result};

/// Concatenate `chunks` in input order into one output buffer.
///
/// Every chunk must share the first chunk's sample rate and channel count.
/// A mismatch means an upstream stage failed to preserve format — that is a
/// bug, not bad input — and yields `QuietcutError::IncompatibleFormat`.
///
/// An empty chunk list yields an empty zero-duration buffer; deciding
/// whether "nothing produced" is reportable is the orchestrator's job.
pub fn concatenate(chunks: Vec<AudioBuffer>) -> Result<AudioBuffer> {
    let Some(first) = chunks.first() else {
        return Ok(AudioBuffer::default());
    };

    let (expected_rate, expected_channels) = (first.sample_rate, first.channels);
    for chunk in &chunks {
        if chunk.sample_rate != expected_rate || chunk.channels != expected_channels {
            return Err(QuietcutError::IncompatibleFormat {
                expected_rate,
                expected_channels,
                found_rate: chunk.sample_rate,
                found_channels: chunk.channels,
            });
        }
    }

    let output = concat_buffers(&chunks);
    debug!(
        chunks = chunks.len(),
        output_ms = output.duration_ms(),
        "chunks reassembled"
    );
    Ok(output)
}
