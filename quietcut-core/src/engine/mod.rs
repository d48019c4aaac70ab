//! `Pipeline` — the silence-condensing orchestrator.
//!
//! ## Stage order
//!
//! ```text
//! run(input)
//!     └─► compute_threshold     (analysis, from the original buffer)
//!         └─► segment           (segmenter)
//!             ├─► NoSegments    (empty segmentation short-circuits here)
//!             └─► process ×N    (processor, one pass per segment)
//!                 └─► concatenate (reassembler) → Condensed(output)
//! ```
//!
//! Strictly linear, no backward transitions, no retries — every stage is a
//! pure function of the previous stage's output, so retrying could never
//! change the result. Errors from any stage propagate to the caller.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis;
use crate::buffer::AudioBuffer;
use crate::error::Result;
use crate::processor;
use crate::reassembler;
use crate::segmenter::{self, Segment};

/// Tunable parameters for one pipeline instance.
///
/// Plain data, cloneable, no process-wide state: pipelines with different
/// settings can run side by side without interference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum contiguous quiet duration (ms) that counts as a splitting
    /// gap. Default: 200.
    pub min_silence_len_ms: u64,
    /// Offset (dB, non-positive) added to the buffer's overall loudness to
    /// derive the silence threshold. Default: -16.0.
    pub silence_threshold_offset_db: f32,
    /// Silence (ms) retained at each segment edge. Default: 0.
    pub keep_silence_ms: u64,
    /// Padding appended after each segment, as a multiple of the segment's
    /// own duration. Default: 2.0.
    pub silence_multiplier: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_silence_len_ms: 200,
            silence_threshold_offset_db: -16.0,
            keep_silence_ms: 0,
            silence_multiplier: 2.0,
        }
    }
}

/// What a completed pipeline run produced.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The condensed audio plus the segments it was rebuilt from.
    Condensed {
        audio: AudioBuffer,
        segments: Vec<Segment>,
    },
    /// Segmentation found nothing above the silence threshold. A legitimate
    /// outcome of aggressive parameters, distinct from an error.
    NoSegments,
}

/// Single-threaded silence-condensing pipeline.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline over one decoded buffer.
    ///
    /// Consumes the input; every stage hands a freshly allocated buffer to
    /// the next.
    ///
    /// # Errors
    /// - `QuietcutError::InvalidBuffer` for an empty input.
    /// - `QuietcutError::IncompatibleFormat` if reassembly receives
    ///   mismatched chunks (an internal invariant violation).
    pub fn run(&self, input: AudioBuffer) -> Result<PipelineOutcome> {
        info!(
            input_ms = input.duration_ms(),
            sample_rate = input.sample_rate,
            channels = input.channels,
            "pipeline started"
        );

        // Threshold comes from the original buffer, never a processed chunk.
        let threshold_dbfs =
            analysis::compute_threshold(&input, self.config.silence_threshold_offset_db)?;
        info!(threshold_dbfs, "silence threshold computed");

        let segments = segmenter::segment(
            &input,
            self.config.min_silence_len_ms,
            threshold_dbfs,
            self.config.keep_silence_ms,
        );
        if segments.is_empty() {
            warn!("segmentation produced no segments, stopping before processing");
            return Ok(PipelineOutcome::NoSegments);
        }
        info!(segments = segments.len(), "segmentation complete");

        let mut processed = Vec::with_capacity(segments.len());
        for seg in &segments {
            debug!(start_ms = seg.start_ms, end_ms = seg.end_ms, "processing segment");
            let chunk = input.slice_between_ms(seg.start_ms, seg.end_ms);
            processed.push(processor::process(chunk, self.config.silence_multiplier));
        }

        let audio = reassembler::concatenate(processed)?;
        info!(output_ms = audio.duration_ms(), "pipeline complete");
        Ok(PipelineOutcome::Condensed { audio, segments })
    }
}
