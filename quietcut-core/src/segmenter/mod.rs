//! Split-on-silence segmentation.
//!
//! ## Algorithm
//!
//! Two passes over the buffer at 1 ms granularity:
//!
//! 1. Classify every millisecond step as loud or silent by comparing its RMS
//!    amplitude against the linear silence threshold. A step exactly at the
//!    threshold counts as silent, so a fully silent buffer stays silent even
//!    when its derived threshold collapses to zero amplitude.
//! 2. Collapse consecutive silent steps into runs, keep only runs at least
//!    `min_silence_len_ms` long as splitting gaps, and emit the loud
//!    stretches between them as segments. Segment edges are then pushed
//!    outward by up to `keep_silence_ms` into the adjacent silence.
//!
//! When two neighboring segments compete for the same silent gap, each side
//! takes `gap / 2` (an odd leftover millisecond stays unclaimed). This is a
//! policy choice: an even split never favors one segment over the other.

use serde::Serialize;
use tracing::debug;

use crate::analysis::dbfs_to_amplitude;
use crate::buffer::AudioBuffer;

/// One run of non-silent audio in the original buffer, `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Segment {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Partition `buffer` into non-silent segments.
///
/// # Parameters
/// - `min_silence_len_ms`: minimum contiguous quiet duration required to
///   count as a splitting gap. Default: 200.
/// - `threshold_dbfs`: amplitude level (dBFS) at or below which a step is
///   silent.
/// - `keep_silence_ms`: silence retained at each segment edge. Default: 0.
///
/// # Edge cases
/// - Buffer silent throughout → empty vector.
/// - No qualifying silent run (entirely loud, or every quiet run shorter
///   than `min_silence_len_ms`) → one segment spanning the whole buffer.
///
/// Returned segments have strictly increasing start offsets, never overlap,
/// and each has positive duration. Pure function of its inputs.
pub fn segment(
    buffer: &AudioBuffer,
    min_silence_len_ms: u64,
    threshold_dbfs: f32,
    keep_silence_ms: u64,
) -> Vec<Segment> {
    let total_ms = buffer.duration_ms().ceil() as u64;
    if total_ms == 0 {
        return Vec::new();
    }

    let threshold_amplitude = dbfs_to_amplitude(threshold_dbfs);

    // Pass 1: per-millisecond loud/silent classification. The boundary
    // resolves toward silence: a step at exactly the threshold is silent.
    let loud: Vec<bool> = (0..total_ms)
        .map(|ms| buffer.rms_between_ms(ms, ms + 1) > threshold_amplitude)
        .collect();

    if loud.iter().all(|&step| !step) {
        debug!(total_ms, "buffer is silent throughout");
        return Vec::new();
    }

    // Pass 2a: silent runs long enough to split on.
    let gaps = qualifying_gaps(&loud, min_silence_len_ms);

    // Pass 2b: the loud stretches between qualifying gaps become segments.
    let mut candidates: Vec<(u64, u64)> = Vec::new();
    let mut cursor = 0u64;
    for &(gap_start, gap_end) in &gaps {
        if gap_start > cursor {
            candidates.push((cursor, gap_start));
        }
        cursor = gap_end;
    }
    if cursor < total_ms {
        candidates.push((cursor, total_ms));
    }

    let segments = expand_edges(&candidates, total_ms, keep_silence_ms);
    debug!(
        total_ms,
        gaps = gaps.len(),
        segments = segments.len(),
        "silence segmentation complete"
    );
    segments
}

/// Collapse consecutive silent steps into runs and keep those at least
/// `min_silence_len_ms` long. Runs are `[start_ms, end_ms)`.
fn qualifying_gaps(loud: &[bool], min_silence_len_ms: u64) -> Vec<(u64, u64)> {
    let mut gaps = Vec::new();
    let mut run_start: Option<u64> = None;

    for (ms, &step_loud) in loud.iter().enumerate() {
        match (step_loud, run_start) {
            (false, None) => run_start = Some(ms as u64),
            (true, Some(start)) => {
                let end = ms as u64;
                if end - start >= min_silence_len_ms {
                    gaps.push((start, end));
                }
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        let end = loud.len() as u64;
        if end - start >= min_silence_len_ms {
            gaps.push((start, end));
        }
    }
    gaps
}

/// Push each candidate's edges outward by up to `keep_silence_ms` into the
/// adjacent silence, clamped to the buffer bounds. A gap contested by two
/// neighbors is split evenly.
fn expand_edges(candidates: &[(u64, u64)], total_ms: u64, keep_silence_ms: u64) -> Vec<Segment> {
    let n = candidates.len();
    let mut segments = Vec::with_capacity(n);

    for (i, &(start, end)) in candidates.iter().enumerate() {
        let left_take = if i == 0 {
            keep_silence_ms.min(start)
        } else {
            take_from_gap(start - candidates[i - 1].1, keep_silence_ms)
        };
        let right_take = if i == n - 1 {
            keep_silence_ms.min(total_ms - end)
        } else {
            take_from_gap(candidates[i + 1].0 - end, keep_silence_ms)
        };
        segments.push(Segment {
            start_ms: start - left_take,
            end_ms: end + right_take,
        });
    }
    segments
}

/// How much of an interior gap one side may claim: the full `keep` when both
/// sides fit, otherwise half the gap.
fn take_from_gap(gap_ms: u64, keep_silence_ms: u64) -> u64 {
    if keep_silence_ms.saturating_mul(2) <= gap_ms {
        keep_silence_ms
    } else {
        gap_ms / 2
    }
}
