//! Overall loudness measurement and silence-threshold derivation.
//!
//! Loudness is the buffer's RMS amplitude expressed in dBFS (dB relative to
//! full scale, where a peak-amplitude square wave measures 0 dBFS). A fully
//! silent buffer measures negative infinity, which keeps the threshold
//! arithmetic total: `-inf + offset` is still `-inf`.

use tracing::debug;

use crate::buffer::AudioBuffer;
use crate::error::{QuietcutError, Result};

/// Convert a linear amplitude in [0.0, 1.0] to dBFS.
pub fn amplitude_to_dbfs(amplitude: f32) -> f32 {
    if amplitude <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * amplitude.log10()
    }
}

/// Convert a dBFS level back to a linear amplitude.
pub fn dbfs_to_amplitude(dbfs: f32) -> f32 {
    if dbfs == f32::NEG_INFINITY {
        0.0
    } else {
        10f32.powf(dbfs / 20.0)
    }
}

/// Overall loudness of the buffer: RMS amplitude in dBFS.
pub fn loudness_dbfs(buffer: &AudioBuffer) -> f32 {
    amplitude_to_dbfs(buffer.rms())
}

/// Derive the silence threshold for `buffer`: overall loudness plus
/// `offset_db` (a non-positive dB offset, conventionally −16).
///
/// The threshold must always be computed from the original input buffer,
/// never from a processed chunk — normalization changes loudness.
///
/// # Errors
/// `QuietcutError::InvalidBuffer` if the buffer holds zero samples.
pub fn compute_threshold(buffer: &AudioBuffer, offset_db: f32) -> Result<f32> {
    if buffer.is_empty() {
        return Err(QuietcutError::InvalidBuffer(
            "cannot compute a silence threshold for an empty buffer".into(),
        ));
    }

    let loudness = loudness_dbfs(buffer);
    let threshold = loudness + offset_db;
    debug!(loudness_dbfs = loudness, offset_db, threshold_dbfs = threshold, "threshold computed");
    Ok(threshold)
}
