//! Owned PCM buffer passed between pipeline stages.
//!
//! Slicing and concatenation are explicit named operations that allocate a
//! new buffer; nothing here mutates its operands in place. Millisecond
//! offsets are converted to frame indices with integer arithmetic
//! (`ms * rate / 1000`), so sample rates that are not a multiple of 1000
//! still map each millisecond to a well-defined frame range.

/// A contiguous block of interleaved PCM samples at a known sample rate.
///
/// Samples are `f32` in [-1.0, 1.0], interleaved frame by frame
/// (ch0, ch1, …, ch0, ch1, …). Each pipeline stage owns its buffer
/// exclusively and hands ownership to the next stage.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved f32 samples in [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g. 16000, 44100, 48000).
    pub sample_rate: u32,
    /// Interleaved channel count (1 = mono, 2 = stereo, …).
    pub channels: u16,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        debug_assert!(channels > 0, "channel count must be positive");
        debug_assert_eq!(
            samples.len() % channels as usize,
            0,
            "sample count must be a whole number of frames"
        );
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Synthesize a zero-amplitude buffer of the given duration.
    pub fn silent(duration_ms: u64, sample_rate: u32, channels: u16) -> Self {
        let frames = ms_to_frame(duration_ms, sample_rate);
        Self::new(vec![0.0; frames * channels as usize], sample_rate, channels)
    }

    /// Returns true if the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration of this buffer in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.frames() as f64 * 1000.0 / self.sample_rate as f64
    }

    /// Maximum absolute sample amplitude, 0.0 for an empty buffer.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// Root-mean-square amplitude over the whole buffer.
    pub fn rms(&self) -> f32 {
        rms_of(&self.samples)
    }

    /// Root-mean-square amplitude over the frames in `[start_ms, end_ms)`,
    /// clamped to the buffer bounds. All channels contribute.
    pub fn rms_between_ms(&self, start_ms: u64, end_ms: u64) -> f32 {
        let (lo, hi) = self.sample_range(start_ms, end_ms);
        rms_of(&self.samples[lo..hi])
    }

    /// Copy out the sub-range `[start_ms, end_ms)` as a new buffer.
    ///
    /// Offsets past the end of the buffer are clamped; an inverted range
    /// yields an empty buffer at the same rate/channel count.
    pub fn slice_between_ms(&self, start_ms: u64, end_ms: u64) -> AudioBuffer {
        let (lo, hi) = self.sample_range(start_ms, end_ms);
        AudioBuffer::new(self.samples[lo..hi].to_vec(), self.sample_rate, self.channels)
    }

    /// Clamped interleaved-sample range for `[start_ms, end_ms)`.
    fn sample_range(&self, start_ms: u64, end_ms: u64) -> (usize, usize) {
        let ch = self.channels as usize;
        let lo = (ms_to_frame(start_ms, self.sample_rate) * ch).min(self.samples.len());
        let hi = (ms_to_frame(end_ms, self.sample_rate) * ch).min(self.samples.len());
        (lo, hi.max(lo))
    }
}

/// Zero-duration placeholder (48 kHz mono). Used when no chunk exists to
/// donate a format, e.g. reassembling an empty chunk list.
impl Default for AudioBuffer {
    fn default() -> Self {
        Self::new(Vec::new(), 48_000, 1)
    }
}

/// Frame index corresponding to a millisecond offset.
pub(crate) fn ms_to_frame(ms: u64, sample_rate: u32) -> usize {
    (ms * sample_rate as u64 / 1000) as usize
}

fn rms_of(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Append `parts` in order into one new buffer.
///
/// Callers are responsible for format agreement; the reassembler validates
/// rate/channel count before calling this. An empty slice yields the
/// zero-duration default buffer.
pub fn concat_buffers(parts: &[AudioBuffer]) -> AudioBuffer {
    let Some(first) = parts.first() else {
        return AudioBuffer::default();
    };
    let total: usize = parts.iter().map(|p| p.samples.len()).sum();
    let mut samples = Vec::with_capacity(total);
    for part in parts {
        samples.extend_from_slice(&part.samples);
    }
    AudioBuffer::new(samples, first.sample_rate, first.channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tone(amplitude: f32, duration_ms: u64, sample_rate: u32) -> AudioBuffer {
        let frames = ms_to_frame(duration_ms, sample_rate);
        AudioBuffer::new(vec![amplitude; frames], sample_rate, 1)
    }

    #[test]
    fn duration_follows_frame_count() {
        let buf = tone(0.5, 2000, 8000);
        assert_eq!(buf.frames(), 16_000);
        assert_abs_diff_eq!(buf.duration_ms(), 2000.0);
    }

    #[test]
    fn stereo_frames_count_once_per_channel_pair() {
        let buf = AudioBuffer::new(vec![0.0; 800], 8000, 2);
        assert_eq!(buf.frames(), 400);
        assert_abs_diff_eq!(buf.duration_ms(), 50.0);
    }

    #[test]
    fn peak_is_max_absolute_amplitude() {
        let buf = AudioBuffer::new(vec![0.1, -0.7, 0.3], 8000, 1);
        assert_abs_diff_eq!(buf.peak(), 0.7);
    }

    #[test]
    fn rms_of_square_wave() {
        let samples: Vec<f32> = (0..256).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        let buf = AudioBuffer::new(samples, 8000, 1);
        assert_abs_diff_eq!(buf.rms(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn rms_between_ms_sees_only_the_requested_window() {
        // 100 ms loud then 100 ms silent
        let mut samples = vec![0.5; 800];
        samples.extend(vec![0.0; 800]);
        let buf = AudioBuffer::new(samples, 8000, 1);
        assert_abs_diff_eq!(buf.rms_between_ms(0, 100), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(buf.rms_between_ms(100, 200), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn slice_is_a_fresh_buffer_and_leaves_source_intact() {
        let buf = tone(0.5, 1000, 8000);
        let slice = buf.slice_between_ms(250, 500);
        assert_eq!(slice.frames(), 2000);
        assert_eq!(buf.frames(), 8000);
        assert_eq!(slice.sample_rate, 8000);
    }

    #[test]
    fn slice_clamps_to_buffer_bounds() {
        let buf = tone(0.5, 100, 8000);
        let slice = buf.slice_between_ms(50, 10_000);
        assert_eq!(slice.frames(), 400);
        assert!(buf.slice_between_ms(500, 600).is_empty());
    }

    #[test]
    fn concat_preserves_order_and_length() {
        let a = tone(0.1, 100, 8000);
        let b = tone(0.2, 50, 8000);
        let joined = concat_buffers(&[a, b]);
        assert_eq!(joined.frames(), 1200);
        assert_abs_diff_eq!(joined.samples[0], 0.1);
        assert_abs_diff_eq!(joined.samples[801], 0.2);
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        let joined = concat_buffers(&[]);
        assert!(joined.is_empty());
        assert_abs_diff_eq!(joined.duration_ms(), 0.0);
    }

    #[test]
    fn silent_buffer_is_zero_amplitude() {
        let buf = AudioBuffer::silent(500, 16_000, 2);
        assert_eq!(buf.frames(), 8000);
        assert_abs_diff_eq!(buf.peak(), 0.0);
    }

    #[test]
    fn ms_to_frame_handles_non_multiple_rates() {
        assert_eq!(ms_to_frame(1000, 44_100), 44_100);
        assert_eq!(ms_to_frame(1, 44_100), 44);
    }
}
