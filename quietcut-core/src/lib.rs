//! # quietcut-core
//!
//! Silence-condensing audio engine SDK.
//!
//! ## Architecture
//!
//! ```text
//! decoded AudioBuffer → AmplitudeAnalyzer (threshold)
//!                            │
//!                      SilenceSegmenter → [Segment]
//!                            │
//!                      ChunkProcessor (normalize + pad, per segment)
//!                            │
//!                      Reassembler → output AudioBuffer
//! ```
//!
//! The pipeline is synchronous and allocation-per-stage: every stage consumes
//! its input buffer by value and produces a freshly allocated output, so no
//! locking is needed anywhere. Container decode/encode lives in the shell
//! crate (`quietcut-app`) — the core only ever sees decoded PCM.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod analysis;
pub mod buffer;
pub mod engine;
pub mod error;
pub mod processor;
pub mod reassembler;
pub mod segmenter;

// Convenience re-exports for downstream crates
pub use buffer::AudioBuffer;
pub use engine::{Pipeline, PipelineConfig, PipelineOutcome};
pub use error::QuietcutError;
pub use segmenter::Segment;
