//! Broadcast-style test signal generator.
//!
//! A [`SignalGenerator`] precomputes a set of background frames (blue ramp, color bars, noise or
//! blank), then on every tick copies one of them into a reused BGRA buffer, sweeps a white bar
//! across it, burns in a block of diagnostics text from a 1bpp bitmap font, and hands the frame to
//! a [`FrameSink`]. The sink's blocking `push_frame` paces the loop.
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod assets;
pub mod config;
pub mod encode;
pub mod metrics;
pub mod render;
pub mod session;

pub use animation::state::AnimationState;
pub use assets::font::FontAtlas;
pub use assets::tone::ToneBuffer;
pub use config::{AudioConfig, GeneratorConfig};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use encode::sink::{
    AudioFormat, AudioFrame, FrameRecord, FrameSink, InMemorySink, PacedSink, SinkConfig,
    VideoFrame,
};
pub use foundation::core::{Canvas, Fps, FrameIndex, Timecode};
pub use foundation::error::{TestcardError, TestcardResult};
pub use metrics::tracker::{MetricsTracker, StageTiming};
pub use render::background::{BackgroundFrameSet, BackgroundMode, SynthOpts};
pub use render::buffer::PixelBuffer;
pub use render::compositor::{CompositorOpts, Diagnostics, FrameCompositor};
pub use session::generator::{RunStats, SignalGenerator};
