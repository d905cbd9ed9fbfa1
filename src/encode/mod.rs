//! Frame sinks.
//!
//! Sinks accept finished frames one tick at a time; a blocking `push_frame` paces the generator.

/// `ffmpeg`-based sink (file or streaming URL output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
