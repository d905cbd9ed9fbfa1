use crate::assets::tone::ToneBuffer;
use crate::foundation::core::{Fps, FrameIndex, Timecode};
use crate::foundation::error::{TestcardError, TestcardResult};
use crate::render::buffer::PixelBuffer;
use std::time::{Duration, Instant};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Name the sink should advertise for this source.
    pub sender_name: String,
    /// Audio companion format, when audio is sent alongside video.
    pub audio: Option<AudioFormat>,
}

/// Audio stream parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// One composited video frame, borrowed from the generator's output buffer for the send call.
#[derive(Debug, Clone, Copy)]
pub struct VideoFrame<'a> {
    /// Monotonic frame index.
    pub index: FrameIndex,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes per row (`4 * width`).
    pub stride_bytes: usize,
    /// Frame rate numerator/denominator.
    pub fps: Fps,
    /// Synthesized timecode for this frame.
    pub timecode: Timecode,
    /// Always `true`: frames are progressive scan.
    pub progressive: bool,
    /// Picture aspect ratio (`width / height`).
    pub aspect_ratio: f32,
    /// Packed BGRA bytes, `stride_bytes * height` long.
    pub data: &'a [u8],
}

impl<'a> VideoFrame<'a> {
    /// Describe `buffer` as frame `index` at `fps`.
    pub fn from_buffer(buffer: &'a PixelBuffer, index: FrameIndex, fps: Fps) -> Self {
        Self {
            index,
            width: buffer.width(),
            height: buffer.height(),
            stride_bytes: buffer.stride_bytes(),
            fps,
            timecode: Timecode::for_frame(index, fps),
            progressive: true,
            aspect_ratio: buffer.canvas().aspect_ratio(),
            data: buffer.as_bgra_bytes(),
        }
    }
}

/// Planar `f32` audio block sent alongside a video frame.
#[derive(Debug, Clone, Copy)]
pub struct AudioFrame<'a> {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Samples in each channel plane.
    pub samples_per_channel: usize,
    /// Byte distance between channel planes.
    pub channel_stride_bytes: usize,
    /// Timecode shared with the accompanying video frame.
    pub timecode: Timecode,
    /// All channel planes back to back.
    pub data: &'a [f32],
}

impl<'a> AudioFrame<'a> {
    /// Borrow a precomputed tone as an audio block.
    pub fn from_tone(tone: &'a ToneBuffer, timecode: Timecode) -> Self {
        Self {
            sample_rate: tone.sample_rate(),
            channels: tone.channels(),
            samples_per_channel: tone.samples_per_channel(),
            channel_stride_bytes: tone.channel_stride_bytes(),
            timecode,
            data: tone.planar(),
        }
    }
}

/// Blocking acceptor of finished frames.
///
/// `push_frame` returns once the frame is accepted; its return is the signal that the next frame
/// may be built, so a sink that blocks until the next output slot paces the whole generator.
/// Returning [`TestcardError::SinkRejected`] drops a single frame without stopping the generator.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TestcardResult<()>;
    /// Hand over one frame.
    fn push_frame(&mut self, frame: &VideoFrame<'_>) -> TestcardResult<()>;
    /// Hand over the audio block that accompanies the last pushed frame.
    fn push_audio(&mut self, _audio: &AudioFrame<'_>) -> TestcardResult<()> {
        Ok(())
    }
    /// Called once after the last frame.
    fn end(&mut self) -> TestcardResult<()>;
}

/// Metadata of a frame captured by [`InMemorySink`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRecord {
    /// Frame index.
    pub index: FrameIndex,
    /// Frame timecode.
    pub timecode: Timecode,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row stride in bytes.
    pub stride_bytes: usize,
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    records: Vec<FrameRecord>,
    last_frame: Vec<u8>,
    audio_blocks: u64,
    ended: bool,
    reject_every: Option<u64>,
    rejected: u64,
}

impl InMemorySink {
    /// Create a sink that accepts every frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every `n`-th pushed frame (1-based).
    pub fn rejecting_every(n: u64) -> Self {
        Self {
            reject_every: Some(n.max(1)),
            ..Self::default()
        }
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Metadata of accepted frames in push order.
    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    /// Bytes of the last accepted frame.
    pub fn last_frame(&self) -> &[u8] {
        &self.last_frame
    }

    /// Audio blocks received.
    pub fn audio_blocks(&self) -> u64 {
        self.audio_blocks
    }

    /// Frames refused so far.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TestcardResult<()> {
        self.last_frame = vec![0; cfg.width as usize * cfg.height as usize * 4];
        self.cfg = Some(cfg);
        self.records.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &VideoFrame<'_>) -> TestcardResult<()> {
        if self.cfg.is_none() {
            return Err(TestcardError::sink("in-memory sink not started"));
        }
        let pushed = self.records.len() as u64 + self.rejected + 1;
        if let Some(n) = self.reject_every
            && pushed.is_multiple_of(n)
        {
            self.rejected += 1;
            return Err(TestcardError::sink_rejected(format!(
                "frame {} refused",
                frame.index.0
            )));
        }
        if frame.data.len() != self.last_frame.len() {
            return Err(TestcardError::validation(
                "frame data size mismatch with width*height*4",
            ));
        }
        self.last_frame.copy_from_slice(frame.data);
        self.records.push(FrameRecord {
            index: frame.index,
            timecode: frame.timecode,
            width: frame.width,
            height: frame.height,
            stride_bytes: frame.stride_bytes,
        });
        Ok(())
    }

    fn push_audio(&mut self, _audio: &AudioFrame<'_>) -> TestcardResult<()> {
        self.audio_blocks += 1;
        Ok(())
    }

    fn end(&mut self) -> TestcardResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Sink that discards frames but blocks until each frame's output slot, like a vsync-clocked
/// device. Useful for headless runs and for measuring render headroom.
#[derive(Debug, Default)]
pub struct PacedSink {
    frame_duration: Duration,
    next_deadline: Option<Instant>,
}

impl PacedSink {
    /// Create a paced sink; the rate is taken from the config passed to `begin`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for PacedSink {
    fn begin(&mut self, cfg: SinkConfig) -> TestcardResult<()> {
        self.frame_duration = cfg.fps.frame_duration();
        self.next_deadline = None;
        Ok(())
    }

    fn push_frame(&mut self, _frame: &VideoFrame<'_>) -> TestcardResult<()> {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        let next = deadline + self.frame_duration;
        // Fell more than a frame behind: resynchronize instead of bursting to catch up.
        self.next_deadline = Some(if next < now { now + self.frame_duration } else { next });
        Ok(())
    }

    fn end(&mut self) -> TestcardResult<()> {
        self.next_deadline = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
