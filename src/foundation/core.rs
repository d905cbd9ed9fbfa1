use crate::foundation::error::{TestcardError, TestcardResult};

/// Monotonic 0-based index of an emitted frame.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> TestcardResult<Self> {
        if den == 0 {
            return Err(TestcardError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TestcardError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame.
    pub fn frame_duration(self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(f64::from(self.den) / f64::from(self.num))
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with both dimensions non-zero.
    pub fn new(width: u32, height: u32) -> TestcardResult<Self> {
        if width == 0 || height == 0 {
            return Err(TestcardError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels covered by the canvas.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Display aspect ratio assuming square pixels.
    pub fn aspect_ratio(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Synthesized timecode in 100ns ticks, derived from the frame index and rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timecode(pub i64);

impl Timecode {
    /// Ticks per second.
    pub const TICKS_PER_SEC: i64 = 10_000_000;

    /// Timecode of the start of frame `idx` at `fps`.
    pub fn for_frame(idx: FrameIndex, fps: Fps) -> Self {
        let ticks = i128::from(idx.0) * i128::from(Self::TICKS_PER_SEC) * i128::from(fps.den)
            / i128::from(fps.num.max(1));
        Self(i64::try_from(ticks).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
