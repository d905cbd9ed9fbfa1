//! Precomputed background frames.
//!
//! Everything here runs once before the real-time loop; per-tick work is limited to copying one of
//! these frames into the output buffer.

use crate::foundation::error::TestcardResult;
use crate::render::buffer::{OPAQUE_BLACK, PixelBuffer, opaque, opaque_rgb};
use rand::{RngCore as _, SeedableRng as _};
use std::fmt;
use std::time::Instant;

/// SMPTE-style top band swatches, left to right (`0xRRGGBB`).
pub const TOP_SWATCHES: [u32; 7] = [
    0x848484, 0x848410, 0x108484, 0x108410, 0x841084, 0x841010, 0x101084,
];

/// Middle band swatches, left to right (`0xRRGGBB`).
pub const MID_SWATCHES: [u32; 7] = [
    0x101084, 0x101010, 0x841084, 0x101010, 0x108484, 0x101010, 0x848484,
];

/// Bottom band swatches for the first 15 of 18 segments (`0xRRGGBB`).
pub const BOTTOM_SWATCHES: [u32; 15] = [
    0x10466A, 0x10466A, 0x10466A, 0xEBEBEB, 0xEBEBEB, 0xEBEBEB, 0x481076, 0x481076, 0x481076,
    0x101010, 0x101010, 0x101010, 0x000000, 0x101010, 0x1A1A1A,
];

/// Bottom band swatch for segments past [`BOTTOM_SWATCHES`].
pub const BOTTOM_DEFAULT_SWATCH: u32 = 0x101010;

/// Segments across the bottom band.
pub const BOTTOM_SEGMENTS: u32 = 18;

/// Background pattern selection.
///
/// Serialized as its lowercase name; unknown names deserialize to [`BackgroundMode::Blank`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackgroundMode {
    /// Solid blue frames ramping from black to near full blue.
    #[default]
    Blue,
    /// Single SMPTE-style color-bar frame.
    ColorBar,
    /// Precomputed uniform random RGB frames.
    Noise,
    /// Single opaque black frame. Used for unrecognized mode names.
    Blank,
}

impl BackgroundMode {
    /// Parse a mode name. Unknown names degrade to [`BackgroundMode::Blank`] instead of failing.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "blue" => Self::Blue,
            "colorbar" | "colorbars" => Self::ColorBar,
            "noise" => Self::Noise,
            "blank" => Self::Blank,
            other => {
                tracing::warn!(mode = other, "unknown background mode, using blank background");
                Self::Blank
            }
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::ColorBar => "colorbar",
            Self::Noise => "noise",
            Self::Blank => "blank",
        }
    }
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for BackgroundMode {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<BackgroundMode> for String {
    fn from(value: BackgroundMode) -> Self {
        value.name().to_string()
    }
}

/// Frame counts and seeding for background synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthOpts {
    /// Frames in the blue brightness ramp.
    pub blue_frames: usize,
    /// Precomputed noise frames.
    pub noise_frames: usize,
    /// Fixed noise seed; `None` seeds from OS entropy.
    pub noise_seed: Option<u64>,
}

impl Default for SynthOpts {
    fn default() -> Self {
        Self {
            blue_frames: 32,
            noise_frames: 8,
            noise_seed: None,
        }
    }
}

/// Ordered, immutable set of full-resolution background frames.
#[derive(Clone, Debug)]
pub struct BackgroundFrameSet {
    mode: BackgroundMode,
    frames: Vec<PixelBuffer>,
}

impl BackgroundFrameSet {
    /// Synthesize every frame for `mode` at `width x height`.
    #[tracing::instrument(skip(opts))]
    pub fn synthesize(
        width: u32,
        height: u32,
        mode: BackgroundMode,
        opts: &SynthOpts,
    ) -> TestcardResult<Self> {
        let started = Instant::now();
        let frames = match mode {
            BackgroundMode::Blue => blue_ramp(width, height, opts.blue_frames)?,
            BackgroundMode::ColorBar => vec![color_bars(width, height)?],
            BackgroundMode::Noise => {
                let mut rng = match opts.noise_seed {
                    Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
                    None => rand::rngs::StdRng::from_entropy(),
                };
                noise(width, height, opts.noise_frames, &mut rng)?
            }
            BackgroundMode::Blank => vec![PixelBuffer::filled(width, height, OPAQUE_BLACK)?],
        };
        tracing::debug!(
            frames = frames.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "background frames synthesized"
        );
        Ok(Self { mode, frames })
    }

    /// Mode the set was built for.
    pub fn mode(&self) -> BackgroundMode {
        self.mode
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when the set holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `idx`.
    pub fn get(&self, idx: usize) -> Option<&PixelBuffer> {
        self.frames.get(idx)
    }

    /// All frames in order.
    pub fn frames(&self) -> &[PixelBuffer] {
        &self.frames
    }
}

/// `count` solid frames; frame `i` is blue level `255 * i / count`.
pub fn blue_ramp(width: u32, height: u32, count: usize) -> TestcardResult<Vec<PixelBuffer>> {
    (0..count)
        .map(|i| {
            let b = (255 * i / count) as u8;
            PixelBuffer::filled(width, height, opaque_rgb(0, 0, b))
        })
        .collect()
}

/// One color-bar frame: top band up to `2H/3`, a short middle band, then the bottom band.
pub fn color_bars(width: u32, height: u32) -> TestcardResult<PixelBuffer> {
    let mut frame = PixelBuffer::new(width, height)?;

    let seventh = width.div_ceil(7);
    let top = column_lookup(width, seventh, &TOP_SWATCHES, TOP_SWATCHES[6]);
    let mid = column_lookup(width, seventh, &MID_SWATCHES, MID_SWATCHES[6]);
    let bottom = column_lookup(
        width,
        width.div_ceil(BOTTOM_SEGMENTS),
        &BOTTOM_SWATCHES,
        BOTTOM_DEFAULT_SWATCH,
    );

    let third = height / 3;
    let top_end = third * 2;
    let mid_end = top_end + (f64::from(third) * 0.25) as u32;

    for (y, row) in frame
        .pixels_mut()
        .chunks_exact_mut(width as usize)
        .enumerate()
    {
        let y = y as u32;
        let lookup = if y <= top_end {
            &top
        } else if y <= mid_end {
            &mid
        } else {
            &bottom
        };
        row.copy_from_slice(lookup);
    }
    Ok(frame)
}

/// Per-column color table: column `i` takes `table[i / segment_width]`, or `default` past the end.
pub(crate) fn column_lookup(width: u32, segment_width: u32, table: &[u32], default: u32) -> Vec<u32> {
    let segment_width = segment_width.max(1);
    // Boundary column `k * segment_width` already takes swatch `k`.
    (0..width)
        .map(|i| {
            let rgb = table
                .get((i / segment_width) as usize)
                .copied()
                .unwrap_or(default);
            opaque(rgb)
        })
        .collect()
}

/// `count` frames of independent uniform 24-bit RGB per pixel, alpha forced opaque.
pub fn noise(
    width: u32,
    height: u32,
    count: usize,
    rng: &mut impl rand::RngCore,
) -> TestcardResult<Vec<PixelBuffer>> {
    (0..count)
        .map(|_| {
            let mut frame = PixelBuffer::new(width, height)?;
            rng.fill_bytes(bytemuck::cast_slice_mut(frame.pixels_mut()));
            for px in frame.pixels_mut() {
                *px |= OPAQUE_BLACK;
            }
            Ok(frame)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
