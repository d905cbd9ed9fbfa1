use crate::foundation::core::Canvas;
use crate::foundation::error::{TestcardError, TestcardResult};

// Pixels are stored as native `u32` words and handed to sinks as raw bytes, so the in-memory
// byte order of `0xAARRGGBB` is B,G,R,A only on little-endian targets.
#[cfg(target_endian = "big")]
compile_error!("testcard emits BGRA by reinterpreting 0xAARRGGBB words; big-endian is unsupported");

/// Opaque white, used for the moving bar and diagnostic text.
pub const OPAQUE_WHITE: u32 = 0xFFFF_FFFF;

/// Opaque black.
pub const OPAQUE_BLACK: u32 = 0xFF00_0000;

/// Pack a `0xRRGGBB` value into an opaque `0xAARRGGBB` word.
#[inline]
pub const fn opaque(rgb: u32) -> u32 {
    0xFF00_0000 | (rgb & 0x00FF_FFFF)
}

/// Pack 8-bit channels into an opaque `0xAARRGGBB` word.
#[inline]
pub const fn opaque_rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Fixed-size frame of packed `0xAARRGGBB` pixels, row-major, origin top-left.
///
/// The pixel vector is allocated once and never resized: `pixels().len() == width * height`
/// holds for the whole lifetime of the buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Allocate an opaque black buffer.
    pub fn new(width: u32, height: u32) -> TestcardResult<Self> {
        Self::filled(width, height, OPAQUE_BLACK)
    }

    /// Allocate a buffer filled with `color`.
    pub fn filled(width: u32, height: u32, color: u32) -> TestcardResult<Self> {
        let canvas = Canvas::new(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![color; canvas.pixel_count()],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Canvas dimensions of this buffer.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Row stride in bytes (`4 * width`).
    pub fn stride_bytes(&self) -> usize {
        self.width as usize * 4
    }

    /// Borrow all pixels.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Mutably borrow all pixels. The slice length is fixed.
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.offset(x, y)])
    }

    /// Write a pixel. Writes outside the buffer are dropped.
    #[inline]
    pub fn put(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = self.offset(x as u32, y as u32);
        self.pixels[idx] = color;
    }

    /// Fill every pixel with `color`.
    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Overwrite this buffer with `src`. Both buffers must share dimensions.
    pub fn copy_from(&mut self, src: &PixelBuffer) -> TestcardResult<()> {
        self.ensure_same_canvas(src)?;
        self.pixels.copy_from_slice(&src.pixels);
        Ok(())
    }

    /// Overwrite this buffer with `src` read starting at pixel `offset` and wrapping around.
    ///
    /// Costs the same as [`PixelBuffer::copy_from`]: two contiguous slice copies.
    pub fn copy_rotated_from(&mut self, src: &PixelBuffer, offset: usize) -> TestcardResult<()> {
        self.ensure_same_canvas(src)?;
        let len = self.pixels.len();
        let split = offset % len;
        let (head, tail) = self.pixels.split_at_mut(len - split);
        head.copy_from_slice(&src.pixels[split..]);
        tail.copy_from_slice(&src.pixels[..split]);
        Ok(())
    }

    /// Paint a full-height vertical strip `[x, x + strip_width)`, clipped to the buffer.
    pub fn fill_columns(&mut self, x: u32, strip_width: u32, color: u32) {
        let start = (x.min(self.width)) as usize;
        let end = (x.saturating_add(strip_width).min(self.width)) as usize;
        if start >= end {
            return;
        }
        for row in self.pixels.chunks_exact_mut(self.width as usize) {
            row[start..end].fill(color);
        }
    }

    /// Raw bytes in B,G,R,A order, as expected by frame sinks.
    pub fn as_bgra_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Copy out straight RGBA8 bytes (for PNG snapshots).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &px in &self.pixels {
            let [a, r, g, b] = px.to_be_bytes();
            out.extend_from_slice(&[r, g, b, a]);
        }
        out
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn ensure_same_canvas(&self, other: &PixelBuffer) -> TestcardResult<()> {
        if self.width != other.width || self.height != other.height {
            return Err(TestcardError::validation(format!(
                "pixel buffer size mismatch: got {}x{}, expected {}x{}",
                other.width, other.height, self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffer.rs"]
mod tests;
