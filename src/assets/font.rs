use crate::foundation::error::{TestcardError, TestcardResult};
use std::path::Path;

/// Width of one glyph cell in pixels. Also the fixed horizontal text advance.
pub const GLYPH_WIDTH: u32 = 16;
/// Height of one glyph cell in pixels.
pub const GLYPH_HEIGHT: u32 = 16;
/// Glyph cells per atlas row.
pub const GLYPHS_PER_ROW: u32 = 16;
/// First printable code in the atlas (glyph index 0).
pub const FIRST_CODE: u32 = 32;
/// Last code the atlas covers.
pub const LAST_CODE: u32 = 127;

const PIXEL_DATA_OFFSET_AT: usize = 10;
const WIDTH_AT: usize = 18;
const HEIGHT_AT: usize = 22;

/// 1-bit glyph atlas decoded into one byte (`0` or `1`) per source pixel, rows top-down.
///
/// Immutable after construction and shared read-only by every text draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontAtlas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FontAtlas {
    /// Load and parse a 1bpp bitmap font from disk.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> TestcardResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            TestcardError::font_parse(format!("read font bitmap '{}': {e}", path.display()))
        })?;
        let atlas = Self::from_bmp_bytes(&bytes)?;
        tracing::debug!(
            width = atlas.width,
            height = atlas.height,
            "font atlas loaded"
        );
        Ok(atlas)
    }

    /// Parse a packed 1-bit-per-pixel bitmap container.
    ///
    /// Only the pixel-data offset, width and height header fields are read. Rows are stored
    /// bottom-up with a stride of `ceil(width / 8)` bytes padded to a multiple of 4; the most
    /// significant bit of each byte is the leftmost pixel.
    pub fn from_bmp_bytes(bytes: &[u8]) -> TestcardResult<Self> {
        let data_offset = read_i32_le(bytes, PIXEL_DATA_OFFSET_AT, "pixel data offset")?;
        let width = read_i32_le(bytes, WIDTH_AT, "width")?;
        let height = read_i32_le(bytes, HEIGHT_AT, "height")?;

        if width <= 0 || height <= 0 {
            return Err(TestcardError::font_parse(format!(
                "declared dimensions must be positive, got {width}x{height}"
            )));
        }
        if data_offset < 0 {
            return Err(TestcardError::font_parse(format!(
                "pixel data offset must be non-negative, got {data_offset}"
            )));
        }

        let width = width as usize;
        let height = height as usize;
        let data_offset = data_offset as usize;
        let row_bytes = width.div_ceil(8);
        let stride = (row_bytes + 3) & !3;

        let data_end = stride
            .checked_mul(height)
            .and_then(|n| n.checked_add(data_offset))
            .ok_or_else(|| TestcardError::font_parse("pixel data size overflows"))?;
        // The final row does not need its padding bytes present.
        let needed = data_end - (stride - row_bytes);
        if needed > bytes.len() {
            return Err(TestcardError::font_parse(format!(
                "pixel data runs past end of buffer ({needed} > {} bytes)",
                bytes.len()
            )));
        }

        let mut pixels = vec![0u8; width * height];
        for src_y in 0..height {
            let row = &bytes[data_offset + src_y * stride..][..row_bytes];
            let dst_row = &mut pixels[(height - 1 - src_y) * width..][..width];
            for (x, dst) in dst_row.iter_mut().enumerate() {
                *dst = (row[x / 8] >> (7 - (x % 8))) & 1;
            }
        }

        Ok(Self {
            width: width as u32,
            height: height as u32,
            pixels,
        })
    }

    /// Atlas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Atlas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Glyph cell index for `code`, or `None` when the code is outside `[32, 127]`.
    #[inline]
    pub fn glyph_index(code: u32) -> Option<u32> {
        if (FIRST_CODE..=LAST_CODE).contains(&code) {
            Some(code - FIRST_CODE)
        } else {
            None
        }
    }

    /// Whether pixel `(local_x, local_y)` of the glyph for `code` is foreground.
    ///
    /// Codes outside `[32, 127]`, coordinates outside the 16x16 cell, and cells that fall
    /// outside a short atlas all read as blank.
    #[inline]
    pub fn is_glyph_pixel_set(&self, code: u32, local_x: u32, local_y: u32) -> bool {
        let Some(glyph) = Self::glyph_index(code) else {
            return false;
        };
        if local_x >= GLYPH_WIDTH || local_y >= GLYPH_HEIGHT {
            return false;
        }
        let ax = (glyph % GLYPHS_PER_ROW) * GLYPH_WIDTH + local_x;
        let ay = (glyph / GLYPHS_PER_ROW) * GLYPH_HEIGHT + local_y;
        if ax >= self.width || ay >= self.height {
            return false;
        }
        self.pixels[ay as usize * self.width as usize + ax as usize] == 1
    }
}

fn read_i32_le(bytes: &[u8], at: usize, field: &str) -> TestcardResult<i32> {
    let raw = bytes
        .get(at..at + 4)
        .ok_or_else(|| TestcardError::font_parse(format!("header truncated before {field}")))?;
    Ok(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
