use crate::assets::font::{FontAtlas, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::render::buffer::{OPAQUE_WHITE, PixelBuffer};

/// Stamp `text` in opaque white with its top-left corner at `(x, y)`.
///
/// Every character advances the pen by exactly [`GLYPH_WIDTH`] pixels. Characters outside the
/// atlas range are skipped but still consume their advance. Glyph pixels that land outside the
/// buffer are clipped; background pixels of a glyph cell are left untouched.
pub fn draw_text(buffer: &mut PixelBuffer, atlas: &FontAtlas, x: i64, y: i64, text: &str) {
    let w = i64::from(buffer.width());
    let h = i64::from(buffer.height());
    let gw = i64::from(GLYPH_WIDTH);
    let gh = i64::from(GLYPH_HEIGHT);

    if y >= h || y + gh <= 0 {
        return;
    }

    for (i, ch) in text.chars().enumerate() {
        let code = u32::from(ch);
        if FontAtlas::glyph_index(code).is_none() {
            continue;
        }
        let cell_x = x + gw * i as i64;
        if cell_x >= w {
            break;
        }
        if cell_x + gw <= 0 {
            continue;
        }
        for ly in 0..GLYPH_HEIGHT {
            for lx in 0..GLYPH_WIDTH {
                if atlas.is_glyph_pixel_set(code, lx, ly) {
                    buffer.put(cell_x + i64::from(lx), y + i64::from(ly), OPAQUE_WHITE);
                }
            }
        }
    }
}

/// Pixel width covered by `text` at the fixed advance.
pub fn text_width(text: &str) -> u32 {
    (text.chars().count() as u32).saturating_mul(GLYPH_WIDTH)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
