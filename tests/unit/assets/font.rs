use super::*;

#[path = "../../support/bmp.rs"]
mod bmp;

fn atlas() -> FontAtlas {
    FontAtlas::from_bmp_bytes(&bmp::atlas_bmp()).unwrap()
}

#[test]
fn parses_dimensions_and_flips_rows() {
    // Only the top-left pixel is set; stored bottom-up it lives in the last file row.
    let bytes = bmp::encode_1bpp_bmp(20, 3, |x, y| x == 0 && y == 0);
    let atlas = FontAtlas::from_bmp_bytes(&bytes).unwrap();
    assert_eq!(atlas.width(), 20);
    assert_eq!(atlas.height(), 3);
    assert_eq!(atlas.pixels[0], 1);
    assert_eq!(atlas.pixels.iter().filter(|&&p| p == 1).count(), 1);
}

#[test]
fn glyph_cells_match_source_bitmap() {
    let atlas = atlas();
    for code in [32u32, 65, 90, 126, 127] {
        for y in 0..GLYPH_HEIGHT {
            for x in 0..GLYPH_WIDTH {
                assert_eq!(
                    atlas.is_glyph_pixel_set(code, x, y),
                    bmp::glyph_pattern(code, x, y),
                    "code {code} at ({x},{y})"
                );
            }
        }
    }
}

#[test]
fn out_of_range_codes_are_blank() {
    let atlas = atlas();
    assert_eq!(FontAtlas::glyph_index(31), None);
    assert_eq!(FontAtlas::glyph_index(128), None);
    assert_eq!(FontAtlas::glyph_index(65), Some(33));
    for y in 0..GLYPH_HEIGHT {
        for x in 0..GLYPH_WIDTH {
            assert!(!atlas.is_glyph_pixel_set(10, x, y));
            assert!(!atlas.is_glyph_pixel_set(200, x, y));
        }
    }
    assert!(!atlas.is_glyph_pixel_set(65, 16, 0));
}

#[test]
fn short_atlas_reads_missing_cells_as_blank() {
    // One row of cells: only codes 32..=47 exist.
    let bytes = bmp::encode_1bpp_bmp(256, 16, |_, _| true);
    let atlas = FontAtlas::from_bmp_bytes(&bytes).unwrap();
    assert!(atlas.is_glyph_pixel_set(40, 3, 3));
    assert!(!atlas.is_glyph_pixel_set(65, 3, 3));
}

#[test]
fn rejects_non_positive_dimensions() {
    let mut bytes = bmp::encode_1bpp_bmp(16, 16, |_, _| false);
    bytes[18..22].copy_from_slice(&0i32.to_le_bytes());
    assert!(matches!(
        FontAtlas::from_bmp_bytes(&bytes),
        Err(TestcardError::FontParse(_))
    ));

    let mut bytes = bmp::encode_1bpp_bmp(16, 16, |_, _| false);
    bytes[22..26].copy_from_slice(&(-16i32).to_le_bytes());
    assert!(matches!(
        FontAtlas::from_bmp_bytes(&bytes),
        Err(TestcardError::FontParse(_))
    ));
}

#[test]
fn rejects_truncated_data() {
    let bytes = bmp::encode_1bpp_bmp(16, 16, |_, _| true);
    let truncated = &bytes[..bytes.len() - 8];
    assert!(matches!(
        FontAtlas::from_bmp_bytes(truncated),
        Err(TestcardError::FontParse(_))
    ));

    let mut bad_offset = bytes.clone();
    bad_offset[10..14].copy_from_slice(&10_000i32.to_le_bytes());
    assert!(FontAtlas::from_bmp_bytes(&bad_offset).is_err());

    assert!(FontAtlas::from_bmp_bytes(&bytes[..20]).is_err());
}

#[test]
fn missing_file_is_a_font_error() {
    let err = FontAtlas::from_path(Path::new("target/does-not-exist/font.bmp")).unwrap_err();
    assert!(err.to_string().contains("font parse error:"));
}
