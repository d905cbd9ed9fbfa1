use super::*;

#[test]
fn length_is_width_times_height() {
    let buf = PixelBuffer::new(7, 3).unwrap();
    assert_eq!(buf.pixels().len(), 21);
    assert!(buf.pixels().iter().all(|&p| p == OPAQUE_BLACK));
    assert_eq!(buf.stride_bytes(), 28);
}

#[test]
fn zero_dimensions_are_rejected() {
    assert!(PixelBuffer::new(0, 4).is_err());
    assert!(PixelBuffer::new(4, 0).is_err());
}

#[test]
fn bgra_byte_order() {
    let buf = PixelBuffer::filled(1, 1, 0xFF11_2233).unwrap();
    assert_eq!(buf.as_bgra_bytes(), &[0x33, 0x22, 0x11, 0xFF]);
    assert_eq!(buf.to_rgba8(), vec![0x11, 0x22, 0x33, 0xFF]);
}

#[test]
fn opaque_packs_channels() {
    assert_eq!(opaque(0x848410), 0xFF84_8410);
    assert_eq!(opaque(0x12_345678), 0xFF34_5678);
    assert_eq!(opaque_rgb(0, 0, 247), 0xFF00_00F7);
}

#[test]
fn put_clips_outside_writes() {
    let mut buf = PixelBuffer::new(2, 2).unwrap();
    buf.put(-1, 0, OPAQUE_WHITE);
    buf.put(0, -1, OPAQUE_WHITE);
    buf.put(2, 0, OPAQUE_WHITE);
    buf.put(0, 2, OPAQUE_WHITE);
    assert!(buf.pixels().iter().all(|&p| p == OPAQUE_BLACK));

    buf.put(1, 1, OPAQUE_WHITE);
    assert_eq!(buf.get(1, 1), Some(OPAQUE_WHITE));
    assert_eq!(buf.get(2, 1), None);
}

#[test]
fn copy_requires_matching_size() {
    let src = PixelBuffer::filled(4, 4, 0xFF00_00FF).unwrap();
    let mut dst = PixelBuffer::new(4, 4).unwrap();
    dst.copy_from(&src).unwrap();
    assert_eq!(dst, src);

    let mut wrong = PixelBuffer::new(4, 5).unwrap();
    assert!(wrong.copy_from(&src).is_err());
}

#[test]
fn rotated_copy_wraps_around() {
    let mut src = PixelBuffer::new(4, 1).unwrap();
    src.pixels_mut().copy_from_slice(&[1, 2, 3, 4]);
    let mut dst = PixelBuffer::new(4, 1).unwrap();

    dst.copy_rotated_from(&src, 1).unwrap();
    assert_eq!(dst.pixels(), &[2, 3, 4, 1]);

    dst.copy_rotated_from(&src, 0).unwrap();
    assert_eq!(dst.pixels(), &[1, 2, 3, 4]);

    dst.copy_rotated_from(&src, 6).unwrap();
    assert_eq!(dst.pixels(), &[3, 4, 1, 2]);
}

#[test]
fn fill_columns_clips_at_right_edge() {
    let mut buf = PixelBuffer::new(5, 2).unwrap();
    buf.fill_columns(3, 16, OPAQUE_WHITE);
    for y in 0..2 {
        assert_eq!(buf.get(2, y), Some(OPAQUE_BLACK));
        assert_eq!(buf.get(3, y), Some(OPAQUE_WHITE));
        assert_eq!(buf.get(4, y), Some(OPAQUE_WHITE));
    }

    let before = buf.clone();
    buf.fill_columns(9, 16, 0xFF12_3456);
    assert_eq!(buf, before);
}
