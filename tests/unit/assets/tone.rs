use super::*;

#[test]
fn layout_is_planar_with_twenty_cycles() {
    let tone = ToneBuffer::new(48_000, 2, 1_000).unwrap();
    assert_eq!(tone.samples_per_channel(), 48 * TONE_CYCLES);
    assert_eq!(tone.planar().len(), 2 * 48 * TONE_CYCLES);
    assert_eq!(tone.channel_stride_bytes(), 4 * 48 * TONE_CYCLES);
    assert_eq!(tone.channel(0), tone.channel(1));
    assert!(tone.channel(2).is_none());
}

#[test]
fn waveform_is_a_sine_period() {
    let tone = ToneBuffer::new(48_000, 1, 1_000).unwrap();
    let ch = tone.channel(0).unwrap();
    assert!(ch[0].abs() < 1e-6);
    assert!((ch[12] - 1.0).abs() < 1e-6);
    assert!((ch[36] + 1.0).abs() < 1e-6);
    // Period repeats exactly.
    assert_eq!(ch[5], ch[5 + 48]);
}

#[test]
fn interleaves_channels() {
    let tone = ToneBuffer::new(8, 2, 2).unwrap();
    let inter = tone.interleaved();
    let left = tone.channel(0).unwrap();
    assert_eq!(inter.len(), tone.planar().len());
    for i in 0..tone.samples_per_channel() {
        assert_eq!(inter[2 * i], left[i]);
        assert_eq!(inter[2 * i + 1], left[i]);
    }
}

#[test]
fn rejects_degenerate_parameters() {
    assert!(ToneBuffer::new(0, 2, 1_000).is_err());
    assert!(ToneBuffer::new(48_000, 0, 1_000).is_err());
    assert!(ToneBuffer::new(48_000, 2, 0).is_err());
    assert!(ToneBuffer::new(1_000, 2, 48_000).is_err());
}
