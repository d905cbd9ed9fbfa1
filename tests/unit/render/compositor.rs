use super::*;
use crate::render::background::SynthOpts;
use std::time::Instant;

#[path = "../../support/bmp.rs"]
mod bmp;

fn atlas() -> FontAtlas {
    FontAtlas::from_bmp_bytes(&bmp::atlas_bmp()).unwrap()
}

fn diag<'a>(metrics: &'a MetricsTracker, frame: u64) -> Diagnostics<'a> {
    Diagnostics {
        utc: Utc::now(),
        frame,
        machine_name: "host",
        sender_name: "sender",
        metrics,
    }
}

fn blue_set(width: u32, height: u32) -> BackgroundFrameSet {
    let opts = SynthOpts {
        blue_frames: 4,
        ..SynthOpts::default()
    };
    BackgroundFrameSet::synthesize(width, height, BackgroundMode::Blue, &opts).unwrap()
}

#[test]
fn copies_background_selected_by_animation() {
    let atlas = atlas();
    let set = blue_set(400, 260);
    let metrics = MetricsTracker::new(Instant::now());
    let mut comp = FrameCompositor::new(CompositorOpts::default());
    let mut out = PixelBuffer::new(400, 260).unwrap();

    let mut anim = AnimationState::new(400, set.len());
    for _ in 0..20 {
        anim.advance();
    }
    assert_eq!(anim.bg_index(), 2);
    comp.compose(&mut out, &set, &anim, &atlas, &diag(&metrics, 20))
        .unwrap();

    let bg = set.get(2).unwrap();
    // Below the diagnostics block the frame is pure background.
    let below = (TEXT_Y + 11 * 16) as u32;
    for y in below..260 {
        for x in 0..400 {
            assert_eq!(out.get(x, y), bg.get(x, y));
        }
    }
}

#[test]
fn bar_spans_every_row_when_enabled() {
    let atlas = atlas();
    let set = blue_set(300, 240);
    let metrics = MetricsTracker::new(Instant::now());
    let mut anim = AnimationState::new(300, set.len());
    for _ in 0..250 {
        anim.advance();
    }
    let x = anim.bar_x();

    let mut comp = FrameCompositor::new(CompositorOpts {
        white_bar: true,
        ..CompositorOpts::default()
    });
    let mut out = PixelBuffer::new(300, 240).unwrap();
    comp.compose(&mut out, &set, &anim, &atlas, &diag(&metrics, 250))
        .unwrap();
    for y in 0..240 {
        for dx in 0..BAR_WIDTH {
            assert_eq!(out.get(x + dx, y), Some(OPAQUE_WHITE));
        }
    }

    let mut plain = FrameCompositor::new(CompositorOpts::default());
    plain
        .compose(&mut out, &set, &anim, &atlas, &diag(&metrics, 250))
        .unwrap();
    assert_ne!(out.get(x, 239), Some(OPAQUE_WHITE));
}

#[test]
fn diagnostics_text_is_drawn_over_background() {
    let atlas = atlas();
    let set = blue_set(400, 240);
    let metrics = MetricsTracker::new(Instant::now());
    let anim = AnimationState::new(400, set.len());
    let mut comp = FrameCompositor::new(CompositorOpts::default());
    let mut out = PixelBuffer::new(400, 240).unwrap();
    comp.compose(&mut out, &set, &anim, &atlas, &diag(&metrics, 5))
        .unwrap();

    let mut expected = set.get(0).unwrap().clone();
    draw_text(&mut expected, &atlas, TEXT_X, TEXT_Y + 16, "Frame 5");
    draw_text(&mut expected, &atlas, TEXT_X, TEXT_Y + 48, "Sender Name: sender");
    for y in (TEXT_Y + 16) as u32..(TEXT_Y + 32) as u32 {
        for x in 0..400 {
            assert_eq!(out.get(x, y), expected.get(x, y), "frame line ({x},{y})");
        }
    }
    for y in (TEXT_Y + 48) as u32..(TEXT_Y + 64) as u32 {
        for x in 0..400 {
            assert_eq!(out.get(x, y), expected.get(x, y), "sender line ({x},{y})");
        }
    }
}

#[test]
fn text_stays_on_top_of_bar() {
    let atlas = atlas();
    let set = BackgroundFrameSet::synthesize(200, 120, BackgroundMode::Blank, &SynthOpts::default())
        .unwrap();
    let metrics = MetricsTracker::new(Instant::now());
    let anim = AnimationState::new(200, set.len());
    let mut comp = FrameCompositor::new(CompositorOpts {
        white_bar: true,
        ..CompositorOpts::default()
    });
    let mut out = PixelBuffer::new(200, 120).unwrap();
    comp.compose(&mut out, &set, &anim, &atlas, &diag(&metrics, 1))
        .unwrap();

    // Every glyph pixel of the frame line is white regardless of what lies beneath.
    for (i, ch) in "Frame 1".chars().enumerate() {
        for ly in 0..16u32 {
            for lx in 0..16u32 {
                if atlas.is_glyph_pixel_set(u32::from(ch), lx, ly) {
                    let x = TEXT_X as u32 + 16 * i as u32 + lx;
                    let y = TEXT_Y as u32 + 16 + ly;
                    assert_eq!(out.get(x, y), Some(OPAQUE_WHITE));
                }
            }
        }
    }
}

#[test]
fn noise_jitter_rotates_the_selected_frame() {
    let atlas = atlas();
    let opts = SynthOpts {
        noise_frames: 2,
        noise_seed: Some(3),
        ..SynthOpts::default()
    };
    let set = BackgroundFrameSet::synthesize(64, 300, BackgroundMode::Noise, &opts).unwrap();
    let metrics = MetricsTracker::new(Instant::now());
    let anim = AnimationState::new(64, set.len());

    let copts = CompositorOpts::default();
    let mut comp = FrameCompositor::new(copts);
    let mut out = PixelBuffer::new(64, 300).unwrap();
    comp.compose(&mut out, &set, &anim, &atlas, &diag(&metrics, 0))
        .unwrap();

    let offset = Xorshift32::new(copts.jitter_seed).next_u32() as usize;
    let mut expected = PixelBuffer::new(64, 300).unwrap();
    expected
        .copy_rotated_from(set.get(0).unwrap(), offset)
        .unwrap();
    let from_row = (TEXT_Y + 11 * 16) as u32;
    for y in from_row..300 {
        for x in 0..64 {
            assert_eq!(out.get(x, y), expected.get(x, y));
        }
    }
}

#[test]
fn empty_background_set_composes_black() {
    let atlas = atlas();
    let opts = SynthOpts {
        blue_frames: 0,
        ..SynthOpts::default()
    };
    let set = BackgroundFrameSet::synthesize(50, 250, BackgroundMode::Blue, &opts).unwrap();
    assert!(set.is_empty());
    let metrics = MetricsTracker::new(Instant::now());
    let anim = AnimationState::new(50, set.len());
    let mut comp = FrameCompositor::new(CompositorOpts::default());
    let mut out = PixelBuffer::filled(50, 250, 0xFF12_3456).unwrap();
    comp.compose(&mut out, &set, &anim, &atlas, &diag(&metrics, 0))
        .unwrap();
    assert_eq!(out.get(10, 249), Some(OPAQUE_BLACK));
}

#[test]
fn mismatched_background_size_is_an_error() {
    let atlas = atlas();
    let set = blue_set(64, 64);
    let metrics = MetricsTracker::new(Instant::now());
    let anim = AnimationState::new(64, set.len());
    let mut comp = FrameCompositor::new(CompositorOpts::default());
    let mut out = PixelBuffer::new(32, 64).unwrap();
    assert!(
        comp.compose(&mut out, &set, &anim, &atlas, &diag(&metrics, 0))
            .is_err()
    );
}
