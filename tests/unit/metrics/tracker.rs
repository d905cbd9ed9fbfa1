use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn average_halves_toward_latest_sample() {
    let mut t = StageTiming::default();
    t.record(ms(8));
    assert_eq!(t.avg(), ms(8));
    t.record(ms(4));
    assert_eq!(t.avg(), ms(6));
    t.record(ms(2));
    assert_eq!(t.avg(), ms(4));
    assert_eq!(t.last(), ms(2));
    assert_eq!(t.samples(), 3);
}

#[test]
fn max_is_a_high_water_mark() {
    let mut m = MetricsTracker::new(Instant::now());
    m.record_render(ms(5));
    m.record_render(ms(12));
    m.record_render(ms(3));
    assert_eq!(m.render().max(), ms(12));

    m.record_send(ms(16));
    m.record_send(ms(1));
    assert_eq!(m.send().max(), ms(16));
    assert_eq!(m.send().last(), ms(1));
}

#[test]
fn fps_window_rolls_at_one_second() {
    let t0 = Instant::now();
    let mut m = MetricsTracker::new(t0);
    for i in 0..29u64 {
        assert!(!m.record_frame_sent(t0 + ms(i * 33)));
    }
    assert_eq!(m.fps(), 0);

    assert!(m.record_frame_sent(t0 + ms(1000)));
    assert_eq!(m.fps(), 30);
    assert_eq!(m.frames_sent(), 30);

    // New window starts at the roll instant.
    assert!(!m.record_frame_sent(t0 + ms(1999)));
    assert!(m.record_frame_sent(t0 + ms(2000)));
    assert_eq!(m.fps(), 2);
}
