use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = GeneratorConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas(), Canvas { width: 1920, height: 1080 });
    assert_eq!(cfg.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.mode, BackgroundMode::Blue);
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{ "width": 1280, "height": 720, "mode": "colorbar", "white_bar": true }"#;
    let cfg = GeneratorConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.width, 1280);
    assert_eq!(cfg.mode, BackgroundMode::ColorBar);
    assert!(cfg.white_bar);
    assert_eq!(cfg.blue_frames, 32);
    assert!(cfg.audio.enabled);
}

#[test]
fn unknown_mode_degrades_to_blank() {
    let cfg = GeneratorConfig::from_reader(r#"{ "mode": "zebra" }"#.as_bytes()).unwrap();
    assert_eq!(cfg.mode, BackgroundMode::Blank);
    cfg.validate().unwrap();
}

#[test]
fn unknown_fields_are_rejected() {
    let err = GeneratorConfig::from_reader(r#"{ "widht": 10 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn validation_catches_bad_values() {
    let bad = [
        GeneratorConfig {
            width: 0,
            ..GeneratorConfig::default()
        },
        GeneratorConfig {
            fps: Fps { num: 30, den: 0 },
            ..GeneratorConfig::default()
        },
        GeneratorConfig {
            name: "  ".to_string(),
            ..GeneratorConfig::default()
        },
        GeneratorConfig {
            blue_frames: 0,
            ..GeneratorConfig::default()
        },
        GeneratorConfig {
            audio: AudioConfig {
                frequency_hz: 96_000,
                ..AudioConfig::default()
            },
            ..GeneratorConfig::default()
        },
    ];
    for cfg in bad {
        assert!(cfg.validate().is_err(), "{cfg:?}");
    }

    let silent = GeneratorConfig {
        audio: AudioConfig {
            enabled: false,
            sample_rate: 0,
            ..AudioConfig::default()
        },
        ..GeneratorConfig::default()
    };
    silent.validate().unwrap();
}

#[test]
fn machine_name_override_wins() {
    let cfg = GeneratorConfig {
        machine_name: Some(" studio-a ".to_string()),
        ..GeneratorConfig::default()
    };
    assert_eq!(cfg.resolved_machine_name(), "studio-a");

    let blank = GeneratorConfig {
        machine_name: Some(String::new()),
        ..GeneratorConfig::default()
    };
    assert!(!blank.resolved_machine_name().is_empty());
}

#[test]
fn derived_options_follow_fields() {
    let cfg = GeneratorConfig {
        white_bar: true,
        noise_jitter: false,
        noise_seed: Some(5),
        noise_frames: 3,
        ..GeneratorConfig::default()
    };
    let synth = cfg.synth_opts();
    assert_eq!(synth.noise_frames, 3);
    assert_eq!(synth.noise_seed, Some(5));
    let comp = cfg.compositor_opts();
    assert!(comp.white_bar);
    assert!(!comp.noise_jitter);
    assert_eq!(comp.jitter_seed, 5);
}

#[test]
fn round_trips_through_json() {
    let cfg = GeneratorConfig {
        mode: BackgroundMode::Noise,
        noise_seed: Some(9),
        ..GeneratorConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains(r#""mode":"noise""#));
    let back = GeneratorConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(back, cfg);
}
