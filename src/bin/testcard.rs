use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "testcard", version, about = "Broadcast-style test signal generator")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stream frames to a sink until interrupted or `--frames` are sent.
    Run(RunArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

/// Output settings shared by every command. `-h` is height, so help is `--help` only.
#[derive(Args, Debug)]
struct GeneratorArgs {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// 1bpp BMP font atlas.
    #[arg(long, default_value = "font.bmp")]
    font: PathBuf,

    /// Output width in pixels.
    #[arg(short = 'w', long)]
    width: Option<u32>,

    /// Output height in pixels.
    #[arg(short = 'h', long)]
    height: Option<u32>,

    /// Sender name.
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Frame rate, `30` or `30000/1001`.
    #[arg(short = 'f', long, value_parser = parse_fps)]
    fps: Option<testcard::Fps>,

    /// Background mode: blue, colorbar, noise or blank.
    #[arg(long)]
    mode: Option<String>,

    /// Draw the sweeping white bar.
    #[arg(long = "whiteline")]
    white_bar: bool,

    /// Machine name shown in the diagnostics instead of the host name.
    #[arg(long)]
    machine_name: Option<String>,

    /// Frames in the blue brightness ramp.
    #[arg(long)]
    blue_frames: Option<usize>,

    /// Precomputed noise frames.
    #[arg(long)]
    noise_frames: Option<usize>,

    /// Fixed noise seed for reproducible output.
    #[arg(long)]
    noise_seed: Option<u64>,

    /// Show noise frames unrotated.
    #[arg(long)]
    no_noise_jitter: bool,

    /// Disable the audio tone.
    #[arg(long)]
    no_audio: bool,

    /// Audio sample rate in Hz.
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Audio channel count.
    #[arg(long)]
    channels: Option<u16>,

    /// Tone frequency in Hz.
    #[arg(long)]
    tone_hz: Option<u32>,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
struct RunArgs {
    #[command(flatten)]
    generator: GeneratorArgs,

    /// Where frames go.
    #[arg(long, value_enum, default_value_t = SinkChoice::Paced)]
    sink: SinkChoice,

    /// Output file or URL for the ffmpeg sink.
    #[arg(long)]
    out: Option<String>,

    /// Container format for the ffmpeg sink (e.g. `mpegts`, `flv`).
    #[arg(long)]
    format: Option<String>,

    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,
}

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
struct FrameArgs {
    #[command(flatten)]
    generator: GeneratorArgs,

    /// Animation ticks to advance; the PNG shows the last one.
    #[arg(long, default_value_t = 1)]
    frames: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SinkChoice {
    /// Discard frames at the configured rate.
    Paced,
    /// Encode through the system `ffmpeg`.
    Ffmpeg,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_fps(s: &str) -> Result<testcard::Fps, String> {
    let (num, den) = match s.split_once('/') {
        Some((n, d)) => (n.trim(), d.trim()),
        None => (s.trim(), "1"),
    };
    let num = num.parse::<u32>().map_err(|e| format!("bad fps numerator: {e}"))?;
    let den = den
        .parse::<u32>()
        .map_err(|e| format!("bad fps denominator: {e}"))?;
    testcard::Fps::new(num, den).map_err(|e| e.to_string())
}

fn load_config(args: &GeneratorArgs) -> anyhow::Result<testcard::GeneratorConfig> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => testcard::GeneratorConfig::from_path(path)?,
        None => testcard::GeneratorConfig::default(),
    };
    if let Some(width) = args.width {
        cfg.width = width;
    }
    if let Some(height) = args.height {
        cfg.height = height;
    }
    if let Some(name) = args.name.as_ref() {
        cfg.name = name.clone();
    }
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if let Some(mode) = args.mode.as_deref() {
        cfg.mode = testcard::BackgroundMode::from_name(mode);
    }
    if args.white_bar {
        cfg.white_bar = true;
    }
    if let Some(machine) = args.machine_name.as_ref() {
        cfg.machine_name = Some(machine.clone());
    }
    if let Some(n) = args.blue_frames {
        cfg.blue_frames = n;
    }
    if let Some(n) = args.noise_frames {
        cfg.noise_frames = n;
    }
    if let Some(seed) = args.noise_seed {
        cfg.noise_seed = Some(seed);
    }
    if args.no_noise_jitter {
        cfg.noise_jitter = false;
    }
    if args.no_audio {
        cfg.audio.enabled = false;
    }
    if let Some(rate) = args.sample_rate {
        cfg.audio.sample_rate = rate;
    }
    if let Some(channels) = args.channels {
        cfg.audio.channels = channels;
    }
    if let Some(hz) = args.tone_hz {
        cfg.audio.frequency_hz = hz;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_generator(args: &GeneratorArgs) -> anyhow::Result<testcard::SignalGenerator> {
    let cfg = load_config(args)?;
    let atlas = testcard::FontAtlas::from_path(&args.font)
        .with_context(|| format!("load font '{}'", args.font.display()))?;
    Ok(testcard::SignalGenerator::new(cfg, atlas)?)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut generator = build_generator(&args.generator)?;

    let mut sink: Box<dyn testcard::FrameSink> = match args.sink {
        SinkChoice::Paced => Box::new(testcard::PacedSink::new()),
        SinkChoice::Ffmpeg => {
            let target = args
                .out
                .clone()
                .context("--out is required with --sink ffmpeg")?;
            let mut opts = testcard::FfmpegSinkOpts::new(target);
            opts.format = args.format.clone();
            opts.audio_loop = generator.tone().cloned();
            Box::new(testcard::FfmpegSink::new(opts))
        }
    };

    // Never set: the process ends on SIGINT, and `--frames` bounds scripted runs.
    let stop = AtomicBool::new(false);
    let stats = generator.run(sink.as_mut(), &stop, args.frames)?;
    eprintln!(
        "sent {} frames ({} dropped)",
        stats.frames_sent, stats.frames_rejected
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut generator = build_generator(&args.generator)?;

    for _ in 1..args.frames {
        generator.render_frame()?;
    }
    let frame = generator.render_frame()?;
    let rgba = frame.to_rgba8();

    testcard::encode::ffmpeg::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &rgba,
        frame.width(),
        frame.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
