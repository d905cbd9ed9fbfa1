use crate::assets::tone::ToneBuffer;
use crate::encode::sink::{AudioFrame, FrameSink, SinkConfig, VideoFrame};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TestcardError, TestcardResult};
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output target: a file path or any URL `ffmpeg` can write to.
    pub target: String,
    /// Force an output container (`-f`); `None` lets `ffmpeg` infer it from the target.
    pub format: Option<String>,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Read input at its native frame rate (`-re`), so pipe backpressure paces the generator.
    pub realtime: bool,
    /// Tone looped under the video for the whole output.
    pub audio_loop: Option<ToneBuffer>,
}

impl FfmpegSinkOpts {
    /// Create options for writing to `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            format: None,
            overwrite: true,
            realtime: true,
            audio_loop: None,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw BGRA frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    audio_tmp: Option<PathBuf>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            audio_tmp: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn remove_audio_tmp(&mut self) {
        if let Some(path) = self.audio_tmp.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
        self.remove_audio_tmp();
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> TestcardResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(TestcardError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(TestcardError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p output)",
            ));
        }

        if !is_url(&self.opts.target) {
            let path = Path::new(&self.opts.target);
            ensure_parent_dir(path)?;
            if !self.opts.overwrite && path.exists() {
                return Err(TestcardError::validation(format!(
                    "output file '{}' already exists",
                    path.display()
                )));
            }
        }

        if !is_ffmpeg_on_path() {
            return Err(TestcardError::sink(
                "ffmpeg is required for this sink, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args(["-loglevel", "error"]);
        if self.opts.realtime {
            cmd.arg("-re");
        }
        cmd.args([
            "-f",
            "rawvideo",
            "-pix_fmt",
            "bgra",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        if let Some(tone) = self.opts.audio_loop.as_ref() {
            let path = std::env::temp_dir().join(format!(
                "testcard_tone_{}_{}.f32le",
                std::process::id(),
                tone.frequency_hz()
            ));
            write_f32le_file(&tone.interleaved(), &path)?;
            cmd.args([
                "-stream_loop",
                "-1",
                "-f",
                "f32le",
                "-ar",
                &tone.sample_rate().to_string(),
                "-ac",
                &tone.channels().to_string(),
                "-i",
            ])
            .arg(&path)
            .args(["-c:a", "aac", "-shortest"]);
            self.audio_tmp = Some(path);
        } else {
            cmd.arg("-an");
        }

        cmd.args(["-c:v", "libx264", "-pix_fmt", "yuv420p"]);
        if let Some(format) = self.opts.format.as_deref() {
            cmd.args(["-f", format]);
        }
        cmd.arg(&self.opts.target);

        let mut child = cmd.spawn().map_err(|e| {
            TestcardError::sink(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TestcardError::sink("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TestcardError::sink("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::info!(output = %self.opts.target, "ffmpeg sink started");
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, frame: &VideoFrame<'_>) -> TestcardResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TestcardError::sink("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && frame.index.0 <= last.0
        {
            return Err(TestcardError::sink_rejected(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(TestcardError::sink_rejected(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last_idx = Some(frame.index);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TestcardError::sink("ffmpeg sink is already finalized"));
        };
        stdin.write_all(frame.data).map_err(|e| {
            TestcardError::sink(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn push_audio(&mut self, _audio: &AudioFrame<'_>) -> TestcardResult<()> {
        // Audio is fed once from the looped tone file set up in `begin`.
        Ok(())
    }

    fn end(&mut self) -> TestcardResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| TestcardError::sink("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            TestcardError::sink(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| TestcardError::sink("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| TestcardError::sink(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        self.remove_audio_tmp();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(TestcardError::sink(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input frame rate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn is_url(target: &str) -> bool {
    target.contains("://")
}

fn write_f32le_file(samples: &[f32], out_path: &Path) -> TestcardResult<()> {
    let mut bytes = Vec::<u8>::with_capacity(samples.len() * 4);
    for &sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        TestcardError::sink(format!(
            "failed to write tone file '{}': {e}",
            out_path.display()
        ))
    })
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TestcardResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
