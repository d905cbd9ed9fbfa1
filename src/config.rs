use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{TestcardError, TestcardResult};
use crate::render::background::{BackgroundMode, SynthOpts};
use crate::render::compositor::CompositorOpts;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Generator settings: output format, pattern selection and the audio companion.
///
/// Every field has a default, so a JSON document only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Sender/source name advertised to the sink and burned into the frame.
    pub name: String,
    /// Background pattern.
    pub mode: BackgroundMode,
    /// Draw the sweeping white bar.
    pub white_bar: bool,
    /// Machine name shown in the diagnostics; resolved from the host when unset.
    pub machine_name: Option<String>,
    /// Frames in the blue brightness ramp.
    pub blue_frames: usize,
    /// Precomputed noise frames.
    pub noise_frames: usize,
    /// Fixed noise seed for reproducible output.
    pub noise_seed: Option<u64>,
    /// Rotate noise frames by a fresh offset every tick.
    pub noise_jitter: bool,
    /// Audio companion tone.
    pub audio: AudioConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let synth = SynthOpts::default();
        Self {
            width: 1920,
            height: 1080,
            fps: Fps::default(),
            name: "Test Pattern".to_string(),
            mode: BackgroundMode::default(),
            white_bar: false,
            machine_name: None,
            blue_frames: synth.blue_frames,
            noise_frames: synth.noise_frames,
            noise_seed: None,
            noise_jitter: true,
            audio: AudioConfig::default(),
        }
    }
}

/// Looping tone sent alongside video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Send audio at all.
    pub enabled: bool,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Tone frequency in Hz.
    pub frequency_hz: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_rate: 48_000,
            channels: 2,
            frequency_hz: 1_000,
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TestcardResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| TestcardError::validation(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TestcardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TestcardError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> TestcardResult<()> {
        Canvas::new(self.width, self.height)?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.name.trim().is_empty() {
            return Err(TestcardError::validation("sender name must not be empty"));
        }
        if self.blue_frames == 0 {
            return Err(TestcardError::validation("blue_frames must be > 0"));
        }
        if self.noise_frames == 0 {
            return Err(TestcardError::validation("noise_frames must be > 0"));
        }
        if self.audio.enabled {
            let a = &self.audio;
            if a.sample_rate == 0 || a.channels == 0 || a.frequency_hz == 0 {
                return Err(TestcardError::validation(
                    "audio sample_rate, channels and frequency_hz must be > 0",
                ));
            }
            if a.frequency_hz > a.sample_rate {
                return Err(TestcardError::validation(
                    "audio frequency_hz must not exceed sample_rate",
                ));
            }
        }
        Ok(())
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Background synthesis options derived from this config.
    pub fn synth_opts(&self) -> SynthOpts {
        SynthOpts {
            blue_frames: self.blue_frames,
            noise_frames: self.noise_frames,
            noise_seed: self.noise_seed,
        }
    }

    /// Compositor options derived from this config.
    pub fn compositor_opts(&self) -> CompositorOpts {
        let mut opts = CompositorOpts {
            white_bar: self.white_bar,
            noise_jitter: self.noise_jitter,
            ..CompositorOpts::default()
        };
        if let Some(seed) = self.noise_seed {
            opts.jitter_seed = (seed ^ (seed >> 32)) as u32;
        }
        opts
    }

    /// Machine name override, or the host name, or `"unknown"`.
    pub fn resolved_machine_name(&self) -> String {
        if let Some(name) = self.machine_name.as_deref().map(str::trim)
            && !name.is_empty()
        {
            return name.to_string();
        }
        host_name().unwrap_or_else(|| {
            tracing::warn!("could not determine machine name");
            "unknown".to_string()
        })
    }
}

fn host_name() -> Option<String> {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .chain(std::fs::read_to_string("/etc/hostname").ok())
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
