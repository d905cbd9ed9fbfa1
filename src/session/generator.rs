use crate::animation::state::AnimationState;
use crate::assets::font::FontAtlas;
use crate::assets::tone::ToneBuffer;
use crate::config::GeneratorConfig;
use crate::encode::sink::{AudioFormat, AudioFrame, FrameSink, SinkConfig, VideoFrame};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::TestcardResult;
use crate::metrics::tracker::MetricsTracker;
use crate::render::background::BackgroundFrameSet;
use crate::render::buffer::PixelBuffer;
use crate::render::compositor::{Diagnostics, FrameCompositor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Totals reported by [`SignalGenerator::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames the sink accepted.
    pub frames_sent: u64,
    /// Frames the sink refused without failing the run.
    pub frames_rejected: u64,
    /// Audio blocks the sink refused; the matching video frame still counts as sent.
    pub audio_rejected: u64,
}

/// Owns every per-run resource and drives the tick loop.
///
/// All buffers are sized in [`SignalGenerator::new`]; a tick only copies, draws and sends.
pub struct SignalGenerator {
    config: GeneratorConfig,
    atlas: FontAtlas,
    backgrounds: BackgroundFrameSet,
    anim: AnimationState,
    compositor: FrameCompositor,
    metrics: MetricsTracker,
    buffer: PixelBuffer,
    tone: Option<ToneBuffer>,
    machine_name: String,
    next_index: u64,
}

impl SignalGenerator {
    /// Validate `config` and precompute backgrounds, tone and the output buffer.
    #[tracing::instrument(skip_all, fields(width = config.width, height = config.height, mode = %config.mode))]
    pub fn new(config: GeneratorConfig, atlas: FontAtlas) -> TestcardResult<Self> {
        config.validate()?;

        let backgrounds = BackgroundFrameSet::synthesize(
            config.width,
            config.height,
            config.mode,
            &config.synth_opts(),
        )?;
        let tone = if config.audio.enabled {
            Some(ToneBuffer::new(
                config.audio.sample_rate,
                config.audio.channels,
                config.audio.frequency_hz,
            )?)
        } else {
            None
        };
        let buffer = PixelBuffer::new(config.width, config.height)?;
        let anim = AnimationState::new(config.width, backgrounds.len());
        let compositor = FrameCompositor::new(config.compositor_opts());
        let machine_name = config.resolved_machine_name();

        tracing::info!(
            backgrounds = backgrounds.len(),
            audio = tone.is_some(),
            machine = %machine_name,
            "generator ready"
        );

        Ok(Self {
            config,
            atlas,
            backgrounds,
            anim,
            compositor,
            metrics: MetricsTracker::new(Instant::now()),
            buffer,
            tone,
            machine_name,
            next_index: 0,
        })
    }

    /// Run ticks until `stop` is set or `max_frames` ticks have been produced.
    ///
    /// Both exit conditions are checked only between ticks, so a frame in flight always
    /// completes. A [`crate::TestcardError::SinkRejected`] drops that frame and the loop
    /// continues; any other sink error ends the run.
    pub fn run(
        &mut self,
        sink: &mut dyn FrameSink,
        stop: &AtomicBool,
        max_frames: Option<u64>,
    ) -> TestcardResult<RunStats> {
        sink.begin(self.sink_config())?;
        tracing::info!(
            sender = %self.config.name,
            fps = self.config.fps.as_f64(),
            "sending started"
        );

        let mut stats = RunStats::default();
        let mut ticks = 0u64;
        let outcome = loop {
            if stop.load(Ordering::Relaxed) {
                tracing::info!("stop requested");
                break Ok(());
            }
            if max_frames.is_some_and(|max| ticks >= max) {
                break Ok(());
            }
            ticks += 1;

            if let Err(e) = self.tick(sink, &mut stats) {
                break Err(e);
            }
        };

        let ended = sink.end();
        outcome?;
        ended?;
        tracing::info!(
            frames_sent = stats.frames_sent,
            frames_rejected = stats.frames_rejected,
            audio_rejected = stats.audio_rejected,
            "sending finished"
        );
        Ok(stats)
    }

    fn tick(&mut self, sink: &mut dyn FrameSink, stats: &mut RunStats) -> TestcardResult<()> {
        let index = FrameIndex(self.next_index);

        let render_started = Instant::now();
        self.compose_next()?;
        self.metrics.record_render(render_started.elapsed());

        let send_started = Instant::now();
        let frame = VideoFrame::from_buffer(&self.buffer, index, self.config.fps);
        let sent = match sink.push_frame(&frame) {
            Ok(()) => {
                if let Some(tone) = self.tone.as_ref() {
                    match sink.push_audio(&AudioFrame::from_tone(tone, frame.timecode)) {
                        Ok(()) => {}
                        Err(e) if e.is_recoverable() => {
                            tracing::warn!(frame = index.0, error = %e, "audio block dropped");
                            stats.audio_rejected += 1;
                        }
                        Err(e) => return Err(e),
                    }
                }
                true
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!(frame = index.0, error = %e, "frame dropped");
                stats.frames_rejected += 1;
                false
            }
            Err(e) => return Err(e),
        };
        let now = Instant::now();
        self.metrics.record_send(now - send_started);

        if sent {
            stats.frames_sent += 1;
            if self.metrics.record_frame_sent(now) {
                tracing::debug!(
                    fps = self.metrics.fps(),
                    avg_render_us = self.metrics.render().avg().as_micros() as u64,
                    avg_send_us = self.metrics.send().avg().as_micros() as u64,
                    "fps window"
                );
            }
        }
        Ok(())
    }

    /// Advance one tick and compose it without sending. Returns the finished frame.
    pub fn render_frame(&mut self) -> TestcardResult<&PixelBuffer> {
        self.compose_next()?;
        Ok(&self.buffer)
    }

    fn compose_next(&mut self) -> TestcardResult<()> {
        self.anim.advance();
        let diag = Diagnostics {
            utc: chrono::Utc::now(),
            frame: self.anim.frame_counter(),
            machine_name: &self.machine_name,
            sender_name: &self.config.name,
            metrics: &self.metrics,
        };
        self.compositor.compose(
            &mut self.buffer,
            &self.backgrounds,
            &self.anim,
            &self.atlas,
            &diag,
        )?;
        self.next_index += 1;
        Ok(())
    }

    fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            width: self.config.width,
            height: self.config.height,
            fps: self.config.fps,
            sender_name: self.config.name.clone(),
            audio: self.tone.as_ref().map(|t| AudioFormat {
                sample_rate: t.sample_rate(),
                channels: t.channels(),
            }),
        }
    }

    /// Config the generator was built from.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Precomputed background frames.
    pub fn backgrounds(&self) -> &BackgroundFrameSet {
        &self.backgrounds
    }

    /// Current animation counters.
    pub fn animation(&self) -> &AnimationState {
        &self.anim
    }

    /// Render/send timings.
    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    /// Looping audio tone, when audio is enabled.
    pub fn tone(&self) -> Option<&ToneBuffer> {
        self.tone.as_ref()
    }

    /// Machine name burned into the diagnostics.
    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    /// Frames composed so far.
    pub fn frames_composed(&self) -> u64 {
        self.next_index
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/generator.rs"]
mod tests;
