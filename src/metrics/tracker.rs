use std::time::{Duration, Instant};

/// Length of the frames-per-second counting window.
pub const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Smoothed average plus lifetime maximum of one timed stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageTiming {
    last: Duration,
    avg: Duration,
    max: Duration,
    samples: u64,
}

impl StageTiming {
    /// Fold in one sample: `avg = (avg + sample) / 2`, the first sample seeds the average.
    pub fn record(&mut self, sample: Duration) {
        self.avg = if self.samples == 0 {
            sample
        } else {
            (self.avg + sample) / 2
        };
        self.max = self.max.max(sample);
        self.last = sample;
        self.samples += 1;
    }

    /// Most recent sample.
    pub fn last(&self) -> Duration {
        self.last
    }

    /// Exponentially smoothed average.
    pub fn avg(&self) -> Duration {
        self.avg
    }

    /// High-water mark; never decreases.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Samples recorded.
    pub fn samples(&self) -> u64 {
        self.samples
    }
}

/// Rolling render/send timings and a one-second frames-sent counter.
#[derive(Clone, Debug)]
pub struct MetricsTracker {
    render: StageTiming,
    send: StageTiming,
    window_start: Instant,
    window_frames: u32,
    fps: u32,
    frames_sent: u64,
}

impl MetricsTracker {
    /// Start tracking with the fps window opening at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            render: StageTiming::default(),
            send: StageTiming::default(),
            window_start: now,
            window_frames: 0,
            fps: 0,
            frames_sent: 0,
        }
    }

    /// Record how long building one frame took.
    pub fn record_render(&mut self, elapsed: Duration) {
        self.render.record(elapsed);
    }

    /// Record how long handing one frame to the sink took.
    pub fn record_send(&mut self, elapsed: Duration) {
        self.send.record(elapsed);
    }

    /// Count one sent frame. Returns `true` when this call closed an fps window.
    pub fn record_frame_sent(&mut self, now: Instant) -> bool {
        self.frames_sent += 1;
        self.window_frames += 1;
        if now.saturating_duration_since(self.window_start) >= FPS_WINDOW {
            self.fps = self.window_frames;
            self.window_frames = 0;
            self.window_start = now;
            return true;
        }
        false
    }

    /// Render stage timings.
    pub fn render(&self) -> &StageTiming {
        &self.render
    }

    /// Send stage timings.
    pub fn send(&self) -> &StageTiming {
        &self.send
    }

    /// Frames counted in the last completed window (0 until the first window closes).
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames sent since creation.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metrics/tracker.rs"]
mod tests;
