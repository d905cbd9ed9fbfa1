use crate::animation::state::{AnimationState, BAR_WIDTH};
use crate::assets::font::{FontAtlas, GLYPH_HEIGHT};
use crate::foundation::error::TestcardResult;
use crate::foundation::rng::Xorshift32;
use crate::metrics::tracker::MetricsTracker;
use crate::render::background::{BackgroundFrameSet, BackgroundMode};
use crate::render::buffer::{OPAQUE_BLACK, OPAQUE_WHITE, PixelBuffer};
use crate::render::text::draw_text;
use chrono::{DateTime, Utc};
use std::fmt::{self, Write as _};
use std::time::Duration;

/// Left margin of the diagnostics block.
pub const TEXT_X: i64 = 32;
/// Top of the first diagnostics line.
pub const TEXT_Y: i64 = 32;

/// Per-run compositing switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositorOpts {
    /// Draw the sweeping white bar.
    pub white_bar: bool,
    /// Rotate noise frames by a fresh xorshift offset each tick.
    pub noise_jitter: bool,
    /// Seed for the jitter stream.
    pub jitter_seed: u32,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            white_bar: false,
            noise_jitter: true,
            jitter_seed: 0x2545_F491,
        }
    }
}

/// Values burned into the frame as text.
#[derive(Clone, Copy, Debug)]
pub struct Diagnostics<'a> {
    /// Wall-clock time shown on the first line.
    pub utc: DateTime<Utc>,
    /// Frame counter.
    pub frame: u64,
    /// Host machine name.
    pub machine_name: &'a str,
    /// Sender/source name.
    pub sender_name: &'a str,
    /// Timing statistics; shows values from previously completed ticks.
    pub metrics: &'a MetricsTracker,
}

/// Builds each output frame: background copy, moving bar, then diagnostics text on top.
#[derive(Debug)]
pub struct FrameCompositor {
    opts: CompositorOpts,
    jitter: Xorshift32,
    line: String,
}

impl FrameCompositor {
    /// Create a compositor. The text line buffer is allocated once and reused every tick.
    pub fn new(opts: CompositorOpts) -> Self {
        Self {
            opts,
            jitter: Xorshift32::new(opts.jitter_seed),
            line: String::with_capacity(128),
        }
    }

    /// Options this compositor was built with.
    pub fn opts(&self) -> CompositorOpts {
        self.opts
    }

    /// Compose one frame into `out`.
    ///
    /// Order is fixed: background, bar, text. Text is always last so nothing overwrites it.
    pub fn compose(
        &mut self,
        out: &mut PixelBuffer,
        backgrounds: &BackgroundFrameSet,
        anim: &AnimationState,
        atlas: &FontAtlas,
        diag: &Diagnostics<'_>,
    ) -> TestcardResult<()> {
        match backgrounds.get(anim.bg_index()) {
            Some(bg) if self.opts.noise_jitter && backgrounds.mode() == BackgroundMode::Noise => {
                let offset = self.jitter.next_u32() as usize;
                out.copy_rotated_from(bg, offset)?;
            }
            Some(bg) => out.copy_from(bg)?,
            None => out.fill(OPAQUE_BLACK),
        }

        if self.opts.white_bar {
            out.fill_columns(anim.bar_x(), BAR_WIDTH, OPAQUE_WHITE);
        }

        self.draw_diagnostics(out, atlas, diag);
        Ok(())
    }

    fn draw_diagnostics(&mut self, out: &mut PixelBuffer, atlas: &FontAtlas, diag: &Diagnostics<'_>) {
        let render = diag.metrics.render();
        let send = diag.metrics.send();

        self.line(out, atlas, 0, format_args!("Time UTC: {}", diag.utc.format("%H:%M:%S%.3f")));
        self.line(out, atlas, 1, format_args!("Frame {}", diag.frame));
        self.line(out, atlas, 2, format_args!("Machine: {}", diag.machine_name));
        self.line(out, atlas, 3, format_args!("Sender Name: {}", diag.sender_name));
        self.line(out, atlas, 4, format_args!("Render time: {:.2} ms", ms(render.last())));
        self.line(out, atlas, 5, format_args!("Avg Render time: {:.2} ms", ms(render.avg())));
        self.line(out, atlas, 6, format_args!("Max Render time: {:.2} ms", ms(render.max())));
        self.line(out, atlas, 7, format_args!("Send time: {:.2} ms", ms(send.last())));
        self.line(out, atlas, 8, format_args!("Avg Send time: {:.2} ms", ms(send.avg())));
        self.line(out, atlas, 9, format_args!("Max Send time: {:.2} ms", ms(send.max())));
        self.line(out, atlas, 10, format_args!("FPS: {}", diag.metrics.fps()));
    }

    fn line(&mut self, out: &mut PixelBuffer, atlas: &FontAtlas, row: i64, args: fmt::Arguments<'_>) {
        self.line.clear();
        // Writing into a String cannot fail.
        let _ = self.line.write_fmt(args);
        let y = TEXT_Y + row * i64::from(GLYPH_HEIGHT);
        draw_text(out, atlas, TEXT_X, y, &self.line);
    }
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
