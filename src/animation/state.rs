/// Width in pixels of the moving vertical bar.
pub const BAR_WIDTH: u32 = 16;

/// Background index advances once per this many ticks.
pub const BG_ADVANCE_EVERY: u64 = 10;

/// Per-tick animation counters: moving-bar position and background-frame ping-pong.
///
/// Owned by the driver and mutated only through [`AnimationState::advance`], once per tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationState {
    width: u32,
    bg_frame_count: usize,

    bar_x: i64,
    bar_dir: i64,
    bg_index: i64,
    bg_dir: i64,
    frame_counter: u64,
}

impl AnimationState {
    /// Initial state: bar at `x = 0` moving right, background index 0 moving forward.
    pub fn new(width: u32, bg_frame_count: usize) -> Self {
        Self {
            width,
            bg_frame_count,
            bar_x: 0,
            bar_dir: 1,
            bg_index: 0,
            bg_dir: 1,
            frame_counter: 0,
        }
    }

    /// Current left edge of the bar, always within `[0, width - 16]`.
    pub fn bar_x(&self) -> u32 {
        self.bar_x as u32
    }

    /// `+1` while the bar moves right, `-1` while it moves left.
    pub fn bar_direction(&self) -> i32 {
        self.bar_dir as i32
    }

    /// Selected background frame, always within `[0, bg_frame_count - 1]` (0 for empty sets).
    pub fn bg_index(&self) -> usize {
        self.bg_index as usize
    }

    /// `+1` while the background index moves forward, `-1` while it moves back.
    pub fn bg_direction(&self) -> i32 {
        self.bg_dir as i32
    }

    /// Ticks advanced so far.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Largest valid bar position.
    pub fn bar_max_x(&self) -> u32 {
        self.width.saturating_sub(BAR_WIDTH)
    }

    /// Advance one tick.
    pub fn advance(&mut self) {
        self.frame_counter += 1;
        self.step_bar();
        if self.bg_frame_count > 1 && self.frame_counter.is_multiple_of(BG_ADVANCE_EVERY) {
            self.step_background();
        }
    }

    fn step_bar(&mut self) {
        let max = i64::from(self.bar_max_x());
        self.bar_x = (self.bar_x + self.bar_dir).clamp(0, max);
        if self.bar_x >= max {
            self.bar_dir = -1;
        }
        if self.bar_x <= 0 {
            self.bar_dir = 1;
        }
    }

    fn step_background(&mut self) {
        let n = self.bg_frame_count as i64;
        self.bg_index += self.bg_dir;
        if self.bg_index < 0 {
            self.bg_index = 0;
            self.bg_dir = 1;
        }
        if self.bg_index >= n {
            self.bg_index = n - 1;
            self.bg_dir = -1;
        }
        self.bg_index %= n;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/state.rs"]
mod tests;
