/// Fixed-step simulation clock.
///
/// Elapsed time is kept as a tick count so `current_time` is always an exact
/// multiple of `dt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    dt: f32,
    ticks: u64,
}

impl Clock {
    /// `dt` is validated by the configuration layer; the clock only stores it.
    pub fn new(dt: f32) -> Self {
        Self { dt, ticks: 0 }
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    pub fn current_time(&self) -> f64 {
        self.ticks as f64 * self.dt as f64
    }

    pub fn step_size(&self) -> f32 {
        self.dt
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of ticks that fit in one render interval. Always at least one,
    /// even when rounding would produce zero.
    pub fn ticks_per_frame(&self, render_interval: f32) -> u32 {
        let n = (render_interval / self.dt).round();
        if n.is_finite() && n >= 1.0 {
            n as u32
        } else {
            1
        }
    }
}
