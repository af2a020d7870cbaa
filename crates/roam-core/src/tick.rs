/// Per-frame input handed to every agent update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32, seed: u64) -> Self {
        Self {
            tick,
            dt_seconds,
            seed,
        }
    }

    /// Frame delta clamped to be non-negative.
    pub fn dt(&self) -> f32 {
        self.dt_seconds.max(0.0)
    }
}
