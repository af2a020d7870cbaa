use roam_nav::Vec2;

/// Progress smaller than this does not count as getting anywhere.
pub const MIN_PROGRESS: f32 = 0.5;
/// Seconds of attempted movement without progress before giving up.
pub const STUCK_TIMEOUT: f32 = 5.0;

/// Detects a walker that keeps trying to move but goes nowhere, e.g. when
/// grinding against an obstacle corner.
#[derive(Debug, Clone, Default)]
pub struct StuckDetector {
    anchor: Option<Vec2>,
    elapsed: f32,
}

impl StuckDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one tick. Returns true once `STUCK_TIMEOUT` seconds of attempted
    /// movement pass without `MIN_PROGRESS` units of displacement; the
    /// detector then rearms itself.
    pub fn observe(&mut self, position: Vec2, attempting: bool, dt_seconds: f32) -> bool {
        if !attempting {
            self.clear();
            return false;
        }

        let anchor = *self.anchor.get_or_insert(position);
        if position.distance(anchor) > MIN_PROGRESS {
            self.anchor = Some(position);
            self.elapsed = 0.0;
            return false;
        }

        self.elapsed += dt_seconds.max(0.0);
        if self.elapsed >= STUCK_TIMEOUT {
            self.clear();
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.anchor = None;
        self.elapsed = 0.0;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
