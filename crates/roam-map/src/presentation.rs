use std::collections::BTreeMap;

const HIDDEN_SCALE: f32 = 0.01;
const ACTIVE_SCALE: f32 = 1.0;
const HOVER_SCALE: f32 = 1.2;
const EASING: f32 = 0.1;

/// Per-frame display state for one room. Owned by the renderer side, never
/// by [`crate::Room`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomPresentation {
    pub scale: f32,
    pub hovered: bool,
}

impl Default for RoomPresentation {
    fn default() -> Self {
        Self {
            scale: HIDDEN_SCALE,
            hovered: false,
        }
    }
}

impl RoomPresentation {
    /// Ease the scale 10% of the way toward its target for this frame.
    pub fn update(&mut self, active: bool, hovered: bool) {
        self.hovered = hovered;
        let target = match (active, hovered) {
            (false, _) => HIDDEN_SCALE,
            (true, false) => ACTIVE_SCALE,
            (true, true) => HOVER_SCALE,
        };
        self.scale += (target - self.scale) * EASING;
    }

    pub fn opacity(&self) -> f32 {
        if self.hovered {
            0.5
        } else {
            0.3
        }
    }

    pub fn emissive_intensity(&self) -> f32 {
        if self.hovered {
            0.3
        } else {
            0.1
        }
    }
}

/// Presentation records keyed by room id.
#[derive(Debug, Clone, Default)]
pub struct PresentationState {
    rooms: BTreeMap<String, RoomPresentation>,
}

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, room_id: &str, active: bool, hovered: bool) -> RoomPresentation {
        let entry = self.rooms.entry(room_id.to_string()).or_default();
        entry.update(active, hovered);
        *entry
    }

    pub fn get(&self, room_id: &str) -> Option<&RoomPresentation> {
        self.rooms.get(room_id)
    }
}
