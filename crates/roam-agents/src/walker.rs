use roam_core::TickContext;
use roam_map::SceneMap;
use roam_nav::{Vec2, Vec3};

/// Default draw height for [`Walker::position_3d`].
pub const DEFAULT_DRAW_HEIGHT: f32 = 0.5;

/// What a renderer and the simulation loop need from any walking agent.
///
/// Autonomous and player-driven characters differ only in where movement
/// intent comes from; both follow paths through the same locomotion core.
pub trait Walker {
    fn id(&self) -> &str;

    fn position_2d(&self) -> Vec2;

    fn position_3d(&self, y: f32) -> Vec3 {
        Vec3::from_planar(self.position_2d(), y)
    }

    /// Unit direction of the last move, zero before the first one.
    fn facing(&self) -> Vec2;

    fn current_room(&self) -> &str;

    fn update(&mut self, ctx: &TickContext, scene: &SceneMap);

    /// Rewind to the start of the current path.
    fn reset(&mut self, scene: &SceneMap);
}
