//! Stillness and height measurement over the trial bodies.

use crate::config::GameConfig;
use crate::scene::{LetterId, Role, TowerScene};

/// Whether every trial body is at or below both speed thresholds; a body
/// counts as moving only strictly above them. An empty trial set is never
/// "still": stillness claims something about letters, and there are none
/// to claim it about.
pub fn all_still(scene: &TowerScene, linear_threshold: f32, angular_threshold: f32) -> bool {
    let mut any = false;
    for (_, body) in scene.bodies_with_role(Role::Trial) {
        any = true;
        let physics = scene.physics();
        if physics.velocity(body).length() > linear_threshold {
            return false;
        }
        if physics.angular_velocity(body).abs() > angular_threshold {
            return false;
        }
    }
    any
}

/// The letter whose bounding box reaches highest, with its top edge Y in
/// world space. `None` when no body carries the role.
pub fn find_highest_point(scene: &TowerScene, role: Role) -> Option<(LetterId, f32)> {
    let mut best: Option<(LetterId, f32)> = None;
    for (id, body) in scene.bodies_with_role(role) {
        let Some((_, max)) = scene.physics().body_aabb(body) else {
            continue;
        };
        if best.map_or(true, |(_, top)| max.y > top) {
            best = Some((id, max.y));
        }
    }
    best
}

/// Convert a world-space highest point into tower height above the ground
/// platform's top surface.
pub fn tower_height(highest_point: f32, config: &GameConfig) -> f32 {
    highest_point - config.ground_height_m - config.ground_thickness_m / 2.0
}
