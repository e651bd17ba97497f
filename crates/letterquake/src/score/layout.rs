//! Turning a surviving tower into a portable layout and back.
//!
//! Placements are stored relative to the top-center of the ground
//! platform, so a layout replays identically whatever pose the platform
//! ended the earthquake in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::letters::Letter;
use crate::scene::TowerScene;
use crate::Result;

/// One letter of a stored layout. Field names match the persisted wire
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LetterPlacement {
    pub letter: Letter,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

/// Snapshot the trial bodies relative to ground-top-center.
pub fn serialize_layout(scene: &TowerScene) -> Vec<LetterPlacement> {
    let origin = scene.ground_top_center();
    let mut placements = Vec::new();
    for entry in scene.entries() {
        let Some(twin) = entry.twin() else {
            continue;
        };
        let (position, angle) = scene.physics().body_position(twin);
        placements.push(LetterPlacement {
            letter: entry.letter,
            x: position.x - origin.x,
            y: position.y - origin.y,
            angle,
        });
    }
    placements
}

/// Rebuild a stored layout in a fresh zero-gravity scene, for viewing a
/// score without simulating it.
pub fn replay_layout(placements: &[LetterPlacement], config: GameConfig) -> Result<TowerScene> {
    let mut scene = TowerScene::new(config);
    let origin = scene.ground_top_center();
    for placement in placements {
        scene.add_letter(
            placement.letter,
            origin + Vec2::new(placement.x, placement.y),
            placement.angle,
        )?;
    }
    Ok(scene)
}
