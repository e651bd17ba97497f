use serde::{Deserialize, Serialize};

/// Average letter width in raw art units. The outline art is authored at
/// pixel scale; dividing the desired on-ground width by this constant gives
/// the single scale factor applied to every letter, keeping size parity.
pub const AVG_LETTER_WIDTH_RAW: f32 = 1400.0;

/// All tuning constants for the game, in meters / seconds / radians.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield width in meters.
    pub world_width_m: f32,
    /// Playfield height in meters.
    pub world_height_m: f32,
    /// Target width of a letter once scaled from art units.
    pub desired_letter_width_m: f32,
    /// Linear speed at or below which a body counts as still (m/s).
    pub linear_speed_threshold: f32,
    /// Angular speed at or below which a body counts as still (rad/s).
    pub angular_speed_threshold: f32,
    /// How long every trial body must stay still before a phase is stable.
    pub min_seconds_stable: f32,
    /// Delay between reaching post-gravity stability and the shake kick.
    pub shake_delay: f32,
    /// Height of the ground platform's center above y = 0.
    pub ground_height_m: f32,
    /// Vertical thickness of the ground platform.
    pub ground_thickness_m: f32,
    pub ground_width_m: f32,
    pub ground_mass: f32,
    /// Linear spring holding the ground platform against the shake kick.
    pub spring_stiffness: f32,
    pub spring_damping: f32,
    /// Friction coefficient shared by all letter fragments and the ground.
    pub wood_friction: f32,
    /// Horizontal velocity applied to the ground by the shake stimulus.
    pub push_velocity: f32,
    /// Downward gravity once a trial starts. Zero while arranging.
    pub gravity_y: f32,
    /// Mass of one letter body, regardless of glyph.
    pub letter_mass: f32,
    /// Damping for manipulable (sandbox) letters.
    pub sandbox_damping: f32,
    /// Damping for trial letters; near zero so the trial reads like real
    /// unforced motion.
    pub trial_damping: f32,
    /// Fixed physics timestep.
    pub fixed_dt: f32,
    /// Catch-up cap for the fixed-step accumulator.
    pub max_substeps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width_m: 10.0,
            world_height_m: 15.0,
            desired_letter_width_m: 1.0,
            linear_speed_threshold: 0.1,
            angular_speed_threshold: 0.1,
            min_seconds_stable: 3.0,
            shake_delay: 0.05,
            ground_height_m: 0.5,
            ground_thickness_m: 0.25,
            ground_width_m: 8.0,
            ground_mass: 50.0,
            spring_stiffness: 1500.0,
            spring_damping: 500.0,
            wood_friction: 5.0,
            push_velocity: 3.0,
            gravity_y: -9.81,
            letter_mass: 20.0,
            sandbox_damping: 1.0,
            trial_damping: 0.01,
            fixed_dt: 1.0 / 60.0,
            max_substeps: 10,
        }
    }
}
