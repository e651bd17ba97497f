//! The tower scene: one world holding the spring-mounted ground platform
//! and every letter body, sandbox and trial alike. All mutation goes
//! through [`TowerScene`]; other modules read through its accessors.

use glam::Vec2;

use crate::config::GameConfig;
use crate::core::physics::{
    BodyDesc, BodyId, BodyType, ColliderMaterial, PhysicsBody, PhysicsWorld, SpringDesc,
};
use crate::letters::builder::{letter_fragments, Fragment};
use crate::letters::Letter;
use crate::{Error, Result};

/// Identifier for a letter slot in the scene. Stable across trials: the
/// trial twin of a letter shares its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LetterId(pub u32);

/// What a letter body is for right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Arrangeable sandbox letter. Dynamic, heavily damped, no collision
    /// response so letters overlap freely while being placed.
    Manipulable,
    /// Frozen outline of a manipulable letter while its trial twin runs.
    Shadow,
    /// Simulated copy taking part in the gravity/earthquake trial.
    Trial,
}

/// One letter slot: the sandbox body, plus an optional trial twin.
pub struct LetterEntry {
    pub id: LetterId,
    pub letter: Letter,
    pub role: Role,
    body: PhysicsBody,
    fragments: Vec<Fragment>,
    twin: Option<PhysicsBody>,
}

impl LetterEntry {
    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }

    pub fn twin(&self) -> Option<&PhysicsBody> {
        self.twin.as_ref()
    }
}

/// Pose snapshot for renderers.
#[derive(Debug, Clone, Copy)]
pub struct LetterState {
    pub id: LetterId,
    pub letter: Letter,
    pub role: Role,
    pub position: Vec2,
    pub angle: f32,
}

const GROUND_ID: BodyId = BodyId(0);
const ANCHOR_ID: BodyId = BodyId(1);
const FIRST_LETTER_ID: u32 = 2;

/// Clearance above the drop target when auto-placing a letter.
const DROP_CLEARANCE: f32 = 0.1;

pub struct TowerScene {
    config: GameConfig,
    physics: PhysicsWorld,
    ground: PhysicsBody,
    entries: Vec<LetterEntry>,
    next_id: u32,
    trial_running: bool,
}

impl TowerScene {
    /// Build a fresh scene: zero gravity, ground platform riding its
    /// horizontal rail, spring to a fixed hook at the right world edge.
    pub fn new(config: GameConfig) -> Self {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let material = ColliderMaterial {
            friction: config.wood_friction,
            restitution: 0.0,
            density: 1.0,
        };

        let ground = physics.create_box_body(
            GROUND_ID,
            &BodyDesc::dynamic()
                .with_position(Vec2::new(0.0, config.ground_height_m))
                .with_lock_vertical(true)
                .with_lock_rotation(true)
                .with_mass(config.ground_mass)
                .with_can_sleep(false),
            Vec2::new(config.ground_width_m / 2.0, config.ground_thickness_m / 2.0),
            material,
        );

        let hook_x = config.world_width_m / 2.0;
        let anchor = physics.create_box_body(
            ANCHOR_ID,
            &BodyDesc::fixed()
                .with_position(Vec2::new(hook_x, config.ground_height_m))
                .with_collision_response(false),
            Vec2::new(0.05, 0.05),
            ColliderMaterial::default(),
        );

        // The spring spans hook to ground right edge, at rest when the
        // platform sits centered.
        physics.create_spring(
            &ground,
            &anchor,
            &SpringDesc {
                anchor_a: Vec2::new(config.ground_width_m / 2.0, 0.0),
                anchor_b: Vec2::ZERO,
                rest_length: hook_x - config.ground_width_m / 2.0,
                stiffness: config.spring_stiffness,
                damping: config.spring_damping,
            },
        );

        log::info!(
            "tower scene created: ground {}x{} on spring rail",
            config.ground_width_m,
            config.ground_thickness_m
        );

        Self {
            config,
            physics,
            ground,
            entries: Vec::new(),
            next_id: FIRST_LETTER_ID,
            trial_running: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn entries(&self) -> &[LetterEntry] {
        &self.entries
    }

    pub fn trial_running(&self) -> bool {
        self.trial_running
    }

    // -- Letters ----------------------------------------------------------

    /// Add a letter at an explicit pose.
    pub fn add_letter(&mut self, letter: Letter, position: Vec2, angle: f32) -> Result<LetterId> {
        let fragments = letter_fragments(letter, &self.config)?;
        let id = LetterId(self.next_id);
        self.next_id += 1;
        let body = self
            .physics
            .create_compound_body(
                BodyId(id.0),
                &BodyDesc::dynamic()
                    .with_position(position)
                    .with_rotation(angle)
                    .with_damping(self.config.sandbox_damping, self.config.sandbox_damping)
                    .with_collision_response(false)
                    .with_mass(self.config.letter_mass)
                    .with_can_sleep(false),
                &fragments,
                self.letter_material(),
            )
            .ok_or(Error::BadFragment)?;
        log::debug!("added letter {} as {:?}", letter.as_char(), id);
        self.entries.push(LetterEntry {
            id,
            letter,
            role: Role::Manipulable,
            body,
            fragments,
            twin: None,
        });
        Ok(id)
    }

    /// Add a letter at the default drop spot: above the current tallest
    /// letter, or above the ground platform when the scene is empty.
    pub fn add_letter_default(&mut self, letter: Letter) -> Result<LetterId> {
        let fragments = letter_fragments(letter, &self.config)?;
        let local_min_y = fragments
            .iter()
            .flat_map(|f| f.vertices.iter().map(move |v| v.y + f.offset.y))
            .fold(f32::INFINITY, f32::min);

        let floor_y = self
            .entries
            .iter()
            .filter(|e| e.role == Role::Manipulable)
            .filter_map(|e| self.physics.body_aabb(&e.body))
            .map(|(_, max)| max.y)
            .fold(f32::NEG_INFINITY, f32::max);
        let floor_y = if floor_y.is_finite() {
            floor_y
        } else {
            self.ground_top_center().y
        };

        let position = Vec2::new(0.0, floor_y + DROP_CLEARANCE - local_min_y);
        self.add_letter(letter, position, 0.0)
    }

    /// Reposition a manipulable letter while arranging. Shadows and their
    /// running twins keep their poses; moving those would falsify the trial.
    pub fn move_letter(&mut self, id: LetterId, position: Vec2, angle: f32) -> bool {
        let Some(entry) = self.entries.iter().find(|e| e.id == id) else {
            log::warn!("move_letter: {:?} not in scene", id);
            return false;
        };
        if entry.role != Role::Manipulable {
            log::warn!("move_letter: {:?} is {:?}, not manipulable", id, entry.role);
            return false;
        }
        self.physics.set_position(&entry.body, position, angle);
        self.physics.set_velocity(&entry.body, Vec2::ZERO);
        self.physics.set_angular_velocity(&entry.body, 0.0);
        true
    }

    /// Remove a letter slot entirely, trial twin included.
    pub fn remove_letter(&mut self, id: LetterId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            log::warn!("remove_letter: {:?} not in scene", id);
            return false;
        };
        let entry = self.entries.remove(index);
        self.physics.remove_body(&entry.body);
        if let Some(twin) = &entry.twin {
            self.physics.remove_body(twin);
        }
        true
    }

    /// Remove every letter. The ground and its spring stay.
    pub fn clear_letters(&mut self) {
        for entry in self.entries.drain(..) {
            self.physics.remove_body(&entry.body);
            if let Some(twin) = &entry.twin {
                self.physics.remove_body(twin);
            }
        }
    }

    pub fn has_manipulable_letters(&self) -> bool {
        self.entries.iter().any(|e| e.role == Role::Manipulable)
    }

    /// Id of the letter whose sandbox body contains the point, if any.
    pub fn letter_at_point(&self, point: Vec2) -> Option<LetterId> {
        let hit = self.physics.body_at_point(point)?;
        self.entries
            .iter()
            .find(|e| e.id.0 == hit.0)
            .map(|e| e.id)
    }

    // -- Trial lifecycle --------------------------------------------------

    /// Spawn trial twins for every manipulable letter, freeze the
    /// originals as shadows, and switch gravity on. Calling this with a
    /// trial already running rebuilds the twins from scratch.
    pub fn start_trial(&mut self) -> Result<()> {
        if !self.has_manipulable_letters() && !self.trial_running {
            return Err(Error::NoLetters);
        }
        self.discard_twins();

        let trial_desc = |position: Vec2, angle: f32, config: &GameConfig| {
            BodyDesc::dynamic()
                .with_position(position)
                .with_rotation(angle)
                .with_damping(config.trial_damping, config.trial_damping)
                .with_mass(config.letter_mass)
                .with_can_sleep(false)
        };

        // Build every twin before touching any entry, so a failed build
        // leaves the scene exactly as it was.
        let material = self.letter_material();
        let mut twins = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let (position, angle) = self.physics.body_position(&entry.body);
            let twin = self.physics.create_compound_body(
                BodyId(entry.id.0),
                &trial_desc(position, angle, &self.config),
                &entry.fragments,
                material,
            );
            let Some(twin) = twin else {
                for built in &twins {
                    self.physics.remove_body(built);
                }
                return Err(Error::BadFragment);
            };
            twins.push(twin);
        }

        for (entry, twin) in self.entries.iter_mut().zip(twins) {
            entry.twin = Some(twin);
            entry.role = Role::Shadow;
            self.physics.set_body_type(&entry.body, BodyType::Fixed);
        }

        self.physics
            .set_gravity(Vec2::new(0.0, self.config.gravity_y));
        self.trial_running = true;
        log::info!("trial started with {} letters", self.entries.len());
        Ok(())
    }

    /// Discard trial twins, thaw the shadows back into manipulable
    /// letters, and switch gravity off. Safe to call when no trial runs.
    pub fn stop_trial(&mut self) {
        self.discard_twins();
        for entry in &mut self.entries {
            if entry.role == Role::Shadow {
                entry.role = Role::Manipulable;
                self.physics.set_body_type(&entry.body, BodyType::Dynamic);
                self.physics.set_velocity(&entry.body, Vec2::ZERO);
                self.physics.set_angular_velocity(&entry.body, 0.0);
            }
        }
        self.physics.set_gravity(Vec2::ZERO);
        if self.trial_running {
            log::info!("trial stopped");
        }
        self.trial_running = false;
    }

    fn discard_twins(&mut self) {
        for entry in &mut self.entries {
            if let Some(twin) = entry.twin.take() {
                self.physics.remove_body(&twin);
            }
        }
    }

    /// The earthquake: kick the ground platform sideways. The spring and
    /// the platform's rail do the rest.
    pub fn apply_shake(&mut self) {
        self.physics
            .set_velocity(&self.ground, Vec2::new(self.config.push_velocity, 0.0));
        log::info!("shake applied: ground velocity {}", self.config.push_velocity);
    }

    /// Top-center of the ground platform in its current pose. Layouts are
    /// stored relative to this point.
    pub fn ground_top_center(&self) -> Vec2 {
        let (pos, _) = self.physics.body_position(&self.ground);
        Vec2::new(pos.x, pos.y + self.config.ground_thickness_m / 2.0)
    }

    pub fn ground_velocity(&self) -> Vec2 {
        self.physics.velocity(&self.ground)
    }

    pub fn step(&mut self, dt: f32) {
        self.physics.step(dt);
    }

    // -- Read access ------------------------------------------------------

    /// Bodies currently carrying the given role. `Trial` yields the twins.
    pub fn bodies_with_role(&self, role: Role) -> impl Iterator<Item = (LetterId, &PhysicsBody)> {
        self.entries.iter().filter_map(move |entry| match role {
            Role::Trial => entry.twin.as_ref().map(|twin| (entry.id, twin)),
            _ if entry.role == role => Some((entry.id, &entry.body)),
            _ => None,
        })
    }

    /// Pose snapshots of every letter body, twins included.
    pub fn letter_states(&self) -> Vec<LetterState> {
        let mut states = Vec::with_capacity(self.entries.len() * 2);
        for entry in &self.entries {
            let (position, angle) = self.physics.body_position(&entry.body);
            states.push(LetterState {
                id: entry.id,
                letter: entry.letter,
                role: entry.role,
                position,
                angle,
            });
            if let Some(twin) = &entry.twin {
                let (position, angle) = self.physics.body_position(twin);
                states.push(LetterState {
                    id: entry.id,
                    letter: entry.letter,
                    role: Role::Trial,
                    position,
                    angle,
                });
            }
        }
        states
    }

    fn letter_material(&self) -> ColliderMaterial {
        ColliderMaterial {
            friction: self.config.wood_friction,
            restitution: 0.0,
            density: 1.0,
        }
    }
}
