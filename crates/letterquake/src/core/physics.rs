use glam::Vec2;
use rapier2d::prelude::*;

use crate::letters::builder::Fragment;

// ---------------------------------------------------------------------------
// Conversion helpers (private) — glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Identifier stored in a body's `user_data`, letting handles be mapped
/// back to game objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
    KinematicVelocityBased,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
            BodyType::KinematicVelocityBased => RigidBodyType::KinematicVelocityBased,
        }
    }
}

/// Physical material properties for colliders.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// When false the body's colliders are sensors: they keep their mass
    /// and shape but never resolve contacts (sandbox letters overlap
    /// freely while arranging; shadow placeholders never push anything).
    pub collision_response: bool,
    /// Pin the body to its horizontal rail (the shake platform).
    pub lock_vertical: bool,
    pub lock_rotation: bool,
    /// Target total mass. Collider densities are rescaled after creation
    /// so the compound body sums to exactly this, preserving the inertia
    /// distribution of the real shape.
    pub mass: Option<f32>,
    /// Sleeping zeroes velocities outside our thresholds, so bodies whose
    /// stillness we measure keep it disabled.
    pub can_sleep: bool,
}

impl BodyDesc {
    pub fn dynamic() -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            rotation: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            collision_response: true,
            lock_vertical: false,
            lock_rotation: false,
            mass: None,
            can_sleep: true,
        }
    }

    pub fn fixed() -> Self {
        Self {
            body_type: BodyType::Fixed,
            ..Self::dynamic()
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_collision_response(mut self, enabled: bool) -> Self {
        self.collision_response = enabled;
        self
    }

    pub fn with_lock_vertical(mut self, locked: bool) -> Self {
        self.lock_vertical = locked;
        self
    }

    pub fn with_lock_rotation(mut self, locked: bool) -> Self {
        self.lock_rotation = locked;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    fn locked_axes(&self) -> LockedAxes {
        let mut axes = LockedAxes::empty();
        if self.lock_vertical {
            axes |= LockedAxes::TRANSLATION_LOCKED_Y;
        }
        if self.lock_rotation {
            axes |= LockedAxes::ROTATION_LOCKED;
        }
        axes
    }
}

/// Handle pair referencing Rapier internals. Compound bodies own several
/// colliders; `colliders[0]` always exists.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub colliders: Vec<ColliderHandle>,
}

/// Linear spring between two bodies, anchored at local points.
#[derive(Debug, Clone, Copy)]
pub struct SpringDesc {
    pub anchor_a: Vec2,
    pub anchor_b: Vec2,
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single, easy-to-use struct.
/// Y is up; gravity points down when enabled.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// The gravity switch: zero while arranging, full downward in a trial.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vec2_to_na(gravity);
        // Wake everything so a fresh gravity vector takes hold immediately.
        for (_, body) in self.bodies.iter_mut() {
            body.wake_up(true);
        }
    }

    pub fn gravity(&self) -> Vec2 {
        na_to_vec2(&self.gravity)
    }

    /// Create a compound body with one convex collider per fragment, each
    /// placed at its local offset. Returns `None` only if every fragment is
    /// rejected by the hull builder, which a valid decomposition never is.
    pub fn create_compound_body(
        &mut self,
        id: BodyId,
        desc: &BodyDesc,
        fragments: &[Fragment],
        material: ColliderMaterial,
    ) -> Option<PhysicsBody> {
        let body_handle = self.insert_body(id, desc);
        let mut colliders = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let points: Vec<Point<f32>> = fragment
                .vertices
                .iter()
                .map(|v| Point::new(v.x, v.y))
                .collect();
            let Some(builder) = ColliderBuilder::convex_hull(&points) else {
                log::warn!("fragment rejected by convex hull builder; skipping");
                continue;
            };
            let collider = builder
                .translation(vec2_to_na(fragment.offset))
                .friction(material.friction)
                .restitution(material.restitution)
                .density(material.density)
                .sensor(!desc.collision_response)
                .build();
            colliders.push(self.colliders.insert_with_parent(
                collider,
                body_handle,
                &mut self.bodies,
            ));
        }
        if colliders.is_empty() {
            self.bodies.remove(
                body_handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
            return None;
        }
        if let Some(mass) = desc.mass {
            self.rescale_mass(body_handle, &colliders, mass);
        }
        Some(PhysicsBody {
            body_handle,
            colliders,
        })
    }

    /// Create a body with a single box collider (the ground platform).
    pub fn create_box_body(
        &mut self,
        id: BodyId,
        desc: &BodyDesc,
        half_extents: Vec2,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let body_handle = self.insert_body(id, desc);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .friction(material.friction)
            .restitution(material.restitution)
            .density(material.density)
            .sensor(!desc.collision_response)
            .build();
        let handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        let colliders = vec![handle];
        if let Some(mass) = desc.mass {
            self.rescale_mass(body_handle, &colliders, mass);
        }
        PhysicsBody {
            body_handle,
            colliders,
        }
    }

    fn insert_body(&mut self, id: BodyId, desc: &BodyDesc) -> RigidBodyHandle {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .position(nalgebra::Isometry2::new(
                vec2_to_na(desc.position),
                desc.rotation,
            ))
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .locked_axes(desc.locked_axes())
            .can_sleep(desc.can_sleep)
            .user_data(id.0 as u128)
            .build();
        self.bodies.insert(rb)
    }

    /// Scale collider densities so the body's total mass hits `target`,
    /// keeping the mass distribution (and so the inertia) of the shape.
    fn rescale_mass(&mut self, body: RigidBodyHandle, colliders: &[ColliderHandle], target: f32) {
        let Some(rb) = self.bodies.get(body) else {
            return;
        };
        let current = rb.mass();
        if current <= f32::EPSILON {
            return;
        }
        let factor = target / current;
        for &handle in colliders {
            if let Some(collider) = self.colliders.get_mut(handle) {
                let density = collider.density();
                collider.set_density(density * factor);
            }
        }
        // Density edits outside a step are deferred; flush them so the
        // body's mass reads back correctly immediately.
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Step the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    // -- Mutators. Missing bodies are silent no-ops: step callbacks fire on
    // -- a schedule independent of body lifetime.

    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    pub fn set_angular_velocity(&mut self, body: &PhysicsBody, angvel: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_angvel(angvel, true);
        }
    }

    pub fn set_body_type(&mut self, body: &PhysicsBody, body_type: BodyType) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_body_type(body_type.to_rapier(), true);
        }
    }

    pub fn set_position(&mut self, body: &PhysicsBody, pos: Vec2, rotation: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_position(
                nalgebra::Isometry2::new(vec2_to_na(pos), rotation),
                true,
            );
        }
    }

    // -- Queries. Missing bodies return inert defaults.

    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn angular_velocity(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.angvel())
            .unwrap_or(0.0)
    }

    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    pub fn body_mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.mass())
            .unwrap_or(0.0)
    }

    /// Current world-space bounding box of the body, merged over all of its
    /// colliders and recomputed from their present poses. `None` when the
    /// body (or all its colliders) is gone.
    pub fn body_aabb(&self, body: &PhysicsBody) -> Option<(Vec2, Vec2)> {
        let mut merged: Option<(Vec2, Vec2)> = None;
        for &handle in &body.colliders {
            let Some(collider) = self.colliders.get(handle) else {
                continue;
            };
            let aabb = collider.compute_aabb();
            let min = Vec2::new(aabb.mins.x, aabb.mins.y);
            let max = Vec2::new(aabb.maxs.x, aabb.maxs.y);
            merged = Some(match merged {
                Some((lo, hi)) => (lo.min(min), hi.max(max)),
                None => (min, max),
            });
        }
        merged
    }

    /// Hit test for interaction layers: the id of the topmost body whose
    /// collider contains the point, if any.
    pub fn body_at_point(&self, point: Vec2) -> Option<BodyId> {
        let p = Point::new(point.x, point.y);
        for (_, collider) in self.colliders.iter() {
            if collider.shape().contains_point(collider.position(), &p) {
                let body = collider.parent().and_then(|h| self.bodies.get(h))?;
                return Some(BodyId(body.user_data as u32));
            }
        }
        None
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- Joints --

    pub fn create_spring(&mut self, body_a: &PhysicsBody, body_b: &PhysicsBody, desc: &SpringDesc) {
        let joint = SpringJointBuilder::new(desc.rest_length, desc.stiffness, desc.damping)
            .local_anchor1(Point::new(desc.anchor_a.x, desc.anchor_a.y))
            .local_anchor2(Point::new(desc.anchor_b.x, desc.anchor_b.y))
            .build();
        self.impulse_joints.insert(body_a.body_handle, body_b.body_handle, joint, true);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn square_fragment(offset: Vec2, half: f32) -> Fragment {
        Fragment {
            vertices: vec![
                Vec2::new(-half, -half),
                Vec2::new(half, -half),
                Vec2::new(half, half),
                Vec2::new(-half, half),
            ],
            offset,
            area: (2.0 * half) * (2.0 * half),
        }
    }

    fn spawn_unit_box(world: &mut PhysicsWorld, id: u32, desc: &BodyDesc) -> PhysicsBody {
        world
            .create_compound_body(
                BodyId(id),
                desc,
                &[square_fragment(Vec2::ZERO, 0.5)],
                ColliderMaterial::default(),
            )
            .expect("hull accepted")
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = spawn_unit_box(&mut world, 1, &BodyDesc::dynamic());
        assert_eq!(world.body_count(), 1);
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn gravity_pulls_dynamic_bodies_down() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -9.81));
        let body = spawn_unit_box(
            &mut world,
            1,
            &BodyDesc::dynamic().with_position(Vec2::new(0.0, 5.0)),
        );
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        let (pos, _) = world.body_position(&body);
        assert!(pos.y < 5.0, "body should fall: y={}", pos.y);
    }

    #[test]
    fn gravity_switch_takes_effect_mid_run() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = spawn_unit_box(
            &mut world,
            1,
            &BodyDesc::dynamic().with_position(Vec2::new(0.0, 5.0)),
        );
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        let (before, _) = world.body_position(&body);
        assert!((before.y - 5.0).abs() < 1e-4, "no drift without gravity");

        world.set_gravity(Vec2::new(0.0, -9.81));
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        let (after, _) = world.body_position(&body);
        assert!(after.y < before.y, "body should fall after switch");
    }

    #[test]
    fn compound_body_reaches_target_mass() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let fragments = vec![
            square_fragment(Vec2::new(-1.0, 0.0), 0.5),
            square_fragment(Vec2::new(1.0, 0.0), 0.25),
        ];
        let body = world
            .create_compound_body(
                BodyId(1),
                &BodyDesc::dynamic().with_mass(20.0),
                &fragments,
                ColliderMaterial::default(),
            )
            .unwrap();
        assert!((world.body_mass(&body) - 20.0).abs() < 1e-3);
    }

    #[test]
    fn sensors_do_not_collide() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -9.81));
        let _floor = world.create_box_body(
            BodyId(1),
            &BodyDesc::fixed().with_position(Vec2::new(0.0, -1.0)),
            Vec2::new(10.0, 0.5),
            ColliderMaterial::default(),
        );
        let ghost = spawn_unit_box(
            &mut world,
            2,
            &BodyDesc::dynamic()
                .with_position(Vec2::new(0.0, 2.0))
                .with_collision_response(false),
        );
        for _ in 0..240 {
            world.step(1.0 / 60.0);
        }
        let (pos, _) = world.body_position(&ghost);
        assert!(pos.y < -1.0, "sensor body should fall through: y={}", pos.y);
    }

    #[test]
    fn solid_body_lands_on_floor() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -9.81));
        let _floor = world.create_box_body(
            BodyId(1),
            &BodyDesc::fixed().with_position(Vec2::new(0.0, -0.5)),
            Vec2::new(10.0, 0.5),
            ColliderMaterial::default(),
        );
        let box_body = spawn_unit_box(
            &mut world,
            2,
            &BodyDesc::dynamic()
                .with_position(Vec2::new(0.0, 3.0))
                .with_can_sleep(false),
        );
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let (pos, _) = world.body_position(&box_body);
        // Resting pose: half extent above the floor surface (y = 0).
        assert!((pos.y - 0.5).abs() < 0.1, "box should rest on floor: y={}", pos.y);
        assert!(world.velocity(&box_body).length() < 0.05);
    }

    #[test]
    fn locked_axes_keep_platform_on_rail() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -9.81));
        let platform = world.create_box_body(
            BodyId(1),
            &BodyDesc::dynamic()
                .with_position(Vec2::new(0.0, 1.0))
                .with_lock_vertical(true)
                .with_lock_rotation(true)
                .with_can_sleep(false),
            Vec2::new(4.0, 0.25),
            ColliderMaterial::default(),
        );
        world.set_velocity(&platform, Vec2::new(3.0, 0.0));
        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }
        let (pos, rot) = world.body_position(&platform);
        assert!((pos.y - 1.0).abs() < 1e-4, "must not sink: y={}", pos.y);
        assert!(rot.abs() < 1e-5);
        assert!(pos.x > 0.5, "must slide sideways: x={}", pos.x);
    }

    #[test]
    fn spring_pulls_platform_back() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let platform = world.create_box_body(
            BodyId(1),
            &BodyDesc::dynamic()
                .with_lock_vertical(true)
                .with_lock_rotation(true)
                .with_mass(50.0)
                .with_can_sleep(false),
            Vec2::new(4.0, 0.25),
            ColliderMaterial::default(),
        );
        let anchor = world.create_box_body(
            BodyId(2),
            &BodyDesc::fixed()
                .with_position(Vec2::new(10.0, 0.0))
                .with_collision_response(false),
            Vec2::new(0.1, 0.1),
            ColliderMaterial::default(),
        );
        world.create_spring(
            &platform,
            &anchor,
            &SpringDesc {
                anchor_a: Vec2::new(4.0, 0.0),
                anchor_b: Vec2::ZERO,
                rest_length: 6.0,
                stiffness: 1500.0,
                damping: 500.0,
            },
        );
        world.set_velocity(&platform, Vec2::new(3.0, 0.0));
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let (pos, _) = world.body_position(&platform);
        // Heavily damped spring returns the platform near its rest pose.
        assert!(pos.x.abs() < 0.5, "platform should come back: x={}", pos.x);
    }

    #[test]
    fn body_aabb_tracks_pose() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = spawn_unit_box(
            &mut world,
            1,
            &BodyDesc::dynamic().with_position(Vec2::new(2.0, 3.0)),
        );
        let (min, max) = world.body_aabb(&body).unwrap();
        assert!((min.y - 2.5).abs() < 1e-4);
        assert!((max.y - 3.5).abs() < 1e-4);
        assert!((min.x - 1.5).abs() < 1e-4);
        assert!((max.x - 2.5).abs() < 1e-4);
    }

    #[test]
    fn body_at_point_finds_owner() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let _body = spawn_unit_box(
            &mut world,
            7,
            &BodyDesc::dynamic().with_position(Vec2::new(1.0, 1.0)),
        );
        assert_eq!(world.body_at_point(Vec2::new(1.1, 0.9)), Some(BodyId(7)));
        assert_eq!(world.body_at_point(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn missing_body_is_a_silent_no_op() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = spawn_unit_box(&mut world, 1, &BodyDesc::dynamic());
        world.remove_body(&body);
        world.set_velocity(&body, Vec2::new(1.0, 0.0));
        assert_eq!(world.velocity(&body), Vec2::ZERO);
        assert_eq!(world.body_aabb(&body), None);
    }
}
