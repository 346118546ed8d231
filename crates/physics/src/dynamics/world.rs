//! The rigid-body world: bodies plus static collision geometry.

use glam::{Quat, Vec3};

use crate::collision::CollisionWorld;

use super::body::{BodyCommand, BodyDesc, BodyHandle, BodySnapshot, RigidBody};
use super::config::PhysicsConfig;

/// Rigid-body host.
///
/// Owns every body and the static [`CollisionWorld`]. Callers read
/// [`BodySnapshot`]s, write [`BodyCommand`]s, then call [`step`](Self::step);
/// commands applied before a step are inputs to that step.
///
/// # Example
///
/// ```ignore
/// let mut world = PhysicsWorld::new(PhysicsConfig::default());
/// let player = world.add_body(BodyDesc::dynamic_sphere(spawn, 0.6, 1.0));
///
/// // Each tick:
/// let snapshot = world.snapshot(player);
/// world.apply(player, &command);
/// world.step(delta_time);
/// ```
#[derive(Debug)]
pub struct PhysicsWorld {
    /// Stepping configuration.
    pub config: PhysicsConfig,

    /// Static geometry.
    statics: CollisionWorld,

    /// All bodies, dynamic and static.
    bodies: Vec<RigidBody>,

    /// Unsimulated time carried to the next step (seconds).
    accumulator: f32,

    /// Next body handle to assign.
    next_handle: u32,
}

impl PhysicsWorld {
    /// Create an empty world.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            statics: CollisionWorld::new(),
            bodies: Vec::new(),
            accumulator: 0.0,
            next_handle: 0,
        }
    }

    /// Static geometry.
    pub fn statics(&self) -> &CollisionWorld {
        &self.statics
    }

    /// Mutable static geometry, for level setup.
    pub fn statics_mut(&mut self) -> &mut CollisionWorld {
        &mut self.statics
    }

    /// Add a body and return its handle.
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.push(RigidBody::from_desc(handle, &desc));
        handle
    }

    /// Remove a body. Returns `false` if the handle was unknown.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.handle != handle);
        self.bodies.len() != before
    }

    /// Number of bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get a body by handle.
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.handle == handle)
    }

    /// Get a mutable body by handle.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.iter_mut().find(|b| b.handle == handle)
    }

    /// Read a body's current position and velocity.
    pub fn snapshot(&self, handle: BodyHandle) -> Option<BodySnapshot> {
        self.body(handle).map(RigidBody::snapshot)
    }

    /// Apply a command to a body. Returns `false` if the handle was unknown.
    pub fn apply(&mut self, handle: BodyHandle, command: &BodyCommand) -> bool {
        match self.body_mut(handle) {
            Some(body) => {
                body.apply(command);
                true
            }
            None => false,
        }
    }

    /// Advance the world by `delta_time` seconds.
    ///
    /// Time is consumed in fixed sub-steps; leftover time is carried to the
    /// next call. Returns the number of sub-steps taken.
    pub fn step(&mut self, delta_time: f32) -> u32 {
        let h = self.config.fixed_timestep;
        if h <= 0.0 || !delta_time.is_finite() || delta_time <= 0.0 {
            return 0;
        }

        self.accumulator += delta_time;

        let mut steps = 0;
        while self.accumulator >= h && steps < self.config.max_substeps {
            self.substep(h);
            self.accumulator -= h;
            steps += 1;
        }

        if steps == self.config.max_substeps && self.accumulator >= h {
            tracing::trace!("physics dropped {:.3}s of backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        steps
    }

    // ========================================================================
    // Integration
    // ========================================================================

    fn substep(&mut self, h: f32) {
        let gravity = self.config.gravity;
        let iterations = self.config.contact_iterations;
        let slop = self.config.contact_slop;

        for body in self.bodies.iter_mut().filter(|b| b.is_dynamic()) {
            // Velocity: gravity then exponential damping
            body.velocity += gravity * h;
            body.velocity *= (1.0 - body.linear_damping).powf(h);

            // Rotation
            if body.fixed_rotation {
                body.angular_velocity = Vec3::ZERO;
                body.orientation = Quat::IDENTITY;
            } else {
                integrate_orientation(body, h);
            }

            // Position
            body.position += body.velocity * h;

            resolve_contacts(&self.statics, body, iterations, slop);
        }
    }
}

fn integrate_orientation(body: &mut RigidBody, h: f32) {
    let angle = body.angular_velocity.length() * h;
    if angle > 1e-6 {
        let axis = body.angular_velocity.normalize();
        body.orientation = (Quat::from_axis_angle(axis, angle) * body.orientation).normalize();
    }
}

/// Push a body out of every brush it penetrates and remove the velocity
/// component pointing into each surface.
fn resolve_contacts(statics: &CollisionWorld, body: &mut RigidBody, iterations: u32, slop: f32) {
    for _ in 0..iterations {
        let contacts = statics.sphere_contacts(body.position, body.radius, body.collision_mask);
        if contacts.is_empty() {
            return;
        }

        for contact in contacts {
            body.position += contact.normal * (contact.depth + slop);

            let into_surface = body.velocity.dot(contact.normal);
            if into_surface < 0.0 {
                body.velocity -= contact.normal * into_surface;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ContentFlags;

    fn create_test_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        world
            .statics_mut()
            .add_plane(Vec3::ZERO, Vec3::Y, ContentFlags::FLOOR);
        world
    }

    fn player_desc(position: Vec3) -> BodyDesc {
        BodyDesc::dynamic_sphere(position, 0.6, 1.0)
            .with_linear_damping(0.9)
            .with_fixed_rotation(true)
    }

    #[test]
    fn test_gravity() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default()); // No floor - free fall
        let body = world.add_body(player_desc(Vec3::new(0.0, 10.0, 0.0)));

        world.step(0.1);

        let snapshot = world.snapshot(body).unwrap();
        assert!(snapshot.velocity.y < 0.0, "Should be falling");
        assert!(snapshot.position.y < 10.0);
    }

    #[test]
    fn test_body_settles_on_floor() {
        let mut world = create_test_world();
        let body = world.add_body(player_desc(Vec3::new(0.0, 2.0, 0.0)));

        for _ in 0..180 {
            world.step(1.0 / 60.0);
        }

        let snapshot = world.snapshot(body).unwrap();
        assert!((snapshot.position.y - 0.6).abs() < 0.01, "y={}", snapshot.position.y);
        assert!(snapshot.velocity.y.abs() < 0.1, "vy={}", snapshot.velocity.y);
    }

    #[test]
    fn test_wall_blocks_horizontal_motion() {
        let mut world = create_test_world();
        world.statics_mut().add_box(
            Vec3::new(3.0, 1.5, 0.0),
            Vec3::new(1.0, 1.5, 1.0),
            ContentFlags::SOLID,
        );
        let body = world.add_body(player_desc(Vec3::new(0.0, 0.6, 0.0)));

        for _ in 0..120 {
            let mut snapshot = world.snapshot(body).unwrap();
            snapshot.velocity.x = 5.0;
            world.apply(body, &BodyCommand::velocity(snapshot.velocity));
            world.step(1.0 / 60.0);
        }

        let snapshot = world.snapshot(body).unwrap();
        assert!(snapshot.position.x <= 2.0 - 0.6 + 0.01, "x={}", snapshot.position.x);
    }

    #[test]
    fn test_fixed_rotation_never_rotates() {
        let mut world = create_test_world();
        let handle = world.add_body(player_desc(Vec3::new(0.0, 1.0, 0.0)));
        world.body_mut(handle).unwrap().angular_velocity = Vec3::new(0.0, 5.0, 0.0);

        world.step(0.05);

        let body = world.body(handle).unwrap();
        assert_eq!(body.orientation, Quat::IDENTITY);
        assert_eq!(body.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_free_body_rotates() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let handle = world.add_body(BodyDesc::dynamic_sphere(Vec3::ZERO, 0.5, 1.0));
        world.body_mut(handle).unwrap().angular_velocity = Vec3::new(0.0, 1.0, 0.0);

        world.step(0.05);

        assert_ne!(world.body(handle).unwrap().orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_accumulator_carries_time() {
        let mut world = create_test_world();
        world.add_body(player_desc(Vec3::new(0.0, 5.0, 0.0)));

        // Half a sub-step does nothing, the next half completes it
        assert_eq!(world.step(1.0 / 120.0), 0);
        assert_eq!(world.step(1.0 / 120.0 + 1e-5), 1);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut world = create_test_world();
        world.add_body(player_desc(Vec3::new(0.0, 5.0, 0.0)));

        let steps = world.step(1.0);
        assert_eq!(steps, world.config.max_substeps);
        // Backlog was dropped
        assert_eq!(world.step(1.0 / 120.0), 0);
    }

    #[test]
    fn test_unknown_handle() {
        let mut world = create_test_world();
        assert!(world.snapshot(BodyHandle(42)).is_none());
        assert!(!world.apply(BodyHandle(42), &BodyCommand::default()));
        assert!(!world.remove_body(BodyHandle(42)));
    }

    #[test]
    fn test_static_body_does_not_fall() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let handle = world.add_body(BodyDesc::dynamic_sphere(Vec3::new(0.0, 3.0, 0.0), 0.5, 0.0));

        world.step(0.5);

        assert_eq!(world.snapshot(handle).unwrap().position, Vec3::new(0.0, 3.0, 0.0));
    }
}
