//! Rigid bodies and the values exchanged with their owners.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::ContentFlags;

/// Opaque handle to a body inside a [`PhysicsWorld`](super::PhysicsWorld).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// How a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Integrated every step (gravity, damping, contacts).
    Dynamic,
    /// Never moves on its own; only explicit commands change it.
    Static,
}

/// Construction parameters for a sphere body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Dynamic or static.
    pub kind: BodyKind,

    /// Initial position (sphere center).
    pub position: Vec3,

    /// Sphere radius (meters).
    pub radius: f32,

    /// Mass (kg). Zero mass bodies are treated as static.
    pub mass: f32,

    /// Fraction of velocity lost per second (0..1).
    pub linear_damping: f32,

    /// If set, the body never rotates.
    pub fixed_rotation: bool,

    /// Which brushes the body collides with.
    pub collision_mask: ContentFlags,
}

impl BodyDesc {
    /// A dynamic sphere with default damping, colliding with player solids.
    pub fn dynamic_sphere(position: Vec3, radius: f32, mass: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position,
            radius,
            mass,
            linear_damping: 0.01,
            fixed_rotation: false,
            collision_mask: ContentFlags::MASK_PLAYER_SOLID,
        }
    }

    /// Set the linear damping coefficient.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping.clamp(0.0, 1.0);
        self
    }

    /// Lock rotation.
    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }
}

/// A simulated sphere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    /// Handle of this body.
    pub handle: BodyHandle,

    /// Dynamic or static.
    pub kind: BodyKind,

    /// Center position in world space.
    pub position: Vec3,

    /// Linear velocity in world space (meters/second).
    pub velocity: Vec3,

    /// Orientation. Stays at identity for fixed-rotation bodies.
    pub orientation: Quat,

    /// Angular velocity (radians/second). Always zero for fixed-rotation bodies.
    pub angular_velocity: Vec3,

    /// Sphere radius.
    pub radius: f32,

    /// Mass (kg).
    pub mass: f32,

    /// Fraction of velocity lost per second.
    pub linear_damping: f32,

    /// Rotation lock.
    pub fixed_rotation: bool,

    /// Which brushes the body collides with.
    pub collision_mask: ContentFlags,
}

impl RigidBody {
    pub(crate) fn from_desc(handle: BodyHandle, desc: &BodyDesc) -> Self {
        let kind = if desc.mass > 0.0 { desc.kind } else { BodyKind::Static };
        Self {
            handle,
            kind,
            position: desc.position,
            velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            angular_velocity: Vec3::ZERO,
            radius: desc.radius,
            mass: desc.mass,
            linear_damping: desc.linear_damping,
            fixed_rotation: desc.fixed_rotation,
            collision_mask: desc.collision_mask,
        }
    }

    /// Whether the body is integrated by the world.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Copy out the position and velocity.
    #[inline]
    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            position: self.position,
            velocity: self.velocity,
        }
    }

    /// Overwrite velocity (and optionally position) from a command.
    pub fn apply(&mut self, command: &BodyCommand) {
        if let Some(position) = command.position {
            self.position = position;
        }
        self.velocity = command.velocity;
    }
}

/// Position and velocity of a body at one instant.
///
/// Owners read a snapshot once per tick instead of holding references into
/// the physics world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    /// Center position in world space.
    pub position: Vec3,
    /// Linear velocity in world space.
    pub velocity: Vec3,
}

impl BodySnapshot {
    /// Create a snapshot.
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    /// Speed ignoring the vertical axis.
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }
}

/// Write applied to a body before the next physics step.
///
/// Both fields are full overwrites, never deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyCommand {
    /// New linear velocity.
    pub velocity: Vec3,
    /// New position, if the body must be teleported.
    pub position: Option<Vec3>,
}

impl BodyCommand {
    /// Command that only sets velocity.
    pub fn velocity(velocity: Vec3) -> Self {
        Self {
            velocity,
            position: None,
        }
    }

    /// Command that teleports the body and sets velocity.
    pub fn teleport(position: Vec3, velocity: Vec3) -> Self {
        Self {
            velocity,
            position: Some(position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_mass_is_static() {
        let desc = BodyDesc::dynamic_sphere(Vec3::ZERO, 0.5, 0.0);
        let body = RigidBody::from_desc(BodyHandle(0), &desc);
        assert!(!body.is_dynamic());
    }

    #[test]
    fn test_apply_overwrites() {
        let desc = BodyDesc::dynamic_sphere(Vec3::ZERO, 0.5, 1.0);
        let mut body = RigidBody::from_desc(BodyHandle(0), &desc);
        body.velocity = Vec3::new(3.0, 3.0, 3.0);

        body.apply(&BodyCommand::velocity(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(body.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(body.position, Vec3::ZERO);

        body.apply(&BodyCommand::teleport(Vec3::new(5.0, 2.0, 5.0), Vec3::ZERO));
        assert_eq!(body.position, Vec3::new(5.0, 2.0, 5.0));
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_damping_is_clamped() {
        let desc = BodyDesc::dynamic_sphere(Vec3::ZERO, 0.5, 1.0).with_linear_damping(1.5);
        assert_eq!(desc.linear_damping, 1.0);
    }
}
