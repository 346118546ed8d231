//! Player locomotion controller.
//!
//! Each tick the controller reads the input state, the camera orientation and
//! a snapshot of the player body, and produces a body command plus the camera
//! position. Horizontal velocity is overwritten every tick; vertical velocity
//! belongs to physics except when a jump replaces it.

use glam::{Quat, Vec3};
use polystrike_physics::{BodyCommand, BodySnapshot};
use serde::{Deserialize, Serialize};

use crate::camera::heading;
use crate::input::InputState;

/// Configuration for player locomotion.
///
/// All values use metric units (meters, seconds) unless otherwise noted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Horizontal speed whenever a movement key is held (meters/second).
    pub speed: f32,

    /// Vertical velocity set by a jump (meters/second).
    pub jump_velocity: f32,

    /// Camera height above the body center (meters).
    pub eye_height: f32,

    /// Below this height the body is considered lost and respawned.
    pub fall_threshold: f32,

    /// Where the body is placed on spawn and on fall recovery.
    pub spawn_point: Vec3,

    /// Vertical speed under which the body counts as grounded.
    pub grounded_epsilon: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            jump_velocity: 4.0,
            eye_height: 0.8,
            fall_threshold: -5.0,
            spawn_point: Vec3::new(-10.0, 2.0, -10.0),
            grounded_epsilon: 0.1,
        }
    }
}

/// Result of one controller tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionOutput {
    /// Command to apply to the body before the next physics step.
    pub body: BodyCommand,

    /// New camera position.
    pub camera_position: Vec3,

    /// A jump was started this tick.
    pub jumped: bool,

    /// The body was reset to spawn this tick.
    pub recovered: bool,
}

/// Player locomotion controller.
///
/// Stateless: every call depends only on its arguments.
///
/// # Example
///
/// ```ignore
/// let controller = LocomotionController::new(LocomotionConfig::default());
///
/// // Each tick:
/// let output = controller.step(&input, camera.orientation, body_snapshot);
/// physics.apply(player, &output.body);
/// camera.position = output.camera_position;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocomotionController {
    /// Locomotion configuration.
    pub config: LocomotionConfig,
}

impl LocomotionController {
    /// Create a controller with the given configuration.
    pub fn new(config: LocomotionConfig) -> Self {
        Self { config }
    }

    /// Run one tick.
    pub fn step(&self, input: &InputState, orientation: Quat, body: BodySnapshot) -> LocomotionOutput {
        let eye_offset = Vec3::new(0.0, self.config.eye_height, 0.0);

        // Fell through the world: put the body back and skip this tick's movement
        if body.position.y < self.config.fall_threshold {
            tracing::info!(
                "body fell to y={:.2}, resetting to spawn {:?}",
                body.position.y,
                self.config.spawn_point
            );
            return LocomotionOutput {
                body: BodyCommand::teleport(self.config.spawn_point, Vec3::ZERO),
                camera_position: self.config.spawn_point + eye_offset,
                jumped: false,
                recovered: true,
            };
        }

        let camera_position = body.position + eye_offset;

        let horizontal = self.wish_velocity(input, orientation);
        let mut velocity = Vec3::new(horizontal.x, body.velocity.y, horizontal.z);

        let jumped = input.jump && self.is_grounded(body);
        if jumped {
            velocity.y = self.config.jump_velocity;
        }

        LocomotionOutput {
            body: BodyCommand::velocity(velocity),
            camera_position,
            jumped,
            recovered: false,
        }
    }

    /// Camera-relative horizontal velocity for the held movement keys.
    ///
    /// Zero when no key is held or opposing keys cancel; otherwise exactly
    /// `speed` long in the XZ plane.
    pub fn wish_velocity(&self, input: &InputState, orientation: Quat) -> Vec3 {
        let local = Self::wish_direction(input);
        if local == Vec3::ZERO {
            return Vec3::ZERO;
        }
        heading(orientation) * (local * self.config.speed)
    }

    /// Unit movement direction in camera space (-Z forward, +X right).
    pub fn wish_direction(input: &InputState) -> Vec3 {
        let forward = axis(input.backward, input.forward);
        let strafe = axis(input.right, input.left);
        Vec3::new(strafe, 0.0, forward).normalize_or_zero()
    }

    /// Grounded heuristic: near-zero vertical velocity.
    ///
    /// Also true at the apex of a jump and while sliding down a wall.
    #[inline]
    pub fn is_grounded(&self, body: BodySnapshot) -> bool {
        body.velocity.y.abs() < self.config.grounded_epsilon
    }
}

#[inline]
fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

// ============================================================================
// Tests
// ============================================================================
