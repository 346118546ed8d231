//! Camera pose and the pointer-lock look device.
//!
//! The camera's orientation belongs to [`PointerLook`], which turns relative
//! mouse motion into yaw/pitch. The locomotion controller only reads that
//! orientation and writes the position.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Camera position and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Eye position in world space.
    pub position: Vec3,

    /// Unit orientation. Identity looks down -Z with +Y up.
    pub orientation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    /// Create a pose.
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Direction the camera looks.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Camera right vector.
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    /// Camera up vector.
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }
}

/// Look sensitivity and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Radians of rotation per pixel of pointer motion.
    pub sensitivity: f32,

    /// Flip vertical look.
    pub invert_y: bool,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.002,
            invert_y: false,
        }
    }
}

/// Pointer-lock look device.
///
/// Accumulates yaw and pitch from pointer motion while the pointer is
/// captured. Orientation uses YXZ order: yaw about world Y, then pitch.
#[derive(Debug, Clone, Default)]
pub struct PointerLook {
    config: LookConfig,
    yaw: f32,
    pitch: f32,
    captured: bool,
}

impl PointerLook {
    /// Clamp pitch to prevent looking beyond vertical.
    pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

    /// Create an uncaptured device looking down -Z.
    pub fn new(config: LookConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Whether pointer motion is being consumed.
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Capture or release the pointer.
    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
    }

    /// Apply relative pointer motion (pixels). Ignored while not captured.
    ///
    /// Moving right turns right; moving up looks up.
    pub fn apply_motion(&mut self, delta: (f32, f32)) {
        if !self.captured {
            return;
        }

        let vertical = if self.config.invert_y { -delta.1 } else { delta.1 };
        self.yaw -= delta.0 * self.config.sensitivity;
        self.pitch -= vertical * self.config.sensitivity;

        self.pitch = self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.yaw = self.yaw.rem_euclid(std::f32::consts::TAU);
    }

    /// Point the device at an absolute yaw/pitch (radians).
    pub fn set_angles(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw.rem_euclid(std::f32::consts::TAU);
        self.pitch = pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Yaw in radians, `0..TAU`.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Current orientation.
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Heading (yaw-only rotation) of an arbitrary orientation.
///
/// Used to keep movement horizontal whatever the pitch.
pub fn heading(orientation: Quat) -> Quat {
    let (yaw, _, _) = orientation.to_euler(EulerRot::YXZ);
    Quat::from_rotation_y(yaw)
}
