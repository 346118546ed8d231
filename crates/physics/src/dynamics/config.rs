//! Physics stepping configuration.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Configuration for the rigid-body host.
///
/// All values use metric units (meters, seconds) unless otherwise noted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration (meters/second², world space).
    pub gravity: Vec3,

    /// Fixed sub-step length (seconds).
    pub fixed_timestep: f32,

    /// Maximum sub-steps taken by a single `step` call.
    ///
    /// Time beyond this budget is dropped instead of spiralling.
    pub max_substeps: u32,

    /// Contact resolution passes per sub-step.
    pub contact_iterations: u32,

    /// Extra separation added when pushing a body out of a brush (meters).
    pub contact_slop: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 3,
            contact_iterations: 4,
            contact_slop: 0.0,
        }
    }
}
