//! Weapon identifiers and their static view-model configuration.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Equippable weapons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Secondary sidearm. Equipped at session start.
    #[default]
    Pistol,
    /// Primary automatic rifle.
    Rifle,
}

impl WeaponKind {
    /// Every weapon, in slot order.
    pub const ALL: [WeaponKind; 2] = [WeaponKind::Rifle, WeaponKind::Pistol];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Pistol => "pistol",
            WeaponKind::Rifle => "rifle",
        }
    }
}

/// Baseline placement and assets of one weapon's view model.
///
/// Offsets and rotations are local to the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Model file, relative to the asset root.
    pub model_path: String,

    /// Resting offset from the camera.
    pub offset: Vec3,

    /// Resting rotation (Euler XYZ, radians).
    pub rotation: Vec3,

    /// Uniform scale applied to the loaded model.
    pub scale: f32,

    /// Muzzle flash anchor, local to the weapon.
    pub muzzle_offset: Vec3,

    /// Tint used by placeholder geometry (sRGB).
    pub color: [u8; 3],
}

impl WeaponConfig {
    /// Default pistol view model.
    pub fn pistol() -> Self {
        Self {
            model_path: "models/pistol.glb".to_string(),
            offset: Vec3::new(0.35, -0.25, -0.45),
            rotation: Vec3::new(0.0, std::f32::consts::PI, 0.0),
            scale: 0.1,
            muzzle_offset: Vec3::new(0.0, 0.05, 0.35),
            color: [0x33, 0x33, 0x33],
        }
    }

    /// Default rifle view model.
    pub fn rifle() -> Self {
        Self {
            model_path: "models/rifle.glb".to_string(),
            offset: Vec3::new(0.35, -0.3, -0.55),
            rotation: Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            scale: 0.25,
            muzzle_offset: Vec3::new(0.0, 0.05, 0.6),
            color: [0x4b, 0x36, 0x21],
        }
    }
}

/// Configuration for every weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponSet {
    pub pistol: WeaponConfig,
    pub rifle: WeaponConfig,
}

impl Default for WeaponSet {
    fn default() -> Self {
        Self {
            pistol: WeaponConfig::pistol(),
            rifle: WeaponConfig::rifle(),
        }
    }
}

impl WeaponSet {
    /// Configuration for a weapon.
    pub fn get(&self, kind: WeaponKind) -> &WeaponConfig {
        match kind {
            WeaponKind::Pistol => &self.pistol,
            WeaponKind::Rifle => &self.rifle,
        }
    }
}

/// Recoil, sway and flash tuning shared by all weapons.
///
/// Blend factors are per-frame lerp weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    /// How far the weapon kicks back toward the camera (meters, +Z).
    pub kick_distance: f32,

    /// Pitch added while firing (radians, negative tips the muzzle).
    pub kick_pitch: f32,

    /// Blend factor while the trigger is held.
    pub fire_blend: f32,

    /// Blend factor while recovering.
    pub recover_blend: f32,

    /// Flash intensity while firing.
    pub flash_peak: f32,

    /// Flash intensity lost per frame after release.
    pub flash_decay: f32,

    /// Idle sway amplitude (meters).
    pub sway_amplitude: f32,

    /// Idle sway angular frequency for X and Y (radians/second).
    pub sway_frequency: Vec2,

    /// Muzzle flash scale range, min inclusive, max exclusive.
    pub flicker_min: f32,
    pub flicker_max: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            kick_distance: 0.12,
            kick_pitch: -0.15,
            fire_blend: 0.5,
            recover_blend: 0.1,
            flash_peak: 10.0,
            flash_decay: 2.0,
            sway_amplitude: 0.004,
            sway_frequency: Vec2::new(1.2, 2.4),
            flicker_min: 0.8,
            flicker_max: 1.2,
        }
    }
}

impl WeaponTuning {
    /// Frames needed for a peak flash to decay to zero.
    pub fn flash_decay_frames(&self) -> u32 {
        if self.flash_decay <= 0.0 {
            return u32::MAX;
        }
        (self.flash_peak / self.flash_decay).ceil() as u32
    }
}
