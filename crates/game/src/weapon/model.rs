//! What the renderer draws for a weapon: a loaded model or placeholder boxes.

use glam::Vec3;

use super::config::WeaponKind;
use crate::assets::ModelData;

/// One box of a placeholder weapon.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPart {
    /// Part name (for debugging).
    pub name: &'static str,

    /// Full box dimensions.
    pub size: Vec3,

    /// Center, local to the placeholder group.
    pub position: Vec3,

    /// Local rotation (Euler XYZ, radians).
    pub rotation: Vec3,

    /// sRGB color.
    pub color: [u8; 3],
}

impl BoxPart {
    fn new(name: &'static str, size: Vec3, position: Vec3, color: u32) -> Self {
        Self {
            name,
            size,
            position,
            rotation: Vec3::ZERO,
            color: [(color >> 16) as u8, (color >> 8) as u8, color as u8],
        }
    }

    fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Box-built stand-in for a weapon whose model could not be loaded.
///
/// Drawn at unit scale: the configuration scale only applies to loaded models.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderModel {
    /// Rotation of the whole group (Euler XYZ, radians).
    pub rotation: Vec3,

    pub parts: Vec<BoxPart>,
}

/// Deterministic placeholder geometry for a weapon.
pub fn placeholder_model(kind: WeaponKind) -> PlaceholderModel {
    match kind {
        WeaponKind::Rifle => PlaceholderModel {
            rotation: Vec3::new(0.0, -std::f32::consts::FRAC_PI_2, 0.0),
            parts: vec![
                BoxPart::new("receiver", Vec3::new(0.5, 0.1, 0.06), Vec3::ZERO, 0x222222),
                BoxPart::new(
                    "stock",
                    Vec3::new(0.3, 0.15, 0.05),
                    Vec3::new(-0.4, -0.05, 0.0),
                    0x4b3621,
                ),
                BoxPart::new(
                    "barrel",
                    Vec3::new(0.6, 0.04, 0.04),
                    Vec3::new(0.5, 0.0, 0.0),
                    0x111111,
                ),
                BoxPart::new(
                    "magazine",
                    Vec3::new(0.08, 0.3, 0.05),
                    Vec3::new(0.1, -0.2, 0.0),
                    0x111111,
                )
                .rotated(Vec3::new(0.0, 0.0, -0.2)),
                BoxPart::new(
                    "handguard",
                    Vec3::new(0.3, 0.08, 0.07),
                    Vec3::new(0.2, 0.0, 0.0),
                    0x4b3621,
                ),
            ],
        },
        WeaponKind::Pistol => PlaceholderModel {
            rotation: Vec3::new(0.0, std::f32::consts::PI, 0.0),
            parts: vec![
                BoxPart::new("slide", Vec3::new(0.06, 0.08, 0.3), Vec3::ZERO, 0x333333),
                BoxPart::new(
                    "grip",
                    Vec3::new(0.05, 0.15, 0.07),
                    Vec3::new(0.0, -0.1, -0.05),
                    0x111111,
                )
                .rotated(Vec3::new(0.2, 0.0, 0.0)),
            ],
        },
    }
}

/// Resolved visual for one weapon.
#[derive(Debug, Clone, PartialEq)]
pub enum WeaponVisual {
    /// Loaded model, drawn with the configuration scale.
    Model(ModelData),

    /// Procedural fallback.
    Placeholder(PlaceholderModel),
}

impl WeaponVisual {
    /// Placeholder for a weapon.
    pub fn placeholder(kind: WeaponKind) -> Self {
        WeaponVisual::Placeholder(placeholder_model(kind))
    }

    /// Whether this is the fallback.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, WeaponVisual::Placeholder(_))
    }
}
