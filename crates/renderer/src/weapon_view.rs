//! World transforms for the first-person weapon.
//!
//! The weapon hangs off the camera: camera pose, then the animated local
//! offset and rotation. Placeholder boxes and the muzzle flash are children
//! of that group; loaded models additionally take the configured scale.

use glam::{Mat4, Quat, Vec3};
use polystrike_game::weapon::{BoxPart, MuzzleFlash, PlaceholderModel};
use polystrike_game::{CameraPose, WeaponFrame};

/// Base radius of the muzzle flash sphere before flicker (meters, weapon space).
pub const FLASH_RADIUS: f32 = 0.05;

/// Quaternion for Euler angles applied in X, Y, Z order.
pub fn euler_xyz(angles: Vec3) -> Quat {
    Quat::from_rotation_x(angles.x) * Quat::from_rotation_y(angles.y) * Quat::from_rotation_z(angles.z)
}

/// The weapon group: camera pose followed by the frame's offset and rotation.
pub fn weapon_world_transform(pose: &CameraPose, frame: &WeaponFrame) -> Mat4 {
    Mat4::from_rotation_translation(pose.orientation, pose.position)
        * Mat4::from_rotation_translation(euler_xyz(frame.rotation), frame.offset)
}

/// Transform for a loaded model inside the weapon group.
pub fn model_transform(weapon: Mat4, frame: &WeaponFrame) -> Mat4 {
    weapon * Mat4::from_scale(Vec3::splat(frame.scale))
}

/// Transform for one placeholder box, sized for a unit cube spanning -1..1.
pub fn part_transform(weapon: Mat4, model: &PlaceholderModel, part: &BoxPart) -> Mat4 {
    weapon
        * Mat4::from_quat(euler_xyz(model.rotation))
        * Mat4::from_scale_rotation_translation(
            part.size / 2.0,
            euler_xyz(part.rotation),
            part.position,
        )
}

/// Transform for the flash sphere, sized for a unit sphere.
pub fn flash_transform(weapon: Mat4, flash: &MuzzleFlash) -> Mat4 {
    weapon
        * Mat4::from_scale_rotation_translation(
            Vec3::splat(FLASH_RADIUS * flash.scale),
            Quat::IDENTITY,
            flash.offset,
        )
}
