//! First-person camera for rendering.

use glam::{Mat4, Vec3};
use polystrike_game::CameraPose;

/// First-person camera state.
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    /// Eye position and orientation.
    pub pose: CameraPose,

    /// Vertical field of view in degrees.
    pub fov: f32,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            pose: CameraPose::default(),
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl FirstPersonCamera {
    /// Create a camera at the given pose.
    pub fn new(pose: CameraPose) -> Self {
        Self {
            pose,
            ..Default::default()
        }
    }

    /// Update from the session's camera pose.
    pub fn update(&mut self, pose: CameraPose) {
        self.pose = pose;
    }

    /// Set the aspect ratio from a viewport size in pixels.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Camera-to-world transform.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.pose.orientation, self.pose.position)
    }

    /// Get the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    /// Get the projection matrix for rendering.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Point one unit in front of the eye.
    pub fn target(&self) -> Vec3 {
        self.pose.position + self.pose.forward()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let pose = CameraPose::new(Vec3::new(3.0, 1.4, -2.0), Quat::from_rotation_y(0.8));
        let camera = FirstPersonCamera::new(pose);
        let view = camera.view_matrix();

        assert!(view.transform_point3(pose.position).length() < 1e-5);

        // Forward in world is -Z in view space
        let ahead = view.transform_point3(camera.target());
        assert!((ahead - Vec3::NEG_Z).length() < 1e-4, "ahead={ahead:?}");
    }

    #[test]
    fn test_view_matrix_is_invertible() {
        let camera = FirstPersonCamera::default();
        assert!(camera.view_matrix().determinant().abs() > 0.0001);
    }

    #[test]
    fn test_viewport_aspect() {
        let mut camera = FirstPersonCamera::default();
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect, 2.0);

        // Minimised windows report zero height
        camera.set_viewport(800, 0);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_projection_clips_behind_camera() {
        let camera = FirstPersonCamera::default();
        let clip = camera.view_projection_matrix() * Vec3::new(0.0, 0.0, 5.0).extend(1.0);
        assert!(clip.w < 0.0);
    }
}
