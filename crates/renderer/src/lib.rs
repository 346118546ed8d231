//! Polystrike Renderer
//!
//! Helpers that turn session output into things three-d can draw: the
//! first-person camera, weapon transforms and mesh conversions.

pub mod camera;
pub mod mesh;
pub mod weapon_view;

pub use camera::FirstPersonCamera;
pub use mesh::{model_to_cpu_meshes, srgba, to_mat4, to_vec3};
pub use weapon_view::{flash_transform, model_transform, part_transform, weapon_world_transform};
