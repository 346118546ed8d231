//! Collision world containing all static geometry.
//!
//! The collision world stores the static brushes of a level (maze walls and
//! the ground plane) and answers sphere contact queries against them.

use glam::Vec3;
use parry3d::math::{Isometry, Real, Vector};
use parry3d::na::Unit;
use parry3d::query::contact;
use parry3d::shape::{Ball, SharedShape};

use super::flags::ContentFlags;

/// A piece of static collision geometry.
#[derive(Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: u32,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags (solid, floor, trigger, etc.).
    pub contents: ContentFlags,
}

impl std::fmt::Debug for CollisionBrush {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionBrush")
            .field("id", &self.id)
            .field("shape", &self.shape.shape_type())
            .field("translation", &self.transform.translation.vector)
            .field("contents", &self.contents)
            .finish()
    }
}

/// A penetration between a query sphere and a brush.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereContact {
    /// Brush that was touched.
    pub brush: u32,
    /// Direction that pushes the sphere out of the brush (unit length).
    pub normal: Vec3,
    /// Penetration depth along `normal` (always > 0).
    pub depth: f32,
}

/// The static collision world.
///
/// The world is built once at level setup and is immutable afterwards.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> u32 {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::translation(center.x, center.y, center.z);
        self.push(shape, transform, contents)
    }

    /// Add an infinite plane (half-space) to the world.
    ///
    /// Everything on the opposite side of `normal` from `point` is solid.
    pub fn add_plane(&mut self, point: Vec3, normal: Vec3, contents: ContentFlags) -> u32 {
        let normal = normal.try_normalize().unwrap_or(Vec3::Y);
        let shape = SharedShape::halfspace(Unit::new_normalize(Vector::new(
            normal.x, normal.y, normal.z,
        )));
        let transform = Isometry::translation(point.x, point.y, point.z);
        self.push(shape, transform, contents)
    }

    fn push(&mut self, shape: SharedShape, transform: Isometry<Real>, contents: ContentFlags) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            contents,
        });

        id
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// All brushes in insertion order.
    pub fn brushes(&self) -> &[CollisionBrush] {
        &self.brushes
    }

    /// Collect every brush a sphere penetrates.
    ///
    /// # Arguments
    ///
    /// * `center` - Sphere center in world space
    /// * `radius` - Sphere radius
    /// * `mask` - Content flags to collide with
    pub fn sphere_contacts(&self, center: Vec3, radius: f32, mask: ContentFlags) -> Vec<SphereContact> {
        let ball = Ball::new(radius);
        let ball_transform = Isometry::translation(center.x, center.y, center.z);

        let mut contacts = Vec::new();

        for brush in &self.brushes {
            if !mask.intersects(brush.contents) {
                continue;
            }

            // Brush first: the ball-first half-space dispatch mishandles the relative pose.
            if let Ok(Some(hit)) = contact(
                &brush.transform,
                brush.shape.as_ref(),
                &ball_transform,
                &ball,
                0.0,
            ) {
                let depth = -hit.dist;
                if depth <= 0.0 {
                    continue;
                }
                // normal1 is the brush's outward normal, i.e. the push-out direction.
                let normal = Vec3::new(hit.normal1.x, hit.normal1.y, hit.normal1.z);
                contacts.push(SphereContact {
                    brush: brush.id,
                    normal,
                    depth,
                });
            }
        }

        contacts
    }

    /// Check if a sphere overlaps any solid geometry.
    pub fn sphere_in_solid(&self, center: Vec3, radius: f32, mask: ContentFlags) -> bool {
        !self.sphere_contacts(center, radius, mask).is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
