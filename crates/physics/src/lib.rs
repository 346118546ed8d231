//! Polystrike Physics
//!
//! The rigid-body host consumed by the Polystrike player core.
//!
//! # Architecture
//!
//! The physics crate is split into two systems:
//!
//! - **Collision**: Static brushes (boxes, planes) and sphere contact queries
//! - **Dynamics**: Sphere bodies integrated at a fixed sub-step
//!
//! The game core never touches bodies directly. It exchanges
//! [`BodySnapshot`] and [`BodyCommand`] values with the [`PhysicsWorld`].

pub mod collision;
pub mod dynamics;

// Re-export commonly used types
pub use collision::{CollisionWorld, ContentFlags, SphereContact};
pub use dynamics::{
    BodyCommand, BodyDesc, BodyHandle, BodyKind, BodySnapshot, PhysicsConfig, PhysicsWorld,
    RigidBody,
};
