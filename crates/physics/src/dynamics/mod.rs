//! Rigid-body dynamics.
//!
//! A small rigid-body host: dynamic spheres integrate gravity and
//! linear damping at a fixed sub-step and are pushed out of static brushes.
//! There is no broad phase, no body-body contact, and no constraint solver.
//!
//! # Design
//!
//! Owners never hold references into the world between ticks. They read a
//! [`BodySnapshot`] once per tick and write a [`BodyCommand`] back, which the
//! next [`PhysicsWorld::step`] consumes.

mod body;
mod config;
mod world;

pub use body::{BodyCommand, BodyDesc, BodyHandle, BodyKind, BodySnapshot, RigidBody};
pub use config::PhysicsConfig;
pub use world::PhysicsWorld;
