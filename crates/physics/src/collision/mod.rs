//! Static collision geometry.
//!
//! This module stores level geometry as parry3d shapes and answers sphere
//! penetration queries against it.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: The static geometry of a level
//! - [`SphereContact`]: One penetration reported by a query
//! - [`ContentFlags`]: Filtering for queries

mod flags;
mod world;

pub use flags::ContentFlags;
pub use world::{CollisionBrush, CollisionWorld, SphereContact};
