//! First-person weapon view model.
//!
//! - [`config`]: weapon identifiers, baselines and animation tuning
//! - [`animator`]: recoil, recovery, sway and muzzle flash
//! - [`model`]: loaded or placeholder geometry

pub mod animator;
pub mod config;
pub mod model;

pub use animator::{MuzzleFlash, WeaponAnimState, WeaponAnimator, WeaponFrame};
pub use config::{WeaponConfig, WeaponKind, WeaponSet, WeaponTuning};
pub use model::{placeholder_model, BoxPart, PlaceholderModel, WeaponVisual};
