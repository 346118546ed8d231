//! Polystrike Game Logic
//!
//! This crate contains the player core of the game:
//!
//! - Keyboard and pointer input coalesced into held-state flags
//! - Maze layout and the static geometry generated from it
//! - Locomotion: camera-relative walking, jumping and fall recovery
//! - Weapon view model: recoil, sway, muzzle flash and model fallback
//!
//! # Architecture
//!
//! A [`GameSession`] owns everything and advances once per rendered frame.
//! The player rig never touches the physics body directly; it reads a
//! snapshot and returns a command.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        GameSession                            │
//! │  ┌─────────┐    ┌───────────┐    ┌────────────────────────┐  │
//! │  │ Input   │───►│ PlayerRig │───►│ PhysicsWorld           │  │
//! │  │ State   │    │ (locomo-  │    │ (sphere body, maze     │  │
//! │  └─────────┘    │  tion,    │    │  walls, floor)         │  │
//! │                 │  weapon)  │    └────────────────────────┘  │
//! │                 └───────────┘                                │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod assets;
pub mod camera;
pub mod config;
pub mod input;
pub mod locomotion;
pub mod maze;
pub mod player;
pub mod session;
pub mod weapon;

// Re-export main types
pub use assets::{AssetError, AssetLoader, AssetSource, GltfAssetSource, MeshData, ModelData};
pub use camera::{CameraPose, LookConfig, PointerLook};
pub use config::{ConfigError, GameConfig, CONFIG_FILE_NAME};
pub use input::{InputEvent, InputState, KeyCode, KeyboardInput, PointerButton};
pub use locomotion::{LocomotionConfig, LocomotionController};
pub use maze::{MazeConfig, MazeGeometry, MazeGrid};
pub use player::{PlayerRig, TickInput, TickOutput};
pub use session::{FrameOutput, GameSession};
pub use weapon::{WeaponFrame, WeaponKind, WeaponVisual};

// Re-export physics types for convenience
pub use polystrike_physics::{BodyCommand, BodySnapshot, CollisionWorld, PhysicsWorld};
