//! Game configuration.
//!
//! Every section has defaults, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! [locomotion]
//! speed = 6.5
//!
//! [look]
//! invert_y = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use polystrike_physics::{BodyDesc, PhysicsConfig};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::LookConfig;
use crate::input::KeyBindings;
use crate::locomotion::LocomotionConfig;
use crate::maze::MazeConfig;
use crate::weapon::{WeaponSet, WeaponTuning};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "polystrike.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Physical parameters of the player body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerBodyConfig {
    /// Sphere radius (meters).
    pub radius: f32,

    /// Mass (kg).
    pub mass: f32,

    /// Linear damping, 0..1.
    pub linear_damping: f32,

    /// Keep the sphere from rolling.
    pub fixed_rotation: bool,
}

impl Default for PlayerBodyConfig {
    fn default() -> Self {
        Self {
            radius: 0.6,
            mass: 1.0,
            linear_damping: 0.9,
            fixed_rotation: true,
        }
    }
}

impl PlayerBodyConfig {
    /// Body description placed at `position`.
    pub fn desc(&self, position: Vec3) -> BodyDesc {
        BodyDesc::dynamic_sphere(position, self.radius, self.mass)
            .with_linear_damping(self.linear_damping)
            .with_fixed_rotation(self.fixed_rotation)
    }
}

/// Where weapon models come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory model paths are relative to.
    pub root: PathBuf,

    /// Seconds a model load may take before the placeholder is used for good.
    pub timeout_secs: f32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            timeout_secs: 10.0,
        }
    }
}

impl AssetConfig {
    /// Load timeout. Negative or non-finite values mean no wait at all.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f32(self.timeout_secs).unwrap_or(Duration::ZERO)
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerBodyConfig,
    pub locomotion: LocomotionConfig,
    pub look: LookConfig,
    pub bindings: KeyBindings,
    pub maze: MazeConfig,
    pub weapons: WeaponSet,
    pub weapon_tuning: WeaponTuning,
    pub assets: AssetConfig,

    /// Seed for cosmetic randomness (flash flicker). Random when unset.
    pub rng_seed: Option<u64>,
}

impl GameConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Render as TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("Loading config from {}", path.display());
            Self::load(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputAction, KeyCode};

    #[test]
    fn test_empty_file_is_default() {
        let config = GameConfig::from_toml_str("").expect("parse");
        assert_eq!(config.locomotion.speed, 5.0);
        assert_eq!(config.player.radius, 0.6);
        assert_eq!(config.player.linear_damping, 0.9);
        assert_eq!(config.maze.cell_size, 2.0);
        assert_eq!(config.weapons.rifle.scale, 0.25);
        assert_eq!(config.assets.timeout(), Duration::from_secs(10));
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_toml_str(
            r####"
            rng_seed = 42

            [locomotion]
            speed = 7.5

            [weapon_tuning]
            flash_decay = 5.0

            [maze]
            layout = "###\n#.#\n###"
            "####,
        )
        .expect("parse");

        assert_eq!(config.locomotion.speed, 7.5);
        assert_eq!(config.locomotion.jump_velocity, 4.0);
        assert_eq!(config.weapon_tuning.flash_decay, 5.0);
        assert_eq!(config.weapon_tuning.flash_peak, 10.0);
        assert_eq!(config.maze.grid().wall_count(), 8);
        assert_eq!(config.rng_seed, Some(42));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = GameConfig::default();
        config.locomotion.spawn_point = Vec3::new(1.0, 3.0, -2.0);
        config.look.invert_y = true;

        let text = config.to_toml_string().expect("serialize");
        let parsed = GameConfig::from_toml_str(&text).expect("parse");

        assert_eq!(parsed.locomotion.spawn_point, Vec3::new(1.0, 3.0, -2.0));
        assert!(parsed.look.invert_y);
        assert_eq!(parsed.weapons, config.weapons);
        assert_eq!(parsed.bindings.action_for(KeyCode::Digit1), Some(InputAction::WeaponSlot1));
    }

    #[test]
    fn test_invalid_toml() {
        let err = GameConfig::from_toml_str("[locomotion]\nspeed = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[player]\nmass = 2.0\n").expect("write");

        let config = GameConfig::load(&path).expect("load");
        assert_eq!(config.player.mass, 2.0);
        assert_eq!(config.player.radius, 0.6);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = GameConfig::load_or_default(dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config.locomotion.eye_height, 0.8);

        let err = GameConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_negative_timeout() {
        let assets = AssetConfig {
            timeout_secs: -1.0,
            ..Default::default()
        };
        assert_eq!(assets.timeout(), Duration::ZERO);
    }

    #[test]
    fn test_player_body_desc() {
        let desc = PlayerBodyConfig::default().desc(Vec3::new(-10.0, 2.0, -10.0));
        assert_eq!(desc.radius, 0.6);
        assert_eq!(desc.mass, 1.0);
        assert_eq!(desc.linear_damping, 0.9);
        assert!(desc.fixed_rotation);
    }
}
