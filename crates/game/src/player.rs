//! The player rig: locomotion, camera and the equipped weapon's view model.

use glam::Quat;
use polystrike_physics::{BodyCommand, BodySnapshot};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::CameraPose;
use crate::input::InputState;
use crate::locomotion::LocomotionController;
use crate::weapon::{WeaponAnimator, WeaponConfig, WeaponFrame, WeaponKind, WeaponSet, WeaponTuning};

/// Everything the rig reads in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Held actions.
    pub input: InputState,

    /// Whether the trigger is down.
    pub trigger_held: bool,

    /// Camera orientation from the look device.
    pub orientation: Quat,

    /// Player body as of the end of the previous physics step.
    pub body: BodySnapshot,

    /// Seconds since session start.
    pub elapsed: f32,
}

/// Everything the rig produces in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Command to apply before the next physics step.
    pub body: BodyCommand,

    /// Camera pose to render with.
    pub camera: CameraPose,

    /// Equipped weapon.
    pub equipped: WeaponKind,

    /// Weapon pose and flash.
    pub weapon: WeaponFrame,

    /// A jump started this tick.
    pub jumped: bool,

    /// The body was reset to spawn this tick.
    pub recovered: bool,
}

/// Per-player controller state.
///
/// Apart from the carried weapon animation and the flicker RNG, a tick
/// depends only on its [`TickInput`].
#[derive(Debug)]
pub struct PlayerRig {
    locomotion: LocomotionController,
    weapons: WeaponSet,
    animator: WeaponAnimator,
    equipped: WeaponKind,
    rng: StdRng,
}

impl PlayerRig {
    /// Create a rig holding the default weapon.
    pub fn new(
        locomotion: LocomotionController,
        weapons: WeaponSet,
        tuning: WeaponTuning,
        seed: Option<u64>,
    ) -> Self {
        let equipped = WeaponKind::default();
        let animator = WeaponAnimator::new(tuning, weapons.get(equipped));
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            locomotion,
            weapons,
            animator,
            equipped,
            rng,
        }
    }

    /// Locomotion controller.
    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    /// Equipped weapon.
    pub fn equipped(&self) -> WeaponKind {
        self.equipped
    }

    /// Configuration of the equipped weapon.
    pub fn equipped_config(&self) -> &WeaponConfig {
        self.weapons.get(self.equipped)
    }

    /// Weapon configurations.
    pub fn weapons(&self) -> &WeaponSet {
        &self.weapons
    }

    /// Weapon animator.
    pub fn animator(&self) -> &WeaponAnimator {
        &self.animator
    }

    /// Swap the equipped weapon. Animation continues from its current values.
    ///
    /// Returns `true` if the weapon changed.
    pub fn equip(&mut self, kind: WeaponKind) -> bool {
        if self.equipped == kind {
            return false;
        }
        tracing::debug!("Equipped {}", kind.name());
        self.equipped = kind;
        true
    }

    /// Back to the default weapon, at rest.
    pub fn reset(&mut self) {
        self.equipped = WeaponKind::default();
        self.animator.reset(self.weapons.get(self.equipped));
    }

    /// Run one tick.
    pub fn step(&mut self, tick: &TickInput) -> TickOutput {
        let motion = self
            .locomotion
            .step(&tick.input, tick.orientation, tick.body);

        let config = self.weapons.get(self.equipped);
        let weapon = self
            .animator
            .update(config, tick.elapsed, tick.trigger_held, &mut self.rng);

        TickOutput {
            body: motion.body,
            camera: CameraPose::new(motion.camera_position, tick.orientation),
            equipped: self.equipped,
            weapon,
            jumped: motion.jumped,
            recovered: motion.recovered,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
