//! Weapon view-model animation.
//!
//! Recoil, recovery, idle sway and muzzle flash are driven by a single
//! trigger-held signal. Every value is blended toward its target each frame
//! instead of switching, so the weapon never snaps no matter how fast the
//! trigger toggles or which weapon is equipped.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::{WeaponConfig, WeaponTuning};

#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Transient animation values carried from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponAnimState {
    /// Current local offset.
    pub offset: Vec3,

    /// Current local rotation (Euler XYZ, radians).
    pub rotation: Vec3,

    /// Smoothed X/Y baseline that idle sway oscillates around.
    pub anchor: Vec2,

    /// Muzzle flash intensity, never negative.
    pub flash_intensity: f32,
}

impl WeaponAnimState {
    /// At rest on a weapon's baseline.
    pub fn at_rest(config: &WeaponConfig) -> Self {
        Self {
            offset: config.offset,
            rotation: config.rotation,
            anchor: config.offset.truncate(),
            flash_intensity: 0.0,
        }
    }

    /// Compute the next frame's state.
    ///
    /// # Arguments
    ///
    /// * `tuning` - Recoil/sway/flash tuning
    /// * `config` - Equipped weapon's baseline
    /// * `elapsed` - Seconds since session start
    /// * `trigger_held` - Whether the trigger is down this frame
    pub fn advance(
        &self,
        tuning: &WeaponTuning,
        config: &WeaponConfig,
        elapsed: f32,
        trigger_held: bool,
    ) -> Self {
        let base = config.offset;
        let mut next = *self;

        next.anchor = self.anchor.lerp(base.truncate(), tuning.recover_blend);
        next.rotation.y = config.rotation.y;
        next.rotation.z = config.rotation.z;

        if trigger_held {
            next.offset.z = lerp(self.offset.z, base.z + tuning.kick_distance, tuning.fire_blend);
            next.rotation.x = lerp(
                self.rotation.x,
                config.rotation.x + tuning.kick_pitch,
                tuning.fire_blend,
            );
            next.flash_intensity = tuning.flash_peak;
        } else {
            next.offset.z = lerp(self.offset.z, base.z, tuning.recover_blend);
            next.rotation.x = lerp(self.rotation.x, config.rotation.x, tuning.recover_blend);
            next.flash_intensity = (self.flash_intensity - tuning.flash_decay).max(0.0);

            // Sway is suspended while firing
            let sway = Vec2::new(
                (elapsed * tuning.sway_frequency.x).sin(),
                (elapsed * tuning.sway_frequency.y).cos(),
            ) * tuning.sway_amplitude;
            next.offset.x = next.anchor.x + sway.x;
            next.offset.y = next.anchor.y + sway.y;
        }

        next
    }

    /// Whether the muzzle flash is visible.
    #[inline]
    pub fn flash_visible(&self) -> bool {
        self.flash_intensity > 0.0
    }
}

/// Muzzle flash parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MuzzleFlash {
    /// Anchor, local to the weapon.
    pub offset: Vec3,

    /// Light intensity.
    pub intensity: f32,

    /// Uniform scale, re-rolled every frame.
    pub scale: f32,
}

/// Everything needed to draw the weapon for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponFrame {
    /// Local offset from the camera.
    pub offset: Vec3,

    /// Local rotation (Euler XYZ, radians).
    pub rotation: Vec3,

    /// Model scale from the equipped configuration.
    pub scale: f32,

    /// Present only while the flash intensity is positive.
    pub flash: Option<MuzzleFlash>,
}

/// Weapon animation driver.
///
/// Holds the tuning and the carried [`WeaponAnimState`]; the random source
/// for flash flicker is supplied per call.
#[derive(Debug, Clone)]
pub struct WeaponAnimator {
    /// Recoil/sway/flash tuning.
    pub tuning: WeaponTuning,

    state: WeaponAnimState,
}

impl WeaponAnimator {
    /// Start at rest on the given weapon.
    pub fn new(tuning: WeaponTuning, config: &WeaponConfig) -> Self {
        Self {
            tuning,
            state: WeaponAnimState::at_rest(config),
        }
    }

    /// Current animation state.
    pub fn state(&self) -> &WeaponAnimState {
        &self.state
    }

    /// Snap back to rest (session restart).
    pub fn reset(&mut self, config: &WeaponConfig) {
        self.state = WeaponAnimState::at_rest(config);
    }

    /// Advance one frame and describe what to draw.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        config: &WeaponConfig,
        elapsed: f32,
        trigger_held: bool,
        rng: &mut R,
    ) -> WeaponFrame {
        self.state = self.state.advance(&self.tuning, config, elapsed, trigger_held);

        let flash = self.state.flash_visible().then(|| MuzzleFlash {
            offset: config.muzzle_offset,
            intensity: self.state.flash_intensity,
            scale: self.flicker_scale(rng),
        });

        WeaponFrame {
            offset: self.state.offset,
            rotation: self.state.rotation,
            scale: config.scale,
            flash,
        }
    }

    fn flicker_scale<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let (min, max) = (self.tuning.flicker_min, self.tuning.flicker_max);
        if max > min {
            rng.gen_range(min..max)
        } else {
            min
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
