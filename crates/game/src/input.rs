//! Player input handling.
//!
//! Raw key transitions are coalesced into a persistent [`InputState`]: seven
//! named booleans that readers sample once per tick. Only the latest held /
//! released state matters; nothing is queued.

use serde::{Deserialize, Serialize};

/// Physical key codes the game recognizes.
///
/// Anything else arrives as [`KeyCode::Other`] and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyE,
    KeyQ,
    Space,
    Digit1,
    Digit2,
    Digit3,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

/// Named actions driven by keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    WeaponSlot1,
    WeaponSlot2,
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// An input event delivered by the host window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key went down (`pressed = true`) or up.
    Key { code: KeyCode, pressed: bool },

    /// Pointer button went down or up.
    PointerButton { button: PointerButton, pressed: bool },

    /// Relative pointer motion in pixels.
    PointerMotion { delta: (f32, f32) },

    /// Pointer capture gained or lost.
    PointerCapture { captured: bool },

    /// The window lost focus; every held key is considered released.
    FocusLost,
}

/// Current held state of every action.
///
/// Mutated only by key-down / key-up edges, reset to all-false at session
/// start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub weapon_slot_1: bool,
    pub weapon_slot_2: bool,
}

impl InputState {
    /// All actions released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an action is held.
    pub fn get(&self, action: InputAction) -> bool {
        match action {
            InputAction::Forward => self.forward,
            InputAction::Backward => self.backward,
            InputAction::Left => self.left,
            InputAction::Right => self.right,
            InputAction::Jump => self.jump,
            InputAction::WeaponSlot1 => self.weapon_slot_1,
            InputAction::WeaponSlot2 => self.weapon_slot_2,
        }
    }

    /// Set an action's held state.
    ///
    /// Returns `true` if the state changed, so a repeated key-down while held
    /// is reported as no change.
    pub fn set(&mut self, action: InputAction, held: bool) -> bool {
        let slot = match action {
            InputAction::Forward => &mut self.forward,
            InputAction::Backward => &mut self.backward,
            InputAction::Left => &mut self.left,
            InputAction::Right => &mut self.right,
            InputAction::Jump => &mut self.jump,
            InputAction::WeaponSlot1 => &mut self.weapon_slot_1,
            InputAction::WeaponSlot2 => &mut self.weapon_slot_2,
        };
        let changed = *slot != held;
        *slot = held;
        changed
    }

    /// Release everything.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check if any movement key is held.
    pub fn has_movement(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Key-to-action mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub weapon_slot_1: KeyCode,
    pub weapon_slot_2: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            jump: KeyCode::Space,
            weapon_slot_1: KeyCode::Digit1,
            weapon_slot_2: KeyCode::Digit2,
        }
    }
}

impl KeyBindings {
    /// The action bound to a key, if any.
    pub fn action_for(&self, code: KeyCode) -> Option<InputAction> {
        if code == KeyCode::Other {
            return None;
        }

        [
            (self.forward, InputAction::Forward),
            (self.backward, InputAction::Backward),
            (self.left, InputAction::Left),
            (self.right, InputAction::Right),
            (self.jump, InputAction::Jump),
            (self.weapon_slot_1, InputAction::WeaponSlot1),
            (self.weapon_slot_2, InputAction::WeaponSlot2),
        ]
        .into_iter()
        .find(|(key, _)| *key == code)
        .map(|(_, action)| action)
    }
}

/// A change in an action's held state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEdge {
    pub action: InputAction,
    pub pressed: bool,
}

/// Tracks keyboard state through a set of bindings.
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    bindings: KeyBindings,
    state: InputState,
}

impl KeyboardInput {
    /// Create with the given bindings and everything released.
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            state: InputState::new(),
        }
    }

    /// Process a key transition.
    ///
    /// Returns the edge if a bound action actually changed state.
    pub fn handle_key(&mut self, code: KeyCode, pressed: bool) -> Option<ActionEdge> {
        let action = self.bindings.action_for(code)?;
        self.state
            .set(action, pressed)
            .then_some(ActionEdge { action, pressed })
    }

    /// Get the current input state.
    pub fn current(&self) -> InputState {
        self.state
    }

    /// Reset all inputs (e.g., on focus loss or session start).
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// The active bindings.
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }
}
