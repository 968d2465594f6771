//! Per-entity control snapshot written by the input layer.

use bevy::prelude::*;

/// What a controllable entity wants to do this frame.
///
/// The input layer (keyboard, gamepad, AI or a test) overwrites this once
/// per frame; the simulation only reads it.  Keeping input behind this
/// component is what lets the movement and weapon systems run headless.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct ControlIntent {
    /// Desired movement direction, expected normalized (or zero).
    pub movement: Vec2,
    /// Level-triggered attack button: `true` for as long as it is held.
    pub attack_held: bool,
    /// Loadout slot to switch to this frame, if any.
    pub weapon_slot: Option<usize>,
}

impl ControlIntent {
    pub fn moving(movement: Vec2) -> Self {
        Self {
            movement,
            ..Default::default()
        }
    }

    pub fn attacking(mut self, held: bool) -> Self {
        self.attack_held = held;
        self
    }
}
