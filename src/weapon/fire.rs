//! Trigger handling: turns `attack_held` + time into shots.
//!
//! | Policy | Trigger | Effect |
//! |--------|---------|--------|
//! | Unlimited | held | fire every evaluation |
//! | FireRate | held and `now >= last + fire_rate` | fire, `last = now` |
//! | Charge | held, not charging | start charging at `now` |
//! | Charge | released while charging | fire iff held for `charge_time` |
//! | OneShot | held and the gate is open | fire, close gate, revert to default |
//!
//! The trigger is level-based: a held button is seen on every evaluation.

use super::definition::{use_weapon, WeaponCatalog, WeaponDefinition, WeaponId, WeaponLimiter};
use crate::actor::Actor;
use crate::intent::ControlIntent;
use crate::projectile::ShotOrigin;
use bevy::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// An entity that can hold and fire weapons.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Attacker {
    /// `None` disables firing entirely.
    pub current_weapon: Option<WeaponId>,
    /// Weapon a one-shot reverts to after firing.
    pub default_weapon: Option<WeaponId>,
    /// Weapons selectable through `ControlIntent::weapon_slot`.
    pub loadout: Vec<WeaponId>,
    /// Offset from the entity origin where shots appear.
    pub muzzle_offset: Vec2,
    /// Refreshed on every evaluation.
    pub spawn_position: Vec2,
    /// Refreshed on every evaluation.
    pub attack_direction: Vec2,
}

impl Attacker {
    /// Armed with the catalog's default weapon and loadout.
    pub fn new(catalog: &WeaponCatalog, muzzle_offset: Vec2) -> Self {
        Self {
            current_weapon: catalog.default_weapon(),
            default_weapon: catalog.default_weapon(),
            loadout: catalog.loadout().to_vec(),
            muzzle_offset,
            spawn_position: Vec2::ZERO,
            attack_direction: Vec2::X,
        }
    }
}

/// Per-attacker limiter bookkeeping.  Reset on every weapon change.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WeaponRuntimeState {
    /// `None` until the first FireRate shot; counts as ready.
    pub last_fire_time: Option<f32>,
    pub charge_start_time: f32,
    pub is_charging: bool,
    pub can_fire_once: bool,
}

impl Default for WeaponRuntimeState {
    fn default() -> Self {
        Self {
            last_fire_time: None,
            charge_start_time: 0.0,
            is_charging: false,
            can_fire_once: true,
        }
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Idle,
    Fired,
    ChargeStarted,
    /// Released before the charge completed; nothing fires.
    ChargeDiscarded,
}

impl WeaponRuntimeState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply `weapon`'s limiter to the trigger state at time `now`.
    pub fn evaluate(&mut self, weapon: &WeaponDefinition, held: bool, now: f32) -> FireOutcome {
        match weapon.limiter {
            WeaponLimiter::Unlimited => {
                if held {
                    FireOutcome::Fired
                } else {
                    FireOutcome::Idle
                }
            }
            WeaponLimiter::FireRate => {
                let ready = self
                    .last_fire_time
                    .is_none_or(|last| now >= last + weapon.fire_rate);
                if held && ready {
                    self.last_fire_time = Some(now);
                    FireOutcome::Fired
                } else {
                    FireOutcome::Idle
                }
            }
            WeaponLimiter::Charge => {
                if held && !self.is_charging {
                    self.is_charging = true;
                    self.charge_start_time = now;
                    FireOutcome::ChargeStarted
                } else if !held && self.is_charging {
                    self.is_charging = false;
                    if now >= self.charge_start_time + weapon.charge_time {
                        FireOutcome::Fired
                    } else {
                        FireOutcome::ChargeDiscarded
                    }
                } else {
                    FireOutcome::Idle
                }
            }
            WeaponLimiter::OneShot => {
                if held && self.can_fire_once {
                    self.can_fire_once = false;
                    FireOutcome::Fired
                } else {
                    FireOutcome::Idle
                }
            }
        }
    }
}

// ── Messages ───────────────────────────────────────────────────────────────────

/// One projectile left an attacker's muzzle.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct WeaponFired {
    pub attacker: Entity,
    pub weapon: WeaponId,
    pub projectile: Entity,
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Aim derived from movement intent.  Shots always travel rightward; vertical
/// intent only tilts them.
pub fn attack_direction_for(intent: Vec2) -> Vec2 {
    if intent == Vec2::ZERO {
        Vec2::X
    } else {
        Vec2::new(1.0, intent.y)
    }
}

/// Switch to `new_weapon` and reset the limiter state.
///
/// Returns `false` (and changes nothing) when `new_weapon` is `None` or not
/// in the catalog.
pub fn change_weapon(
    attacker: &mut Attacker,
    state: &mut WeaponRuntimeState,
    new_weapon: Option<WeaponId>,
    catalog: &WeaponCatalog,
) -> bool {
    let Some(id) = new_weapon.filter(|id| catalog.get(*id).is_some()) else {
        return false;
    };
    attacker.current_weapon = Some(id);
    state.reset();
    true
}

// ── Systems ────────────────────────────────────────────────────────────────────

/// Apply `ControlIntent::weapon_slot` selections.
///
/// Selecting the weapon that is already equipped does nothing, so a held
/// slot key does not keep resetting the limiter.
pub fn weapon_select_system(
    mut q: Query<(Entity, &mut Attacker, &mut WeaponRuntimeState, &ControlIntent)>,
    catalog: Res<WeaponCatalog>,
) {
    for (entity, mut attacker, mut state, intent) in q.iter_mut() {
        let Some(slot) = intent.weapon_slot else {
            continue;
        };
        let Some(&id) = attacker.loadout.get(slot) else {
            continue;
        };
        if attacker.current_weapon == Some(id) {
            continue;
        }
        if change_weapon(&mut attacker, &mut state, Some(id), &catalog) {
            if let Some(weapon) = catalog.get(id) {
                info!("[weapon] {:?} switched to '{}'", entity, weapon.name);
            }
        }
    }
}

/// Evaluate every armed attacker and spawn the resulting shots.
pub fn weapon_fire_system(
    mut commands: Commands,
    mut q: Query<(
        Entity,
        &mut Attacker,
        &mut WeaponRuntimeState,
        &ControlIntent,
        &Transform,
        Option<&Actor>,
    )>,
    catalog: Res<WeaponCatalog>,
    time: Res<Time>,
    mut fired: MessageWriter<WeaponFired>,
) {
    let now = time.elapsed_secs();

    for (entity, mut attacker, mut state, intent, transform, actor) in q.iter_mut() {
        let Some(weapon_id) = attacker.current_weapon else {
            continue;
        };
        let Some(weapon) = catalog.get(weapon_id) else {
            continue;
        };

        attacker.attack_direction = attack_direction_for(intent.movement);
        attacker.spawn_position = transform.translation.truncate() + attacker.muzzle_offset;

        if state.evaluate(weapon, intent.attack_held, now) != FireOutcome::Fired {
            continue;
        }

        let origin = ShotOrigin {
            owner: entity,
            position: attacker.spawn_position,
            direction: attacker.attack_direction,
            base_damage: actor.map_or(0.0, |a| a.base_damage),
        };
        if let Some(projectile) = use_weapon(&mut commands, weapon, Some(&origin)) {
            debug!("[weapon] {:?} fired '{}'", entity, weapon.name);
            fired.write(WeaponFired {
                attacker: entity,
                weapon: weapon_id,
                projectile,
            });
        }

        if weapon.limiter == WeaponLimiter::OneShot {
            let fallback = attacker.default_weapon;
            if change_weapon(&mut attacker, &mut state, fallback, &catalog) {
                info!("[weapon] {:?} one-shot spent; reverted to default", entity);
            }
            // The gate stays shut until the next explicit weapon change.
            state.can_fire_once = false;
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
