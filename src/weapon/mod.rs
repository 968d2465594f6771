//! Weapons: immutable definitions and the per-attacker firing controller.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`definition`] | `WeaponDefinition`, `WeaponLimiter`, `WeaponCatalog` resource, `use_weapon` projectile factory |
//! | [`fire`] | `Attacker`, `WeaponRuntimeState` limiter bookkeeping, weapon switching and firing systems |

pub mod definition;
pub mod fire;

pub use definition::{use_weapon, WeaponCatalog, WeaponDefinition, WeaponId, WeaponLimiter};
pub use fire::{
    attack_direction_for, change_weapon, weapon_fire_system, weapon_select_system, Attacker,
    FireOutcome, WeaponFired, WeaponRuntimeState,
};
