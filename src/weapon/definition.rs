//! Immutable weapon data and the shared catalog.

use crate::config::CombatConfig;
use crate::constants::{
    PROJECTILE_COLLIDER_RADIUS, PROJECTILE_LIFETIME, WEAPON_CHARGE_TIME, WEAPON_DAMAGE,
    WEAPON_FIRE_RATE, WEAPON_PROJECTILE_FORCE, WEAPON_PROJECTILE_GRAVITY,
    WEAPON_PROJECTILE_SPEED,
};
use crate::error::{SimError, SimResult};
use crate::projectile::{spawn_projectile, Projectile, ShotOrigin};
use bevy::prelude::*;
use serde::Deserialize;

/// Firing policy of a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponLimiter {
    /// Fires on every evaluation while the trigger is held.
    #[default]
    Unlimited,
    /// At most one shot per `fire_rate` seconds.
    FireRate,
    /// Hold for `charge_time` seconds, release to fire.
    Charge,
    /// A single shot, then the attacker reverts to its default weapon.
    OneShot,
}

/// One weapon as written in `assets/combat.toml`.
///
/// Missing keys take the compiled defaults from `constants.rs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeaponDefinition {
    pub name: String,
    pub damage: f32,
    /// Knockback impulse magnitude applied on hit.
    pub projectile_force: f32,
    pub projectile_speed: f32,
    /// Rapier gravity scale for the projectile body.
    pub projectile_gravity: f32,
    pub limiter: WeaponLimiter,
    /// Seconds between shots; only read for [`WeaponLimiter::FireRate`].
    pub fire_rate: f32,
    /// Seconds of hold; only read for [`WeaponLimiter::Charge`].
    pub charge_time: f32,
    pub projectile_lifetime: f32,
    pub collider_radius: f32,
}

impl Default for WeaponDefinition {
    fn default() -> Self {
        Self {
            name: "pencil".to_string(),
            damage: WEAPON_DAMAGE,
            projectile_force: WEAPON_PROJECTILE_FORCE,
            projectile_speed: WEAPON_PROJECTILE_SPEED,
            projectile_gravity: WEAPON_PROJECTILE_GRAVITY,
            limiter: WeaponLimiter::Unlimited,
            fire_rate: WEAPON_FIRE_RATE,
            charge_time: WEAPON_CHARGE_TIME,
            projectile_lifetime: PROJECTILE_LIFETIME,
            collider_radius: PROJECTILE_COLLIDER_RADIUS,
        }
    }
}

impl WeaponDefinition {
    /// Reject values that would make the weapon misbehave at runtime.
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |reason: &'static str| SimError::InvalidWeapon {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if !(self.damage.is_finite() && self.damage >= 0.0) {
            return Err(invalid("damage must be a non-negative number"));
        }
        if !(self.projectile_force.is_finite() && self.projectile_force >= 0.0) {
            return Err(invalid("projectile_force must be a non-negative number"));
        }
        if !(self.projectile_speed.is_finite() && self.projectile_speed >= 0.0) {
            return Err(invalid("projectile_speed must be a non-negative number"));
        }
        if !self.projectile_gravity.is_finite() {
            return Err(invalid("projectile_gravity must be finite"));
        }
        if !(self.projectile_lifetime.is_finite() && self.projectile_lifetime > 0.0) {
            return Err(invalid("projectile_lifetime must be positive"));
        }
        if !(self.collider_radius.is_finite() && self.collider_radius > 0.0) {
            return Err(invalid("collider_radius must be positive"));
        }
        match self.limiter {
            WeaponLimiter::FireRate if !(self.fire_rate.is_finite() && self.fire_rate > 0.0) => {
                Err(invalid("fire_rate must be positive for a fire_rate weapon"))
            }
            WeaponLimiter::Charge
                if !(self.charge_time.is_finite() && self.charge_time >= 0.0) =>
            {
                Err(invalid("charge_time must be non-negative for a charge weapon"))
            }
            _ => Ok(()),
        }
    }
}

/// Spawn one projectile for `weapon` at the origin's position, then arm it.
///
/// Returns the projectile entity, or `None` when there is no origin.
pub fn use_weapon(
    commands: &mut Commands,
    weapon: &WeaponDefinition,
    origin: Option<&ShotOrigin>,
) -> Option<Entity> {
    let origin = origin?;

    let mut transform = Transform::from_translation(origin.position.extend(0.0));
    let mut projectile = Projectile::default();
    projectile.initialize(Some(origin), weapon, &mut transform);

    Some(spawn_projectile(
        commands,
        projectile,
        transform,
        weapon.collider_radius,
    ))
}

// ── Catalog ────────────────────────────────────────────────────────────────────

/// Index into [`WeaponCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeaponId(pub usize);

/// All weapons known to the simulation, plus the default weapon and the
/// loadout slots handed to new attackers.
#[derive(Resource, Debug, Clone)]
pub struct WeaponCatalog {
    weapons: Vec<WeaponDefinition>,
    default_weapon: Option<WeaponId>,
    loadout: Vec<WeaponId>,
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self {
            weapons: vec![WeaponDefinition::default()],
            default_weapon: Some(WeaponId(0)),
            loadout: vec![WeaponId(0)],
        }
    }
}

impl WeaponCatalog {
    /// Build a catalog, resolving the default weapon and loadout by name.
    ///
    /// Every definition is validated; names must be unique.  An empty
    /// `default_name` means attackers start unarmed.
    pub fn from_definitions(
        weapons: Vec<WeaponDefinition>,
        default_name: &str,
        loadout_names: &[String],
    ) -> SimResult<Self> {
        for (i, weapon) in weapons.iter().enumerate() {
            weapon.validate()?;
            if weapons[..i].iter().any(|w| w.name == weapon.name) {
                return Err(SimError::InvalidWeapon {
                    name: weapon.name.clone(),
                    reason: "duplicate weapon name",
                });
            }
        }

        let mut catalog = Self {
            weapons,
            default_weapon: None,
            loadout: Vec::with_capacity(loadout_names.len()),
        };

        if !default_name.is_empty() {
            catalog.default_weapon = Some(catalog.require(default_name)?);
        }
        for name in loadout_names {
            let id = catalog.require(name)?;
            catalog.loadout.push(id);
        }

        Ok(catalog)
    }

    pub fn from_config(config: &CombatConfig) -> SimResult<Self> {
        Self::from_definitions(
            config.weapons.clone(),
            &config.default_weapon,
            &config.loadout,
        )
    }

    fn require(&self, name: &str) -> SimResult<WeaponId> {
        self.find(name).ok_or_else(|| SimError::UnknownWeapon {
            name: name.to_string(),
        })
    }

    pub fn get(&self, id: WeaponId) -> Option<&WeaponDefinition> {
        self.weapons.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<WeaponId> {
        self.weapons.iter().position(|w| w.name == name).map(WeaponId)
    }

    pub fn default_weapon(&self) -> Option<WeaponId> {
        self.default_weapon
    }

    pub fn loadout(&self) -> &[WeaponId] {
        &self.loadout
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
