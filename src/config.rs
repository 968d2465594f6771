//! Runtime combat configuration loaded from `assets/combat.toml`.
//!
//! [`CombatConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_combat_config`] reads
//! `assets/combat.toml` and replaces the defaults with the file's values.
//! Missing keys fall back to the compile-time defaults, so a minimal TOML can
//! override just the values you care about.
//!
//! ## Weapons
//!
//! Weapons are an array of tables; `default_weapon` and `loadout` refer to
//! them by name:
//!
//! ```toml
//! default_weapon = "pencil"
//! loadout = ["pencil", "eraser"]
//!
//! [[weapons]]
//! name = "pencil"
//! damage = 5.0
//!
//! [[weapons]]
//! name = "eraser"
//! limiter = "fire_rate"
//! fire_rate = 0.25
//! ```
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/combat.toml`.
//! 2. Restart the simulation; no recompilation required.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `CombatConfig::default()`.

use crate::constants::*;
use crate::error::{validate_non_negative, validate_positive, SimError, SimResult};
use crate::weapon::{WeaponCatalog, WeaponDefinition};
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Location of the tuning file, relative to the working directory.
pub const COMBAT_CONFIG_PATH: &str = "assets/combat.toml";

/// Runtime-tunable movement, combat and weapon configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // ── World ────────────────────────────────────────────────────────────────
    pub world_bounds_width: f32,
    pub world_bounds_height: f32,
    pub world_gravity_x: f32,
    pub world_gravity_y: f32,
    pub fixed_hz: f64,

    // ── Player: Movement ─────────────────────────────────────────────────────
    pub player_move_speed_x: f32,
    pub player_move_speed_y: f32,
    pub player_acceleration_x: f32,
    pub player_acceleration_y: f32,
    pub player_deceleration_x: f32,
    pub player_deceleration_y: f32,

    // ── Player: Tilt ─────────────────────────────────────────────────────────
    pub tilt_x_speed: f32,
    pub tilt_x_max: f32,
    pub tilt_z_speed: f32,
    pub tilt_z_max: f32,

    // ── Actors ───────────────────────────────────────────────────────────────
    pub player_base_health: f32,
    pub player_base_damage: f32,
    pub player_muzzle_offset_x: f32,
    pub player_muzzle_offset_y: f32,
    pub player_collider_radius: f32,
    pub dummy_base_health: f32,
    pub dummy_drag: f32,
    pub dummy_collider_radius: f32,

    // ── Weapons ──────────────────────────────────────────────────────────────
    pub weapons: Vec<WeaponDefinition>,
    /// Name of the weapon attackers start with; empty means unarmed.
    pub default_weapon: String,
    /// Weapon names bound to selection slots 0, 1, 2, ...
    pub loadout: Vec<String>,
}

impl Default for CombatConfig {
    fn default() -> Self {
        let pencil = WeaponDefinition::default();
        Self {
            world_bounds_width: WORLD_BOUNDS_WIDTH,
            world_bounds_height: WORLD_BOUNDS_HEIGHT,
            world_gravity_x: WORLD_GRAVITY_X,
            world_gravity_y: WORLD_GRAVITY_Y,
            fixed_hz: FIXED_HZ,

            player_move_speed_x: PLAYER_MOVE_SPEED_X,
            player_move_speed_y: PLAYER_MOVE_SPEED_Y,
            player_acceleration_x: PLAYER_ACCELERATION_X,
            player_acceleration_y: PLAYER_ACCELERATION_Y,
            player_deceleration_x: PLAYER_DECELERATION_X,
            player_deceleration_y: PLAYER_DECELERATION_Y,

            tilt_x_speed: TILT_X_SPEED,
            tilt_x_max: TILT_X_MAX,
            tilt_z_speed: TILT_Z_SPEED,
            tilt_z_max: TILT_Z_MAX,

            player_base_health: PLAYER_BASE_HEALTH,
            player_base_damage: PLAYER_BASE_DAMAGE,
            player_muzzle_offset_x: PLAYER_MUZZLE_OFFSET_X,
            player_muzzle_offset_y: PLAYER_MUZZLE_OFFSET_Y,
            player_collider_radius: PLAYER_COLLIDER_RADIUS,
            dummy_base_health: DUMMY_BASE_HEALTH,
            dummy_drag: DUMMY_DRAG,
            dummy_collider_radius: DUMMY_COLLIDER_RADIUS,

            default_weapon: pencil.name.clone(),
            loadout: vec![pencil.name.clone()],
            weapons: vec![pencil],
        }
    }
}

impl CombatConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SimError::ConfigParse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse `path`.  A missing file is `Ok(None)`.
    pub fn load_from(path: impl AsRef<Path>) -> SimResult<Option<Self>> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SimError::ConfigRead {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Range-check every value and resolve the weapon names.
    pub fn validate(&self) -> SimResult<()> {
        validate_positive("world_bounds_width", self.world_bounds_width)?;
        validate_positive("world_bounds_height", self.world_bounds_height)?;
        validate_finite("world_gravity_x", self.world_gravity_x)?;
        validate_finite("world_gravity_y", self.world_gravity_y)?;
        validate_positive("fixed_hz", self.fixed_hz as f32)?;

        validate_non_negative("player_move_speed_x", self.player_move_speed_x)?;
        validate_non_negative("player_move_speed_y", self.player_move_speed_y)?;
        validate_finite("player_acceleration_x", self.player_acceleration_x)?;
        validate_finite("player_acceleration_y", self.player_acceleration_y)?;
        validate_finite("player_deceleration_x", self.player_deceleration_x)?;
        validate_finite("player_deceleration_y", self.player_deceleration_y)?;

        validate_non_negative("tilt_x_speed", self.tilt_x_speed)?;
        validate_finite("tilt_x_max", self.tilt_x_max)?;
        validate_non_negative("tilt_z_speed", self.tilt_z_speed)?;
        validate_finite("tilt_z_max", self.tilt_z_max)?;

        validate_positive("player_base_health", self.player_base_health)?;
        validate_finite("player_base_damage", self.player_base_damage)?;
        validate_finite("player_muzzle_offset_x", self.player_muzzle_offset_x)?;
        validate_finite("player_muzzle_offset_y", self.player_muzzle_offset_y)?;
        validate_positive("player_collider_radius", self.player_collider_radius)?;
        validate_positive("dummy_base_health", self.dummy_base_health)?;
        validate_non_negative("dummy_drag", self.dummy_drag)?;
        validate_positive("dummy_collider_radius", self.dummy_collider_radius)?;

        WeaponCatalog::from_config(self).map(|_| ())
    }

    pub fn world_bounds_size(&self) -> Vec2 {
        Vec2::new(self.world_bounds_width, self.world_bounds_height)
    }

    pub fn world_gravity(&self) -> Vec2 {
        Vec2::new(self.world_gravity_x, self.world_gravity_y)
    }

    pub fn player_muzzle_offset(&self) -> Vec2 {
        Vec2::new(self.player_muzzle_offset_x, self.player_muzzle_offset_y)
    }
}

fn validate_finite(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "finite",
        })
    }
}

/// Startup system: attempt to load `assets/combat.toml` into the
/// `CombatConfig` resource.
///
/// A missing file keeps the compiled defaults.  Read, parse and validation
/// errors are logged and also keep the defaults; they never abort the run.
pub fn load_combat_config(mut config: ResMut<CombatConfig>) {
    match CombatConfig::load_from(COMBAT_CONFIG_PATH) {
        Ok(Some(loaded)) => {
            *config = loaded;
            info!("[config] loaded combat config from {COMBAT_CONFIG_PATH}");
        }
        Ok(None) => {
            info!("[config] no {COMBAT_CONFIG_PATH} found; using compiled defaults");
        }
        Err(e) => {
            warn!("[config] {e}; using compiled defaults");
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapon::WeaponLimiter;

    #[test]
    fn defaults_are_valid() {
        assert!(CombatConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = CombatConfig::from_toml_str("world_bounds_width = 24.0").unwrap();
        assert_eq!(config.world_bounds_width, 24.0);
        assert_eq!(config.world_bounds_height, WORLD_BOUNDS_HEIGHT);
        assert_eq!(config.weapons, CombatConfig::default().weapons);
    }

    #[test]
    fn weapon_tables_parse_with_per_weapon_defaults() {
        let text = r#"
            default_weapon = "pencil"
            loadout = ["pencil", "eraser"]

            [[weapons]]
            name = "pencil"

            [[weapons]]
            name = "eraser"
            limiter = "fire_rate"
            fire_rate = 0.25
        "#;
        let config = CombatConfig::from_toml_str(text).unwrap();

        assert_eq!(config.weapons.len(), 2);
        let eraser = &config.weapons[1];
        assert_eq!(eraser.limiter, WeaponLimiter::FireRate);
        assert_eq!(eraser.fire_rate, 0.25);
        assert_eq!(eraser.damage, WEAPON_DAMAGE);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = CombatConfig::from_toml_str("world_bounds_width = [").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse { .. }));
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let err = CombatConfig::from_toml_str("world_bounds_width = -1.0").unwrap_err();
        assert!(matches!(
            err,
            SimError::UnsafeConstant {
                name: "world_bounds_width",
                ..
            }
        ));
    }

    #[test]
    fn loadout_name_must_exist() {
        let err = CombatConfig::from_toml_str(r#"loadout = ["crayon"]"#).unwrap_err();
        assert_eq!(
            err,
            SimError::UnknownWeapon {
                name: "crayon".to_string()
            }
        );
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let loaded = CombatConfig::load_from("assets/does_not_exist.toml").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn shipped_config_is_valid() {
        let config = CombatConfig::from_toml_str(include_str!("../assets/combat.toml")).unwrap();
        assert!(config.weapons.len() > 1);
        assert!(!config.loadout.is_empty());
    }
}
