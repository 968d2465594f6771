//! Combat simulation plugin: resources, messages and system ordering.
//!
//! | Schedule | Systems (in order) |
//! |----------|--------------------|
//! | `Startup` | `build_weapon_catalog` → `apply_fixed_rate` → `setup_physics_config` |
//! | `FixedUpdate` | drag → movement → projectile flight |
//! | `Update` | weapon select → weapon fire → projectile expiry → out-of-bounds despawn → heal requests → tilt |
//! | `FixedPostUpdate` | rapier step, then projectile hits after the writeback |
//!
//! Rapier runs on the fixed clock with a matching fixed `dt`, so every
//! velocity written in `FixedUpdate` is integrated over exactly the step it
//! was computed for, however many fixed steps a frame runs.

use crate::actor::{apply_heal_requests_system, drag_system, ActorDied, HealRequest};
use crate::bounds::despawn_out_of_bounds_system;
use crate::config::CombatConfig;
use crate::movement::{apply_tilt_system, movement_system};
use crate::projectile::{projectile_expiry_system, projectile_flight_system, projectile_hit_system};
use crate::weapon::{weapon_fire_system, weapon_select_system, WeaponCatalog, WeaponFired};
use bevy::prelude::*;
use bevy_rapier2d::plugin::TimestepMode;
use bevy_rapier2d::prelude::*;

pub struct CombatSimulationPlugin;

impl Plugin for CombatSimulationPlugin {
    fn build(&self, app: &mut App) {
        // init_resource keeps a config inserted before the plugin.
        app.init_resource::<CombatConfig>()
            .init_resource::<WeaponCatalog>()
            .add_message::<CollisionEvent>()
            .add_message::<ActorDied>()
            .add_message::<HealRequest>()
            .add_message::<WeaponFired>()
            .add_systems(
                Startup,
                (build_weapon_catalog, apply_fixed_rate, setup_physics_config).chain(),
            )
            .add_systems(
                FixedUpdate,
                (drag_system, movement_system, projectile_flight_system).chain(),
            )
            .add_systems(
                Update,
                (
                    weapon_select_system,
                    weapon_fire_system,
                    projectile_expiry_system,
                    despawn_out_of_bounds_system,
                    apply_heal_requests_system,
                    apply_tilt_system,
                )
                    .chain(),
            )
            .add_systems(
                FixedPostUpdate,
                projectile_hit_system.after(bevy_rapier2d::plugin::PhysicsSet::Writeback),
            );
    }
}

/// Rebuild the [`WeaponCatalog`] from the (possibly file-loaded) config.
///
/// An unusable weapon table is logged and the previous catalog is kept.
pub fn build_weapon_catalog(config: Res<CombatConfig>, mut catalog: ResMut<WeaponCatalog>) {
    match WeaponCatalog::from_config(&config) {
        Ok(built) => {
            info!("[sim] weapon catalog ready: {} weapon(s)", built.len());
            *catalog = built;
        }
        Err(e) => {
            warn!("[sim] {e}; keeping the built-in weapon catalog");
        }
    }
}

/// Match the fixed timestep, and rapier's step when physics is present, to
/// `CombatConfig::fixed_hz`.
pub fn apply_fixed_rate(
    config: Res<CombatConfig>,
    mut fixed: ResMut<Time<Fixed>>,
    timestep: Option<ResMut<TimestepMode>>,
) {
    fixed.set_timestep_hz(config.fixed_hz);
    if let Some(mut mode) = timestep {
        *mode = TimestepMode::Fixed {
            dt: 1.0 / config.fixed_hz as f32,
            substeps: 1,
        };
    }
}

/// Hand the configured world gravity to rapier.  Actors spawn with a zero
/// gravity scale, so only arcing projectiles feel it.
pub fn setup_physics_config(
    config: Res<CombatConfig>,
    mut rapier: Query<&mut RapierConfiguration>,
) {
    for mut cfg in rapier.iter_mut() {
        cfg.gravity = config.world_gravity();
    }
}

/// Headless app with rapier physics and the combat plugin, nothing rendered.
///
/// `pixels_per_meter(1.0)` keeps world units and physics units identical,
/// so speeds and impulses in the config read in world units.  Physics runs in
/// `FixedPostUpdate`, right after the movement and flight systems.
pub fn create_headless_app(config: CombatConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(bevy::transform::TransformPlugin)
        .insert_resource(config)
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0).in_fixed_schedule())
        .add_plugins(CombatSimulationPlugin);
    app
}
