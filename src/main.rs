use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use paper_skirmish::config::{load_combat_config, CombatConfig};
use paper_skirmish::scenario::{Scenario, ScenarioConfig, ScenarioPlugin, SCENARIO_ENV_VAR};
use paper_skirmish::simulation::{build_weapon_catalog, create_headless_app};
use paper_skirmish::spawn::{spawn_dummy, spawn_player, spawn_world_bounds};
use paper_skirmish::weapon::WeaponCatalog;
use std::env;
use std::time::Duration;

/// Frames each scenario runs before exiting.
const FRAME_LIMIT: u32 = 600;

/// Simulated time per frame.  The run is deterministic and not tied to the
/// wall clock.
const FRAME_TIME: Duration = Duration::from_millis(20);

fn setup_arena(mut commands: Commands, config: Res<CombatConfig>, catalog: Res<WeaponCatalog>) {
    spawn_world_bounds(&mut commands, &config, Vec2::ZERO);
    spawn_player(&mut commands, &config, &catalog, Vec2::new(-3.0, 0.0));
    for y in [-1.5, 0.0, 1.5] {
        spawn_dummy(&mut commands, &config, Vec2::new(2.5, y));
    }
}

fn main() {
    let requested = env::var(SCENARIO_ENV_VAR).unwrap_or_else(|_| "idle".to_string());
    let scenario = Scenario::from_name(&requested);

    let mut app = create_headless_app(CombatConfig::default());
    app.add_plugins(LogPlugin::default())
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME_TIME))
        .add_plugins(ScenarioPlugin {
            config: ScenarioConfig::new(scenario.unwrap_or(Scenario::Idle), FRAME_LIMIT),
        })
        .add_systems(
            Startup,
            (
                // Load config first so the catalog and arena see the final values.
                load_combat_config.before(build_weapon_catalog),
                setup_arena.after(build_weapon_catalog),
            ),
        );

    if scenario.is_none() {
        warn!("unknown scenario '{requested}'; running 'idle'");
    }

    app.run();
}
