//! Scripted scenarios for the headless runner.
//!
//! A scenario drives the player's [`ControlIntent`] from the frame counter,
//! logs a summary every [`REPORT_INTERVAL`] frames and exits the app once
//! `frame_limit` is reached.  Select one with the `PAPER_SKIRMISH_SCENARIO`
//! environment variable; `idle` runs when it is unset or unknown.

use crate::actor::{Actor, ActorDied};
use crate::intent::ControlIntent;
use crate::spawn::{Player, TrainingDummy};
use crate::weapon::{weapon_select_system, Attacker, WeaponCatalog, WeaponFired, WeaponLimiter};
use bevy::app::AppExit;
use bevy::prelude::*;

pub const SCENARIO_ENV_VAR: &str = "PAPER_SKIRMISH_SCENARIO";
pub const REPORT_INTERVAL: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// No input at all.
    Idle,
    /// Sweep up and down with the trigger held.
    Strafe,
    /// Switch to the first charge weapon and fire full charges.
    Charge,
    /// Switch to the first one-shot weapon and fire it repeatedly.
    OneShot,
}

impl Scenario {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "idle" => Some(Self::Idle),
            "strafe" => Some(Self::Strafe),
            "charge" => Some(Self::Charge),
            "one_shot" => Some(Self::OneShot),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Strafe => "strafe",
            Self::Charge => "charge",
            Self::OneShot => "one_shot",
        }
    }

    /// Intent for the player on `frame`.  `slot` is the loadout slot of the
    /// weapon this scenario needs, if it has one.
    pub fn intent_at(&self, frame: u32, slot: Option<usize>) -> ControlIntent {
        match self {
            Self::Idle => ControlIntent::default(),
            Self::Strafe => {
                let up = (frame / 50) % 2 == 0;
                let y = if up { 1.0 } else { -1.0 };
                ControlIntent::moving(Vec2::new(0.0, y)).attacking(true)
            }
            Self::Charge => {
                let cycle = frame % 90;
                ControlIntent {
                    weapon_slot: if cycle == 0 { slot } else { None },
                    attack_held: (1..=70).contains(&cycle),
                    ..Default::default()
                }
            }
            Self::OneShot => {
                let cycle = frame % 50;
                ControlIntent {
                    weapon_slot: if cycle == 0 { slot } else { None },
                    attack_held: cycle == 1,
                    ..Default::default()
                }
            }
        }
    }

    fn limiter(&self) -> Option<WeaponLimiter> {
        match self {
            Self::Charge => Some(WeaponLimiter::Charge),
            Self::OneShot => Some(WeaponLimiter::OneShot),
            Self::Idle | Self::Strafe => None,
        }
    }
}

/// Runner state and counters.
#[derive(Resource, Debug, Clone)]
pub struct ScenarioConfig {
    pub scenario: Scenario,
    pub frame_limit: u32,
    pub frame_count: u32,
    pub shots: u32,
    pub kills: u32,
}

impl ScenarioConfig {
    pub fn new(scenario: Scenario, frame_limit: u32) -> Self {
        Self {
            scenario,
            frame_limit,
            frame_count: 0,
            shots: 0,
            kills: 0,
        }
    }
}

pub struct ScenarioPlugin {
    pub config: ScenarioConfig,
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone()).add_systems(
            Update,
            (drive_scenario_intent_system, scenario_report_system)
                .chain()
                .before(weapon_select_system),
        );
    }
}

/// Loadout slot of the first weapon with `limiter`.
pub fn slot_for(attacker: &Attacker, catalog: &WeaponCatalog, limiter: WeaponLimiter) -> Option<usize> {
    attacker
        .loadout
        .iter()
        .position(|id| catalog.get(*id).is_some_and(|w| w.limiter == limiter))
}

pub fn drive_scenario_intent_system(
    mut scenario: ResMut<ScenarioConfig>,
    mut q_player: Query<(&mut ControlIntent, &Attacker), With<Player>>,
    catalog: Res<WeaponCatalog>,
) {
    let frame = scenario.frame_count;
    scenario.frame_count += 1;

    for (mut intent, attacker) in q_player.iter_mut() {
        let slot = scenario
            .scenario
            .limiter()
            .and_then(|limiter| slot_for(attacker, &catalog, limiter));
        *intent = scenario.scenario.intent_at(frame, slot);
    }
}

pub fn scenario_report_system(
    mut scenario: ResMut<ScenarioConfig>,
    mut fired: MessageReader<WeaponFired>,
    mut died: MessageReader<ActorDied>,
    q_dummies: Query<&Actor, With<TrainingDummy>>,
    mut exit: MessageWriter<AppExit>,
) {
    scenario.shots += fired.read().count() as u32;
    scenario.kills += died.read().count() as u32;

    let frame = scenario.frame_count;
    let done = frame >= scenario.frame_limit;
    if !(done || frame % REPORT_INTERVAL == 0) {
        return;
    }

    let health: Vec<String> = q_dummies.iter().map(|a| format!("{:.1}", a.health)).collect();
    info!(
        "[scenario] {} frame {}/{} | shots: {} | kills: {} | dummy health: [{}]",
        scenario.scenario.name(),
        frame,
        scenario.frame_limit,
        scenario.shots,
        scenario.kills,
        health.join(", ")
    );

    if done {
        info!("[scenario] {} complete", scenario.scenario.name());
        exit.write(AppExit::Success);
    }
}
