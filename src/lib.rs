//! Paper Skirmish combat and movement core.
//!
//! Actor health and knockback, weapon firing policies, projectile lifecycle
//! and bounded movement for a top-down 2D action game, built on Bevy ECS with
//! Rapier2D bodies.  Nothing here renders; input arrives through the
//! [`intent::ControlIntent`] component, so the whole simulation runs headless.

pub mod actor;
pub mod bounds;
pub mod config;
pub mod constants;
pub mod error;
pub mod intent;
pub mod movement;
pub mod projectile;
pub mod scenario;
pub mod simulation;
pub mod spawn;
pub mod weapon;

#[cfg(test)]
pub(crate) mod test_support;
