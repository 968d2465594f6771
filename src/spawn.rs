//! Entity assembly for the player, training dummies and the bounds owner.
//!
//! Collision groups:
//! - actors are `ACTOR_GROUP` and collide with actors and projectiles
//! - projectiles are `PROJECTILE_GROUP` and only see actors

use crate::actor::{Actor, Drag};
use crate::bounds::{BoundsOwner, DespawnOutOfBounds};
use crate::config::CombatConfig;
use crate::intent::ControlIntent;
use crate::movement::{MovementController, MovementState, TiltVisual};
use crate::projectile::{ACTOR_GROUP, PROJECTILE_GROUP};
use crate::weapon::{Attacker, WeaponCatalog, WeaponRuntimeState};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Marker component for the player character.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Marker component for training dummies.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct TrainingDummy;

/// Physics body shared by every actor: a dynamic ball that ignores world
/// gravity and never spins.
fn actor_body(radius: f32) -> impl Bundle {
    (
        RigidBody::Dynamic,
        Collider::ball(radius),
        Velocity::zero(),
        ExternalImpulse::default(),
        GravityScale(0.0),
        LockedAxes::ROTATION_LOCKED,
        CollisionGroups::new(ACTOR_GROUP, ACTOR_GROUP | PROJECTILE_GROUP),
        ActiveEvents::COLLISION_EVENTS,
    )
}

/// Spawn the entity whose position centres the world bounds.
pub fn spawn_world_bounds(commands: &mut Commands, config: &CombatConfig, center: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("WorldBounds"),
            BoundsOwner {
                size: config.world_bounds_size(),
            },
            Transform::from_translation(center.extend(0.0)),
        ))
        .id()
}

/// Spawn the player with a movement controller, the default weapon and a
/// child entity that receives the cosmetic tilt.
pub fn spawn_player(
    commands: &mut Commands,
    config: &CombatConfig,
    catalog: &WeaponCatalog,
    position: Vec2,
) -> Entity {
    let visual = commands
        .spawn((Name::new("PlayerVisual"), Transform::default()))
        .id();

    let player = commands
        .spawn((
            Name::new("Player"),
            Player,
            Actor::new(config.player_base_health).with_base_damage(config.player_base_damage),
            MovementController::from_config(config),
            MovementState::default(),
            ControlIntent::default(),
            Attacker::new(catalog, config.player_muzzle_offset()),
            WeaponRuntimeState::default(),
            TiltVisual(visual),
            Transform::from_translation(position.extend(0.0)),
        ))
        .insert(actor_body(config.player_collider_radius))
        .id();

    commands.entity(player).add_child(visual);
    player
}

/// Spawn a training dummy: an actor with drag that is removed once it is
/// knocked out of the bounds.
pub fn spawn_dummy(commands: &mut Commands, config: &CombatConfig, position: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("TrainingDummy"),
            TrainingDummy,
            Actor::new(config.dummy_base_health),
            Drag {
                coefficient: config.dummy_drag,
            },
            DespawnOutOfBounds,
            Transform::from_translation(position.extend(0.0)),
        ))
        .insert(actor_body(config.dummy_collider_radius))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::world::CommandQueue;

    fn spawn_with<F>(world: &mut World, f: F) -> Entity
    where
        F: FnOnce(&mut Commands) -> Entity,
    {
        let mut queue = CommandQueue::default();
        let entity = {
            let mut commands = Commands::new(&mut queue, world);
            f(&mut commands)
        };
        queue.apply(world);
        entity
    }

    #[test]
    fn player_is_armed_and_has_tilt_child() {
        let mut world = World::new();
        let config = CombatConfig::default();
        let catalog = WeaponCatalog::from_config(&config).unwrap();

        let player = spawn_with(&mut world, |c| {
            spawn_player(c, &config, &catalog, Vec2::new(1.0, 0.0))
        });

        let attacker = world.get::<Attacker>(player).unwrap();
        assert_eq!(attacker.current_weapon, catalog.default_weapon());
        assert_eq!(attacker.muzzle_offset, config.player_muzzle_offset());

        let actor = world.get::<Actor>(player).unwrap();
        assert_eq!(actor.health, config.player_base_health);

        let visual = world.get::<TiltVisual>(player).unwrap().0;
        assert_eq!(world.get::<ChildOf>(visual).map(|c| c.parent()), Some(player));
    }

    #[test]
    fn dummy_has_drag_and_bounds_despawn() {
        let mut world = World::new();
        let config = CombatConfig::default();

        let dummy = spawn_with(&mut world, |c| spawn_dummy(c, &config, Vec2::new(3.0, 0.0)));

        assert!(world.get::<DespawnOutOfBounds>(dummy).is_some());
        assert_eq!(world.get::<Drag>(dummy).unwrap().coefficient, config.dummy_drag);
        assert_eq!(world.get::<GravityScale>(dummy).unwrap().0, 0.0);
        assert!(world.get::<ExternalImpulse>(dummy).is_some());
    }
}
