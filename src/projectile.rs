//! Projectile lifecycle: Uninitialized → Flying → Expired.
//!
//! - [`projectile_flight_system`] (FixedUpdate) drives `linvel = direction * speed`.
//! - [`projectile_expiry_system`] (Update) expires projectiles that left the
//!   bounds or ran out of lifetime, and despawns every expired projectile.
//! - [`projectile_hit_system`] (FixedPostUpdate) resolves rapier collision messages:
//!   owner overlaps are ignored, `Actor` targets take damage and knockback,
//!   anything else is ignored.

use crate::actor::{apply_force, kill_actor, Actor, ActorDied};
use crate::bounds::WorldBounds;
use crate::constants::PROJECTILE_LIFETIME;
use crate::weapon::WeaponDefinition;
use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;
use std::collections::HashSet;

/// Collision membership for actors (player, dummies).
pub const ACTOR_GROUP: Group = Group::GROUP_2;
/// Collision membership for projectiles.  Projectiles only see actors.
pub const PROJECTILE_GROUP: Group = Group::GROUP_3;

// ── Components ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Uninitialized,
    Flying,
    Expired,
}

/// Where a shot comes from and who fired it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotOrigin {
    pub owner: Entity,
    pub position: Vec2,
    /// Un-normalized aim; the projectile normalizes it once at launch.
    pub direction: Vec2,
    /// Owner's flat damage bonus.
    pub base_damage: f32,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Compared by identity only; the owner may be gone by the time we hit.
    pub owner: Option<Entity>,
    /// Unit vector, frozen at launch.
    pub direction: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub force: f32,
    pub gravity_scale: f32,
    /// Seconds left before the projectile expires on its own.
    pub lifetime: f32,
    pub state: ProjectileState,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            owner: None,
            direction: Vec2::ZERO,
            speed: 0.0,
            damage: 0.0,
            force: 0.0,
            gravity_scale: 0.0,
            lifetime: PROJECTILE_LIFETIME,
            state: ProjectileState::Uninitialized,
        }
    }
}

impl Projectile {
    /// Arm the projectile with `weapon`'s parameters and enter `Flying`.
    ///
    /// Damage is the weapon's plus the owner's base damage.  With a non-zero
    /// direction, `transform` is rotated to face it about Z.  Without an
    /// origin the projectile is ownerless and heads along +X.
    pub fn initialize(
        &mut self,
        origin: Option<&ShotOrigin>,
        weapon: &WeaponDefinition,
        transform: &mut Transform,
    ) {
        let (owner, aim, base_damage) = match origin {
            Some(o) => (Some(o.owner), o.direction, o.base_damage),
            None => (None, Vec2::X, 0.0),
        };

        self.owner = owner;
        self.direction = aim.normalize_or_zero();
        self.speed = weapon.projectile_speed;
        self.damage = weapon.damage + base_damage;
        self.force = weapon.projectile_force;
        self.gravity_scale = weapon.projectile_gravity;
        self.lifetime = weapon.projectile_lifetime;

        if self.direction != Vec2::ZERO {
            let angle = self.direction.y.atan2(self.direction.x);
            transform.rotation = Quat::from_rotation_z(angle);
        }

        self.state = ProjectileState::Flying;
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.state == ProjectileState::Flying
    }

    /// One frame of expiry bookkeeping.  Leaving the bounds expires the
    /// projectile before the lifetime is touched.
    pub fn tick_expiry(&mut self, inside_bounds: bool, dt: f32) {
        if !self.is_flying() {
            return;
        }
        if !inside_bounds {
            self.state = ProjectileState::Expired;
            return;
        }
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.state = ProjectileState::Expired;
        }
    }
}

/// Spawn an initialized projectile body.
pub fn spawn_projectile(
    commands: &mut Commands,
    projectile: Projectile,
    transform: Transform,
    collider_radius: f32,
) -> Entity {
    let gravity = projectile.gravity_scale;
    let linvel = projectile.direction * projectile.speed;
    commands
        .spawn((
            projectile,
            transform,
            RigidBody::Dynamic,
            Velocity {
                linvel,
                angvel: 0.0,
            },
            GravityScale(gravity),
            Collider::ball(collider_radius),
            // Sensor: reports overlaps for hit logic without pushing the target.
            // Knockback is applied explicitly as an impulse.
            Sensor,
            Ccd { enabled: true },
            LockedAxes::ROTATION_LOCKED,
            CollisionGroups::new(PROJECTILE_GROUP, ACTOR_GROUP),
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

// ── Systems ────────────────────────────────────────────────────────────────────

pub fn projectile_flight_system(mut q: Query<(&Projectile, &mut Velocity)>) {
    for (projectile, mut velocity) in q.iter_mut() {
        if projectile.is_flying() {
            velocity.linvel = projectile.direction * projectile.speed;
        }
    }
}

pub fn projectile_expiry_system(
    mut commands: Commands,
    mut q: Query<(Entity, &mut Projectile, &Transform)>,
    bounds: WorldBounds,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    let rect = bounds.rect();

    for (entity, mut projectile, transform) in q.iter_mut() {
        let inside = rect.is_none_or(|r| r.contains(transform.translation.truncate()));
        projectile.tick_expiry(inside, dt);

        if projectile.state == ProjectileState::Expired {
            debug!("[projectile] {:?} expired", entity);
            commands.entity(entity).despawn();
        }
    }
}

/// Resolve projectile overlaps reported by rapier.
///
/// Each projectile lands at most one hit, and a target killed earlier in
/// this pass is never damaged again.
pub fn projectile_hit_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    mut q_projectiles: Query<&mut Projectile>,
    mut q_targets: Query<(&mut Actor, Option<&mut ExternalImpulse>)>,
    mut died: MessageWriter<ActorDied>,
) {
    let mut processed: HashSet<Entity> = HashSet::new();
    let mut killed: HashSet<Entity> = HashSet::new();

    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        let (projectile_entity, target) = if q_projectiles.contains(e1) {
            (e1, e2)
        } else if q_projectiles.contains(e2) {
            (e2, e1)
        } else {
            continue;
        };

        if processed.contains(&projectile_entity) || killed.contains(&target) {
            continue;
        }

        let Ok(mut projectile) = q_projectiles.get_mut(projectile_entity) else {
            continue;
        };
        if !projectile.is_flying() || projectile.owner == Some(target) {
            continue;
        }

        let Ok((mut actor, mut impulse)) = q_targets.get_mut(target) else {
            continue;
        };

        let lethal = actor.take_damage(projectile.damage);
        apply_force(impulse.as_deref_mut(), projectile.force, projectile.direction);
        debug!(
            "[projectile] {:?} hit {:?} for {} (health now {})",
            projectile_entity, target, projectile.damage, actor.health
        );

        if lethal {
            killed.insert(target);
            kill_actor(&mut commands, &mut died, target, projectile.owner);
        }

        projectile.state = ProjectileState::Expired;
        processed.insert(projectile_entity);
        commands.entity(projectile_entity).despawn();
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundsOwner;
    use crate::test_support::{fixed_step_app, run_frames};
    use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

    fn pencil() -> WeaponDefinition {
        WeaponDefinition {
            damage: 30.0,
            projectile_force: 4.0,
            projectile_speed: 8.0,
            ..WeaponDefinition::default()
        }
    }

    fn flying(owner: Option<Entity>) -> Projectile {
        let mut p = Projectile::default();
        let origin = owner.map(|owner| ShotOrigin {
            owner,
            position: Vec2::ZERO,
            direction: Vec2::X,
            base_damage: 0.0,
        });
        p.initialize(origin.as_ref(), &pencil(), &mut Transform::default());
        p
    }

    #[test]
    fn initialize_adds_owner_base_damage_and_normalizes() {
        let owner = World::new().spawn_empty().id();
        let origin = ShotOrigin {
            owner,
            position: Vec2::ZERO,
            direction: Vec2::new(1.0, 1.0),
            base_damage: 2.5,
        };
        let mut transform = Transform::default();
        let mut p = Projectile::default();
        p.initialize(Some(&origin), &pencil(), &mut transform);

        assert_eq!(p.state, ProjectileState::Flying);
        assert_eq!(p.owner, Some(owner));
        assert_eq!(p.damage, 32.5);
        assert!((p.direction.length() - 1.0).abs() < 1e-5);

        let (_, _, z) = transform.rotation.to_euler(EulerRot::XYZ);
        assert!((z - std::f32::consts::FRAC_PI_4).abs() < 1e-4);
    }

    #[test]
    fn zero_direction_keeps_identity_rotation() {
        let origin = ShotOrigin {
            owner: Entity::PLACEHOLDER,
            position: Vec2::ZERO,
            direction: Vec2::ZERO,
            base_damage: 0.0,
        };
        let mut transform = Transform::default();
        let mut p = Projectile::default();
        p.initialize(Some(&origin), &pencil(), &mut transform);

        assert_eq!(p.direction, Vec2::ZERO);
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert!(p.is_flying());
    }

    #[test]
    fn leaving_bounds_expires_before_lifetime_ticks() {
        let mut p = flying(None);
        let before = p.lifetime;
        p.tick_expiry(false, 0.1);
        assert_eq!(p.state, ProjectileState::Expired);
        assert_eq!(p.lifetime, before);
    }

    #[test]
    fn lifetime_runs_out() {
        let mut p = flying(None);
        p.lifetime = 0.25;
        p.tick_expiry(true, 0.125);
        assert!(p.is_flying());
        p.tick_expiry(true, 0.125);
        assert_eq!(p.state, ProjectileState::Expired);
    }

    #[test]
    fn zero_lifetime_expires_on_first_tick() {
        let mut p = flying(None);
        p.lifetime = 0.0;
        p.tick_expiry(true, 0.0);
        assert_eq!(p.state, ProjectileState::Expired);
    }

    // ── system tests ──────────────────────────────────────────────────────────

    fn hit_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CollisionEvent>();
        app.add_message::<ActorDied>();
        app.add_systems(PostUpdate, projectile_hit_system);
        app
    }

    fn started(a: Entity, b: Entity) -> CollisionEvent {
        CollisionEvent::Started(a, b, CollisionEventFlags::empty())
    }

    fn died_count(app: &mut App) -> usize {
        let messages = app.world().resource::<Messages<ActorDied>>();
        messages.get_cursor().read(messages).count()
    }

    #[test]
    fn hit_damages_knocks_back_and_despawns_projectile() {
        let mut app = hit_test_app();
        let shooter = app.world_mut().spawn(Actor::new(100.0)).id();
        let target = app
            .world_mut()
            .spawn((Actor::new(100.0), ExternalImpulse::default()))
            .id();
        let shot = app.world_mut().spawn(flying(Some(shooter))).id();

        app.world_mut().write_message(started(target, shot));
        app.update();

        assert_eq!(app.world().get::<Actor>(target).unwrap().health, 70.0);
        let impulse = app.world().get::<ExternalImpulse>(target).unwrap().impulse;
        assert!((impulse - Vec2::new(4.0, 0.0)).length() < 1e-5);
        assert!(app.world().get_entity(shot).is_err());
    }

    #[test]
    fn owner_overlap_is_ignored() {
        let mut app = hit_test_app();
        let shooter = app.world_mut().spawn(Actor::new(100.0)).id();
        let shot = app.world_mut().spawn(flying(Some(shooter))).id();

        app.world_mut().write_message(started(shot, shooter));
        app.update();

        assert_eq!(app.world().get::<Actor>(shooter).unwrap().health, 100.0);
        let p = app.world().get::<Projectile>(shot).unwrap();
        assert!(p.is_flying(), "projectile keeps flying past its owner");
    }

    #[test]
    fn non_damageable_overlap_is_ignored() {
        let mut app = hit_test_app();
        let wall = app.world_mut().spawn(Transform::default()).id();
        let shot = app.world_mut().spawn(flying(None)).id();

        app.world_mut().write_message(started(shot, wall));
        app.update();

        assert!(app.world().get::<Projectile>(shot).unwrap().is_flying());
    }

    #[test]
    fn projectile_hits_at_most_once_per_pass() {
        let mut app = hit_test_app();
        let a = app.world_mut().spawn(Actor::new(100.0)).id();
        let b = app.world_mut().spawn(Actor::new(100.0)).id();
        let shot = app.world_mut().spawn(flying(None)).id();

        app.world_mut().write_message(started(shot, a));
        app.world_mut().write_message(started(shot, b));
        app.update();

        assert_eq!(app.world().get::<Actor>(a).unwrap().health, 70.0);
        assert_eq!(app.world().get::<Actor>(b).unwrap().health, 100.0);
    }

    #[test]
    fn killed_target_is_not_damaged_twice_in_one_pass() {
        let mut app = hit_test_app();
        let shooter = app.world_mut().spawn(Actor::new(100.0)).id();
        let target = app.world_mut().spawn(Actor::new(20.0)).id();
        let first = app.world_mut().spawn(flying(Some(shooter))).id();
        let second = app.world_mut().spawn(flying(Some(shooter))).id();

        app.world_mut().write_message(started(first, target));
        app.world_mut().write_message(started(second, target));
        app.update();

        assert!(app.world().get_entity(target).is_err());
        assert!(app.world().get_entity(first).is_err());
        let second_state = app.world().get::<Projectile>(second).unwrap();
        assert!(second_state.is_flying(), "second shot found no target");
        assert_eq!(died_count(&mut app), 1);
    }

    #[test]
    fn flight_system_drives_velocity_each_fixed_step() {
        let mut app = fixed_step_app();
        app.add_systems(FixedUpdate, projectile_flight_system);
        let shot = app
            .world_mut()
            .spawn((flying(None), Velocity::linear(Vec2::new(0.0, -3.0))))
            .id();

        run_frames(&mut app, 2);

        let linvel = app.world().get::<Velocity>(shot).unwrap().linvel;
        assert_eq!(linvel, Vec2::new(8.0, 0.0));
    }

    #[test]
    fn expiry_system_despawns_outside_bounds() {
        let mut app = fixed_step_app();
        app.add_systems(Update, projectile_expiry_system);
        app.world_mut().spawn((
            BoundsOwner {
                size: Vec2::new(10.0, 10.0),
            },
            Transform::default(),
        ));
        let inside = app
            .world_mut()
            .spawn((flying(None), Transform::from_xyz(1.0, 0.0, 0.0)))
            .id();
        let outside = app
            .world_mut()
            .spawn((flying(None), Transform::from_xyz(6.0, 0.0, 0.0)))
            .id();

        app.update();

        assert!(app.world().get_entity(inside).is_ok());
        assert!(app.world().get_entity(outside).is_err());
    }

    #[test]
    fn expiry_system_unbounded_uses_lifetime_only() {
        let mut app = fixed_step_app();
        app.add_systems(Update, projectile_expiry_system);
        let mut p = flying(None);
        p.lifetime = 0.05;
        let shot = app
            .world_mut()
            .spawn((p, Transform::from_xyz(1e5, 0.0, 0.0)))
            .id();

        run_frames(&mut app, 2);
        assert!(app.world().get_entity(shot).is_ok(), "0.02 s elapsed");

        run_frames(&mut app, 2);
        assert!(app.world().get_entity(shot).is_err());
    }
}
