//! Actors: anything with health that projectiles can hurt.
//!
//! The player and training dummies share [`Actor`].  Knockback goes through
//! the entity's Rapier `ExternalImpulse`; an actor without one (a decorative
//! body) simply ignores knockback.
//!
//! Death is terminal: the killing hit emits [`ActorDied`] and despawns the
//! entity through `Commands`, so removal lands at the next sync point and
//! callers must guard against touching the same actor again in their pass.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// Health pool plus the flat damage bonus this actor adds to its shots.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    /// Maximum health; healing never goes above this.
    pub base_health: f32,
    /// Current health.  Dips below zero on the killing hit.
    pub health: f32,
    /// Added to weapon damage for every projectile this actor fires.
    pub base_damage: f32,
}

impl Actor {
    pub fn new(base_health: f32) -> Self {
        Self {
            base_health,
            health: base_health,
            base_damage: 0.0,
        }
    }

    pub fn with_base_damage(mut self, base_damage: f32) -> Self {
        self.base_damage = base_damage;
        self
    }

    /// Subtract `amount` from health.
    ///
    /// Returns `true` only on the call that takes health to `<= 0`.  An actor
    /// that is already dead is left untouched.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health -= amount;
        self.is_dead()
    }

    /// Restore up to `amount` health, capped at `base_health`.
    pub fn heal(&mut self, amount: f32) {
        if self.health >= self.base_health {
            return;
        }
        self.health = (self.health + amount).min(self.base_health);
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Linear velocity bleed, `v -= v * coefficient * dt` every fixed step.
#[derive(Component, Debug, Clone, Copy)]
pub struct Drag {
    pub coefficient: f32,
}

// ── Messages ───────────────────────────────────────────────────────────────────

/// An actor's health reached zero and it is being removed.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ActorDied {
    pub entity: Entity,
    /// Owner of the projectile that landed the killing hit, if known.
    pub killer: Option<Entity>,
}

/// Ask the simulation to heal `target` by `amount`.
#[derive(Message, Debug, Clone, Copy)]
pub struct HealRequest {
    pub target: Entity,
    pub amount: f32,
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Impulse produced by a knockback of `force` along `direction`.
#[inline]
pub fn knockback_impulse(force: f32, direction: Vec2) -> Vec2 {
    direction.normalize_or_zero() * force
}

/// Add a knockback impulse to `body`; no-op without a body.
pub fn apply_force(body: Option<&mut ExternalImpulse>, force: f32, direction: Vec2) {
    if let Some(body) = body {
        body.impulse += knockback_impulse(force, direction);
    }
}

/// Emit [`ActorDied`] and despawn the entity.
pub fn kill_actor(
    commands: &mut Commands,
    died: &mut MessageWriter<ActorDied>,
    entity: Entity,
    killer: Option<Entity>,
) {
    info!("[actor] {:?} died (killer: {:?})", entity, killer);
    died.write(ActorDied { entity, killer });
    commands.entity(entity).despawn();
}

// ── Systems ────────────────────────────────────────────────────────────────────

/// Fixed-step velocity drag for [`Drag`] bodies.
pub fn drag_system(mut q: Query<(&Drag, &mut Velocity)>, time: Res<Time>) {
    let dt = time.delta_secs();
    for (drag, mut velocity) in q.iter_mut() {
        let bleed = velocity.linvel * drag.coefficient * dt;
        velocity.linvel -= bleed;
    }
}

/// Apply pending [`HealRequest`]s.  Requests for missing entities are dropped.
pub fn apply_heal_requests_system(
    mut requests: MessageReader<HealRequest>,
    mut q: Query<&mut Actor>,
) {
    for request in requests.read() {
        if let Ok(mut actor) = q.get_mut(request.target) {
            actor.heal(request.amount);
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
