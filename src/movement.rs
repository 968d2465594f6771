//! Intent-driven movement with acceleration, deceleration and world bounds.
//!
//! ## Per fixed step
//!
//! 1. Target velocity is `intent * move_speed` (component-wise); target tilt
//!    is `intent.x * tilt_x_max` / `intent.y * tilt_z_max`.
//! 2. With intent, velocity approaches the target at `|acceleration|` u/s²
//!    and tilt approaches its target at the tilt speeds.
//! 3. Without intent, velocity approaches zero at `|deceleration|` and tilt
//!    relaxes to the rest angles.
//! 4. With active bounds, the next position is clamped into the rectangle and
//!    the velocity is re-derived from the clamped step.  The body can never
//!    cross a wall within one step, at the cost of a dead stop (no bounce) on
//!    the wall-normal axis.
//! 5. Velocity goes to Rapier's `Velocity::linvel`; tilt goes to the
//!    [`TiltVisual`] entity's rotation.

use crate::bounds::{BoundsRect, WorldBounds};
use crate::config::CombatConfig;
use crate::intent::ControlIntent;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// Movement tuning for one entity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MovementController {
    /// Per-axis top speed.
    pub move_speed: Vec2,
    /// Only the magnitude is used as the approach rate while moving.
    pub acceleration: Vec2,
    /// Only the magnitude is used as the approach rate while stopping.
    pub deceleration: Vec2,
    /// Degrees per second.
    pub tilt_x_speed: f32,
    /// Degrees at full horizontal intent.
    pub tilt_x_max: f32,
    pub tilt_z_speed: f32,
    pub tilt_z_max: f32,
}

impl MovementController {
    pub fn from_config(config: &CombatConfig) -> Self {
        Self {
            move_speed: Vec2::new(config.player_move_speed_x, config.player_move_speed_y),
            acceleration: Vec2::new(config.player_acceleration_x, config.player_acceleration_y),
            deceleration: Vec2::new(config.player_deceleration_x, config.player_deceleration_y),
            tilt_x_speed: config.tilt_x_speed,
            tilt_x_max: config.tilt_x_max,
            tilt_z_speed: config.tilt_z_speed,
            tilt_z_max: config.tilt_z_max,
        }
    }

    /// Advance `state` by one step of `dt` seconds and return the velocity to
    /// commit to the body.
    pub fn step(
        &self,
        state: &mut MovementState,
        intent: Vec2,
        position: Vec2,
        dt: f32,
        bounds: Option<BoundsRect>,
    ) -> Vec2 {
        state.intent = intent;

        let target_velocity = intent * self.move_speed;
        let target_tilt_x = intent.x * self.tilt_x_max;
        let target_tilt_z = intent.y * self.tilt_z_max;

        let tilt_x_delta = self.tilt_x_speed * dt;
        let tilt_z_delta = self.tilt_z_speed * dt;

        if intent != Vec2::ZERO {
            state.velocity = move_towards_vec2(
                state.velocity,
                target_velocity,
                self.acceleration.length() * dt,
            );
            state.tilt_x = move_towards(state.tilt_x, target_tilt_x, tilt_x_delta);
            state.tilt_z = move_towards(state.tilt_z, target_tilt_z, tilt_z_delta);
        } else {
            state.velocity =
                move_towards_vec2(state.velocity, Vec2::ZERO, self.deceleration.length() * dt);
            state.tilt_x = move_towards(state.tilt_x, state.rest_tilt_x, tilt_x_delta);
            state.tilt_z = move_towards(state.tilt_z, state.rest_tilt_z, tilt_z_delta);
        }

        // The back-derivation divides by dt; a zero step has nothing to clamp.
        if let Some(rect) = bounds {
            if dt > 0.0 {
                let next = rect.clamp(position + state.velocity * dt);
                state.velocity = (next - position) / dt;
            }
        }

        state.velocity
    }
}

/// Mutable movement state, advanced once per fixed step.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementState {
    pub velocity: Vec2,
    /// Intent seen by the last step.
    pub intent: Vec2,
    /// Current tilt in degrees (cosmetic).
    pub tilt_x: f32,
    pub tilt_z: f32,
    /// Angles the tilt relaxes to when there is no intent.
    pub rest_tilt_x: f32,
    pub rest_tilt_z: f32,
}

impl MovementState {
    pub fn with_rest_tilt(rest_tilt_x: f32, rest_tilt_z: f32) -> Self {
        Self {
            tilt_x: rest_tilt_x,
            tilt_z: rest_tilt_z,
            rest_tilt_x,
            rest_tilt_z,
            ..Default::default()
        }
    }

    pub fn tilt_rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.tilt_x.to_radians(),
            0.0,
            self.tilt_z.to_radians(),
        )
    }
}

/// Points at the visual-only entity that receives the tilt rotation.
#[derive(Component, Debug, Clone, Copy)]
pub struct TiltVisual(pub Entity);

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Vector form of [`move_towards`]: straight-line approach, clamped length.
pub fn move_towards_vec2(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let to_target = target - current;
    let dist = to_target.length();
    if dist <= max_delta || dist == 0.0 {
        target
    } else {
        current + to_target / dist * max_delta
    }
}

// ── Systems ────────────────────────────────────────────────────────────────────

/// Fixed-step movement for every entity with a [`MovementController`].
pub fn movement_system(
    mut q: Query<(
        &MovementController,
        &mut MovementState,
        &ControlIntent,
        &Transform,
        &mut Velocity,
    )>,
    bounds: WorldBounds,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    let rect = bounds.rect();

    for (controller, mut state, intent, transform, mut velocity) in q.iter_mut() {
        let position = transform.translation.truncate();
        velocity.linvel = controller.step(&mut state, intent.movement, position, dt, rect);
    }
}

/// Copy each mover's tilt onto its [`TiltVisual`] entity.
pub fn apply_tilt_system(
    movers: Query<(&MovementState, &TiltVisual)>,
    mut visuals: Query<&mut Transform>,
) {
    for (state, visual) in movers.iter() {
        if let Ok(mut transform) = visuals.get_mut(visual.0) {
            transform.rotation = state.tilt_rotation();
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
