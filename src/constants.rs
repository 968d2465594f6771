//! Centralised movement, combat and world constants.
//!
//! These are the compiled defaults behind [`crate::config::CombatConfig`].
//! Every value can be overridden from `assets/combat.toml` without
//! recompiling; keep the two in sync when adding a field.

// ── World Bounds ──────────────────────────────────────────────────────────────

/// Width of the playable rectangle centred on the bounds owner (world units).
pub const WORLD_BOUNDS_WIDTH: f32 = 10.0;

/// Height of the playable rectangle centred on the bounds owner (world units).
pub const WORLD_BOUNDS_HEIGHT: f32 = 10.0;

/// World gravity handed to Rapier.  Only bodies with a non-zero
/// `GravityScale` (arcing projectiles) feel it; actors spawn with scale 0.
pub const WORLD_GRAVITY_X: f32 = 0.0;
pub const WORLD_GRAVITY_Y: f32 = -9.81;

/// Fixed simulation rate for `FixedUpdate` (Hz).
pub const FIXED_HZ: f64 = 50.0;

// ── Player: Movement ──────────────────────────────────────────────────────────

/// Per-axis top speed (u/s).  Target velocity is `intent * PLAYER_MOVE_SPEED`
/// component-wise, so a diagonal intent is not slower on either axis.
pub const PLAYER_MOVE_SPEED_X: f32 = 5.0;
pub const PLAYER_MOVE_SPEED_Y: f32 = 5.0;

/// Acceleration vector; only its magnitude is used as the approach rate (u/s²).
pub const PLAYER_ACCELERATION_X: f32 = 5.0;
pub const PLAYER_ACCELERATION_Y: f32 = 5.0;

/// Deceleration vector; only its magnitude is used (u/s²).
pub const PLAYER_DECELERATION_X: f32 = 5.0;
pub const PLAYER_DECELERATION_Y: f32 = 5.0;

// ── Player: Tilt (cosmetic) ───────────────────────────────────────────────────

/// Tilt approach speed around the visual X axis (degrees/s).
pub const TILT_X_SPEED: f32 = 35.0;
/// Maximum tilt around X reached at full horizontal intent (degrees).
pub const TILT_X_MAX: f32 = 10.0;
/// Tilt approach speed around the visual Z axis (degrees/s).
pub const TILT_Z_SPEED: f32 = 35.0;
/// Maximum tilt around Z reached at full vertical intent (degrees).
pub const TILT_Z_MAX: f32 = 10.0;

// ── Actors ────────────────────────────────────────────────────────────────────

pub const PLAYER_BASE_HEALTH: f32 = 100.0;

/// Flat damage added to every projectile the player fires.
pub const PLAYER_BASE_DAMAGE: f32 = 0.0;

/// Muzzle offset from the player's origin; projectiles spawn here.
pub const PLAYER_MUZZLE_OFFSET_X: f32 = 0.5;
pub const PLAYER_MUZZLE_OFFSET_Y: f32 = 0.0;

pub const PLAYER_COLLIDER_RADIUS: f32 = 0.4;

pub const DUMMY_BASE_HEALTH: f32 = 100.0;

/// Velocity bleed rate for training dummies (1/s).  At 5.0 a knocked-back
/// dummy loses ~10% of its speed per 50 Hz step.
pub const DUMMY_DRAG: f32 = 5.0;

pub const DUMMY_COLLIDER_RADIUS: f32 = 0.5;

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Seconds a projectile flies before expiring without a hit.
pub const PROJECTILE_LIFETIME: f32 = 5.0;

pub const PROJECTILE_COLLIDER_RADIUS: f32 = 0.1;

// ── Weapon defaults ───────────────────────────────────────────────────────────

pub const WEAPON_DAMAGE: f32 = 5.0;
pub const WEAPON_PROJECTILE_FORCE: f32 = 5.0;
pub const WEAPON_PROJECTILE_SPEED: f32 = 5.0;
pub const WEAPON_PROJECTILE_GRAVITY: f32 = 0.0;

/// Minimum interval between shots for `FireRate` weapons (seconds).
pub const WEAPON_FIRE_RATE: f32 = 0.5;

/// Hold time required before release fires a `Charge` weapon (seconds).
pub const WEAPON_CHARGE_TIME: f32 = 1.0;
