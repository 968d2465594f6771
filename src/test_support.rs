//! Shared helpers for headless system tests.

use crate::constants::FIXED_HZ;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

/// Wall-clock advance per `app.update()`; equal to one fixed step.
pub const FRAME: Duration = Duration::from_millis(20);

/// `MinimalPlugins` app where every update after the first advances time by
/// exactly [`FRAME`], so `FixedUpdate` runs once per update.
pub fn fixed_step_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app.insert_resource(Time::<Fixed>::from_hz(FIXED_HZ));
    app
}

pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}
