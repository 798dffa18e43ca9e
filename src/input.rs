//! Keyboard shortcuts for simulation time and trail display.
//!
//! - Space: pause / resume
//! - `[` / `]`: halve / double the rate
//! - `1`-`4`: rate presets (hour, day, week, month per second)
//! - `R`: reverse the direction of time
//! - `T`: toggle trails

use bevy::prelude::*;

use crate::render::TrailSettings;
use crate::session::{Session, SessionTickSet};
use crate::time::{RATE_PRESETS, SimulationClock};
use crate::types::SECONDS_PER_DAY;

/// Slowest rate reachable with `[`: one simulated minute per second.
pub const MIN_RATE_MAGNITUDE: f64 = 60.0;

/// Fastest rate reachable with `]`: one simulated year per second.
pub const MAX_RATE_MAGNITUDE: f64 = 365.25 * SECONDS_PER_DAY;

/// Plugin providing keyboard input handling.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, keyboard_shortcuts.before(SessionTickSet));
    }
}

/// Scale the rate magnitude by `factor`, keeping its sign and clamping.
pub fn step_rate(rate_scale: f64, factor: f64) -> f64 {
    let sign = if rate_scale < 0.0 { -1.0 } else { 1.0 };
    let magnitude = (rate_scale.abs() * factor).clamp(MIN_RATE_MAGNITUDE, MAX_RATE_MAGNITUDE);
    sign * magnitude
}

/// Preset for a digit key, keeping the current direction of time.
fn preset_rate(clock: &SimulationClock, index: usize) -> Option<f64> {
    let preset = *RATE_PRESETS.get(index)?;
    Some(if clock.rate_scale() < 0.0 { -preset } else { preset })
}

/// Handle keyboard shortcuts for simulation control.
fn keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<Session>,
    mut trails: ResMut<TrailSettings>,
) {
    let clock = session.clock_mut();

    // Space: toggle pause
    if keys.just_pressed(KeyCode::Space) {
        let paused = !clock.is_paused();
        clock.set_paused(paused);
    }

    if keys.just_pressed(KeyCode::BracketLeft) {
        clock.set_rate_scale(step_rate(clock.rate_scale(), 0.5));
    }

    if keys.just_pressed(KeyCode::BracketRight) {
        clock.set_rate_scale(step_rate(clock.rate_scale(), 2.0));
    }

    if keys.just_pressed(KeyCode::KeyR) {
        clock.set_rate_scale(-clock.rate_scale());
    }

    // Quick rate selection with number keys
    let digits = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];
    for (index, key) in digits.into_iter().enumerate() {
        if !keys.just_pressed(key) {
            continue;
        }
        if let Some(rate) = preset_rate(clock, index) {
            clock.set_rate_scale(rate);
        }
    }

    if keys.just_pressed(KeyCode::KeyT) {
        trails.visible = !trails.visible;
        info!("Trails {}", if trails.visible { "shown" } else { "hidden" });
    }
}
