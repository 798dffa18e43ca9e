//! Trail rendering using Bevy Gizmos.
//!
//! Every body gets its two-point motion streak. When the session keeps a
//! position history, the recent path is drawn as a faint polyline as well.

use bevy::prelude::*;

use crate::render::to_render;
use crate::session::Session;

/// Plugin providing trail settings.
pub struct TrailPlugin;

impl Plugin for TrailPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrailSettings>();
    }
}

/// Settings for trail rendering.
#[derive(Resource)]
pub struct TrailSettings {
    /// Whether to draw trails at all.
    pub visible: bool,
    /// Alpha of the history polyline.
    pub history_alpha: f32,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            visible: true,
            history_alpha: 0.35,
        }
    }
}

/// Draw trail streaks and, when enabled, path histories.
pub fn draw_trails(mut gizmos: Gizmos, settings: Res<TrailSettings>, session: Res<Session>) {
    if !settings.visible {
        return;
    }

    for body in session.registry().iter() {
        if body.is_excluded() {
            continue;
        }
        let color = body.color();

        if let Some(history) = body.history().filter(|h| h.len() >= 2) {
            gizmos.linestrip(
                history.iter().map(to_render),
                color.with_alpha(settings.history_alpha),
            );
        }

        if let Some((previous, current)) = body.trail().segment() {
            gizmos.line(to_render(previous), to_render(current), color);
        }
    }
}
