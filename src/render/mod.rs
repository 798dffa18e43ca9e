//! Rendering of the propagation session.
//!
//! Bodies are drawn as unlit markers whose transforms follow the session's
//! frame buffer; trails are drawn with gizmos.

pub mod bodies;
mod sync;
pub mod trails;

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::camera::RENDER_SCALE;
use crate::session::SessionTickSet;

use self::bodies::{CelestialBodyPlugin, despawn_removed_bodies, spawn_added_bodies};
use self::sync::sync_body_positions;
use self::trails::{TrailPlugin, draw_trails};

pub use self::bodies::BodyMarker;
pub use self::trails::TrailSettings;

/// Plugin aggregating all rendering functionality.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((CelestialBodyPlugin, TrailPlugin)).add_systems(
            Update,
            (
                (spawn_added_bodies, despawn_removed_bodies),
                sync_body_positions,
                draw_trails,
            )
                .chain()
                .after(SessionTickSet),
        );
    }
}

/// Heliocentric AU to render units.
pub fn to_render(position: DVec3) -> Vec3 {
    (position * RENDER_SCALE).as_vec3()
}
