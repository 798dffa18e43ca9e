//! Orrery - Heliocentric Conic Orbit Propagation
//!
//! A desktop viewer propagating the built-in catalog of planets, asteroids
//! and comets from the current date.

use bevy::prelude::*;

use orrery::camera::CameraPlugin;
use orrery::catalog::StaticCatalog;
use orrery::input::InputPlugin;
use orrery::propagation::SessionConfig;
use orrery::render::RenderPlugin;
use orrery::session::{Session, SessionPlugin};

/// Positions kept per body for the path polyline.
const TRAIL_HISTORY: usize = 256;

/// Catalog entries released per frame.
const CATALOG_BATCH: usize = 3;

fn main() {
    let config = SessionConfig::default().with_trail_history(TRAIL_HISTORY);
    let session = Session::new(&config)
        .with_source(StaticCatalog::builtin().with_batch_size(CATALOG_BATCH));

    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(ClearColor(Color::srgb(0.01, 0.01, 0.03)))
        // Insert the session before plugins that depend on it
        .insert_resource(session)
        .add_plugins((SessionPlugin, CameraPlugin, InputPlugin, RenderPlugin))
        .run();
}
