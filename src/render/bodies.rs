//! Body marker spawning and despawning.
//!
//! Markers are created for bodies the session reports as added and removed
//! again when the session drops them.

use bevy::prelude::*;

use crate::propagation::{BodyId, BodyKind};
use crate::session::Session;

/// Component marking the render entity of a tracked body.
#[derive(Component, Debug)]
pub struct BodyMarker {
    pub id: BodyId,
}

/// Component marking the Sun at the origin.
#[derive(Component)]
pub struct SunMarker;

/// Plugin providing the static Sun marker.
pub struct CelestialBodyPlugin;

impl Plugin for CelestialBodyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_sun);
    }
}

/// Marker radius in render units; not to physical scale.
fn marker_radius(kind: BodyKind) -> f32 {
    match kind {
        BodyKind::Planet => 2.0,
        BodyKind::Asteroid => 1.0,
        BodyKind::Comet => 1.2,
    }
}

fn spawn_sun(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(4.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.95, 0.4),
            unlit: true,
            ..default()
        })),
        Transform::default(),
        SunMarker,
    ));
}

/// Spawn markers for bodies added to the session since last frame.
pub fn spawn_added_bodies(
    mut commands: Commands,
    mut session: ResMut<Session>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let added = session.surface_mut().drain_added();
    if added.is_empty() {
        return;
    }

    for id in &added {
        let Some(body) = session.registry().get(*id) else {
            continue;
        };

        commands.spawn((
            Mesh3d(meshes.add(Sphere::new(marker_radius(body.kind())))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: body.color(),
                unlit: true,
                ..default()
            })),
            Transform::default(),
            // Hidden until the first position arrives
            Visibility::Hidden,
            BodyMarker { id: *id },
            Name::new(body.name().to_string()),
        ));
    }

    info!("Spawned {} body markers", added.len());
}

/// Despawn markers of bodies the session no longer tracks.
pub fn despawn_removed_bodies(
    mut commands: Commands,
    mut session: ResMut<Session>,
    markers: Query<(Entity, &BodyMarker)>,
) {
    let removed = session.surface_mut().drain_removed();
    if removed.is_empty() {
        return;
    }

    for (entity, marker) in &markers {
        if removed.contains(&marker.id) {
            commands.entity(entity).despawn();
        }
    }
}
