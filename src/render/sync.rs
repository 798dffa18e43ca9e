//! Position synchronization between the session and rendering.

use bevy::prelude::*;

use crate::render::bodies::BodyMarker;
use crate::render::to_render;
use crate::session::Session;

/// Move each marker to its body's latest propagated position.
///
/// Bodies excluded from the last frame, or never propagated, are hidden.
pub fn sync_body_positions(
    mut query: Query<(&mut Transform, &mut Visibility, &BodyMarker)>,
    session: Res<Session>,
) {
    for (mut transform, mut visibility, marker) in query.iter_mut() {
        let excluded = session
            .registry()
            .get(marker.id)
            .is_none_or(|body| body.is_excluded());

        match session.surface().frame(marker.id) {
            Some(frame) if !excluded => {
                transform.translation = to_render(frame.position);
                *visibility = Visibility::Inherited;
            }
            _ => *visibility = Visibility::Hidden,
        }
    }
}
