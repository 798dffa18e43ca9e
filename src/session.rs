//! Bevy host for a propagation session.
//!
//! The session resource owns the whole propagation loop; the plugin steps it
//! by Bevy's frame delta and forwards window focus changes to its clock.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::catalog::ElementSource;
use crate::propagation::{FrameReport, PropagationLoop, SessionConfig};
use crate::surface::FrameBuffer;
use crate::time::HostVisibility;

/// The running session, rendered through an in-memory [`FrameBuffer`].
#[derive(Resource, Deref, DerefMut)]
pub struct Session(pub PropagationLoop<FrameBuffer>);

impl Session {
    /// A session advanced by the frame delta of Bevy's [`Time`].
    pub fn new(config: &SessionConfig) -> Self {
        Self(PropagationLoop::host_driven(config, FrameBuffer::default()))
    }

    pub fn with_source(self, source: impl ElementSource + 'static) -> Self {
        Self(self.0.with_source(source))
    }
}

/// Report of the most recent frame.
#[derive(Resource, Default, Debug)]
pub struct LastFrame(pub FrameReport);

/// System set label for the per-frame session tick. Render sync runs after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionTickSet;

/// Plugin driving the [`Session`] resource, which must be inserted beforehand.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastFrame>().add_systems(
            Update,
            (forward_host_focus, tick_session)
                .chain()
                .in_set(SessionTickSet),
        );
    }
}

/// Advance the clock by the virtual frame delta and propagate every body.
///
/// `Time<Virtual>` clamps the delta to its `max_delta`, so a stalled frame
/// cannot leap the simulation forward.
pub fn tick_session(time: Res<Time>, mut session: ResMut<Session>, mut last: ResMut<LastFrame>) {
    last.0 = session.step(time.delta_secs_f64());
}

/// Forward primary-window focus transitions to the simulation clock.
///
/// Only changes are forwarded; a window that starts focused sends nothing.
pub fn forward_host_focus(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut session: ResMut<Session>,
    mut was_focused: Local<Option<bool>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let focused = window.focused;
    let previous = was_focused.replace(focused);
    if previous == Some(focused) || (previous.is_none() && focused) {
        return;
    }

    let visibility = if focused {
        HostVisibility::Visible
    } else {
        HostVisibility::Hidden
    };
    session.clock_mut().on_host_visibility(visibility);
}
