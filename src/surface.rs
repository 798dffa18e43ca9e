//! Render surface seam between the propagation loop and whatever draws it.

use std::collections::HashMap;

use bevy::math::DVec3;

use crate::propagation::{Body, BodyId};
use crate::trail::TrailBuffer;

/// Receives per-frame output of the propagation loop.
///
/// The loop issues position and trail writes; it owns no graphics state.
pub trait RenderSurface {
    /// A body joined the registry.
    fn body_added(&mut self, _body: &Body) {}

    fn update_position(&mut self, id: BodyId, position: DVec3);

    fn update_trail(&mut self, id: BodyId, trail: &TrailBuffer);

    /// A body left the registry.
    fn body_removed(&mut self, _id: BodyId) {}
}

/// Latest render state of one body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyFrame {
    /// Heliocentric position in AU
    pub position: DVec3,
    /// `(previous, current)` trail endpoints
    pub trail: Option<(DVec3, DVec3)>,
}

/// In-memory surface: keeps the latest frame per body and queues of
/// added/removed bodies for the host to drain.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    frames: HashMap<BodyId, BodyFrame>,
    added: Vec<BodyId>,
    removed: Vec<BodyId>,
    writes: usize,
}

impl FrameBuffer {
    pub fn frame(&self, id: BodyId) -> Option<&BodyFrame> {
        self.frames.get(&id)
    }

    /// Total position writes received.
    pub fn position_writes(&self) -> usize {
        self.writes
    }

    /// Bodies added since the last drain.
    pub fn drain_added(&mut self) -> Vec<BodyId> {
        std::mem::take(&mut self.added)
    }

    /// Bodies removed since the last drain.
    pub fn drain_removed(&mut self) -> Vec<BodyId> {
        std::mem::take(&mut self.removed)
    }
}

impl RenderSurface for FrameBuffer {
    fn body_added(&mut self, body: &Body) {
        self.added.push(body.id());
    }

    fn update_position(&mut self, id: BodyId, position: DVec3) {
        self.frames.entry(id).or_default().position = position;
        self.writes += 1;
    }

    fn update_trail(&mut self, id: BodyId, trail: &TrailBuffer) {
        self.frames.entry(id).or_default().trail = trail.segment();
    }

    fn body_removed(&mut self, id: BodyId) {
        self.frames.remove(&id);
        self.added.retain(|&pending| pending != id);
        self.removed.push(id);
    }
}
