//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::color::Color;
use orrery::catalog::CatalogEntry;
use orrery::ephemeris::OrbitalElements;
use orrery::propagation::{BodyKind, PropagationLoop, SessionConfig};
use orrery::surface::FrameBuffer;
use orrery::time::ManualClock;
use orrery::types::{J2000_JD, MU_SUN};

/// A session at J2000 driven by a hand-advanced wall clock.
pub fn session_at_j2000(trail_history: usize) -> (PropagationLoop<FrameBuffer>, ManualClock) {
    let wall = ManualClock::new(0.0);
    let config = SessionConfig::default()
        .at_julian_date(J2000_JD)
        .with_trail_history(trail_history);
    (
        PropagationLoop::new(&config, FrameBuffer::default(), wall.clone()),
        wall,
    )
}

/// Catalog entry with a neutral color.
pub fn entry(name: &str, kind: BodyKind, elements: OrbitalElements) -> CatalogEntry {
    CatalogEntry::new(name, kind, Color::WHITE, elements)
}

/// Elliptic elements spread over a range of shapes and orientations.
pub fn elliptic_swarm(count: usize) -> Vec<OrbitalElements> {
    (0..count)
        .map(|n| {
            let f = n as f64 / count as f64;
            OrbitalElements::elliptic(0.4 + 4.0 * f, 0.01 + 0.9 * f, J2000_JD, 6.0 * f)
                .with_orientation(0.5 * f, 1.3 * f, 2.7 * f)
        })
        .collect()
}

/// Specific orbital energy v²/2 − μ/r in AU²/day².
pub fn orbital_energy(position: bevy::math::DVec3, velocity: bevy::math::DVec3) -> f64 {
    0.5 * velocity.length_squared() - MU_SUN / position.length()
}
