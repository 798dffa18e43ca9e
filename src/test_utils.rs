//! Test utilities for propagation tests.
//!
//! Provides element fixtures for each conic regime and catalog entries built
//! from them.

use bevy::color::Color;

use crate::catalog::CatalogEntry;
use crate::ephemeris::OrbitalElements;
use crate::propagation::BodyKind;
use crate::types::J2000_JD;

/// Fixtures for creating test orbital elements.
pub mod fixtures {
    use super::*;

    /// Wrap elements in a catalog entry.
    pub fn entry(name: &str, elements: OrbitalElements) -> CatalogEntry {
        CatalogEntry::new(name, BodyKind::Asteroid, Color::WHITE, elements)
    }

    /// Near-circular 1 AU orbit, slightly inclined.
    pub fn earth_like() -> OrbitalElements {
        OrbitalElements::elliptic(1.0, 0.0167, J2000_JD, 0.0).with_orientation(0.01, 0.3, 1.8)
    }

    /// a = 1, e = 0.3 in the ecliptic, at perihelion on J2000.
    pub fn eccentric_ellipse() -> OrbitalElements {
        OrbitalElements::elliptic(1.0, 0.3, J2000_JD, 0.0)
    }

    /// Exactly circular; rejected as malformed.
    pub fn circular() -> OrbitalElements {
        OrbitalElements::elliptic(1.0, 0.0, J2000_JD, 0.0)
    }

    /// Hyperbolic flyby through perihelion on J2000.
    pub fn flyby() -> OrbitalElements {
        OrbitalElements::hyperbolic_from_perihelion(0.5, 1.5, J2000_JD)
    }

    /// Parabolic comet through perihelion on J2000.
    pub fn sungrazer() -> OrbitalElements {
        OrbitalElements::parabolic(0.05, J2000_JD).with_orientation(1.0, 0.5, 0.25)
    }
}
