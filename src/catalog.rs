//! Element sources: where tracked bodies and their orbital elements come from.
//!
//! The built-in catalog carries the planets out to Jupiter plus a handful of
//! small bodies covering every conic regime. Elements are heliocentric
//! ecliptic J2000; planets use the published mean elements at J2000.

use std::collections::VecDeque;

use bevy::color::Color;

use crate::ephemeris::OrbitalElements;
use crate::propagation::BodyKind;
use crate::types::J2000_JD;

/// One catalog record ready to be tracked.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: BodyKind,
    /// Marker and trail color.
    pub color: Color,
    pub elements: OrbitalElements,
}

impl CatalogEntry {
    pub fn new(
        name: impl Into<String>,
        kind: BodyKind,
        color: Color,
        elements: OrbitalElements,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            color,
            elements,
        }
    }
}

/// Supplier of orbital elements for the propagation loop.
///
/// Polled once per frame; returns only entries not yet handed out.
pub trait ElementSource: Send + Sync {
    fn poll(&mut self) -> Vec<CatalogEntry>;
}

/// In-memory catalog that releases its entries over successive polls.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    pending: VecDeque<CatalogEntry>,
    /// Entries released per poll; 0 releases everything at once
    batch_size: usize,
}

impl StaticCatalog {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            pending: entries.into_iter().collect(),
            batch_size: 0,
        }
    }

    /// The built-in set of planets, asteroids and comets.
    pub fn builtin() -> Self {
        Self::new(builtin_entries())
    }

    /// Release at most `batch_size` entries per poll.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Entries not yet released.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl ElementSource for StaticCatalog {
    fn poll(&mut self) -> Vec<CatalogEntry> {
        let take = match self.batch_size {
            0 => self.pending.len(),
            n => n.min(self.pending.len()),
        };
        self.pending.drain(..take).collect()
    }
}

/// Name of the fixed reference body.
pub const REFERENCE_BODY: &str = "Earth";

fn planet(
    name: &str,
    color: Color,
    // a [AU], e, i [deg], L [deg], long. perihelion [deg], long. node [deg]
    (a, e, i, l, varpi, node): (f64, f64, f64, f64, f64, f64),
) -> CatalogEntry {
    CatalogEntry::new(
        name,
        BodyKind::Planet,
        color,
        OrbitalElements::from_planetary_longitudes_deg(a, e, i, l, varpi, node, J2000_JD),
    )
}

/// Built-in catalog contents, reference body included.
pub fn builtin_entries() -> Vec<CatalogEntry> {
    // Halley's elements are published as (q, e, Tp); ellipse phase starts at perihelion
    let halley_q = 0.58597811;
    let halley_e = 0.96714291;
    let halley_tp = 2446467.395;

    vec![
        planet(
            "Mercury",
            Color::srgb(0.6, 0.6, 0.6),
            (0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593),
        ),
        planet(
            "Venus",
            Color::srgb(0.9, 0.85, 0.7),
            (0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255),
        ),
        planet(
            REFERENCE_BODY,
            Color::srgb(0.2, 0.5, 0.8),
            (1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0),
        ),
        planet(
            "Mars",
            Color::srgb(0.8, 0.4, 0.2),
            (1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891),
        ),
        planet(
            "Jupiter",
            Color::srgb(0.8, 0.7, 0.6),
            (5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909),
        ),
        CatalogEntry::new(
            "1 Ceres",
            BodyKind::Asteroid,
            Color::srgb(0.55, 0.5, 0.45),
            OrbitalElements::elliptic(2.7691652, 0.0760090, 2459600.5, 77.37210_f64.to_radians())
                .with_orientation_deg(10.59407, 80.30553, 73.59769),
        ),
        CatalogEntry::new(
            "1P/Halley",
            BodyKind::Comet,
            Color::srgb(0.7, 0.9, 1.0),
            OrbitalElements::elliptic(halley_q / (1.0 - halley_e), halley_e, halley_tp, 0.0)
                .with_orientation_deg(162.26269, 58.42008, 111.33249),
        ),
        CatalogEntry::new(
            "1I/'Oumuamua",
            BodyKind::Asteroid,
            Color::srgb(0.85, 0.45, 0.35),
            OrbitalElements::hyperbolic_from_perihelion(0.255912, 1.20113, 2458006.007)
                .with_orientation_deg(122.7417, 24.5969, 241.8105),
        ),
        CatalogEntry::new(
            "C/2012 S1 (ISON)",
            BodyKind::Comet,
            Color::srgb(0.6, 1.0, 0.8),
            OrbitalElements::parabolic(0.012444, 2456625.26)
                .with_orientation_deg(62.4, 295.65, 345.56),
        ),
    ]
}
