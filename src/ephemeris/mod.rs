//! Conic-orbit propagation kernel.
//!
//! Given classical orbital elements and a target Julian Date, computes the
//! heliocentric position and velocity of a body under two-body gravity, for
//! elliptic, parabolic and hyperbolic orbits.
//!
//! Coordinate frame:
//! - 3D heliocentric ecliptic (Sun at origin), AU and AU/day.
//! - A single gravitational parameter μ = k² applies to every body.

pub mod conic;
pub mod elements;
pub mod kepler;

#[cfg(test)]
mod proptest_ephemeris;

pub use conic::{Propagation, StateVector, perifocal_to_ecliptic, propagate, propagate_detailed};
pub use elements::{ElementsError, OrbitalElements, PARABOLIC_TOLERANCE, Regime};
pub use kepler::{SolveOutcome, solve_barker, solve_elliptic, solve_hyperbolic};
