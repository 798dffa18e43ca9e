//! Orrery - Heliocentric Conic Orbit Propagation
//!
//! A library crate providing a two-body propagation kernel, a scaled
//! simulation clock and a per-frame propagation loop, plus the Bevy host
//! systems that render a session.

pub mod camera;
pub mod catalog;
pub mod ephemeris;
pub mod input;
pub mod propagation;
pub mod render;
pub mod session;
pub mod surface;
pub mod time;
pub mod trail;
pub mod types;

#[cfg(test)]
pub mod test_utils;
