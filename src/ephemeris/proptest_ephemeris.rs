//! Property-based tests for the propagation kernel using proptest.
//!
//! These tests verify that the root-finders and the conic propagation keep
//! their invariants across a wide range of inputs.

use proptest::prelude::*;
use std::f64::consts::TAU;

use super::conic::{propagate, propagate_detailed};
use super::elements::OrbitalElements;
use super::kepler::{solve_barker, solve_elliptic, solve_hyperbolic};
use crate::types::{J2000_JD, MU_SUN};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    /// Kepler's equation holds after solving for any M in [0, 2π) and e in (0, 0.99).
    #[test]
    fn prop_elliptic_solver_residual(
        mean_anomaly in 0.0f64..TAU,
        eccentricity in 1e-6f64..0.99,
    ) {
        let out = solve_elliptic(mean_anomaly, eccentricity);
        let residual = (out.value - eccentricity * out.value.sin() - mean_anomaly).abs();
        prop_assert!(
            residual < 1e-10,
            "Kepler solver failed: M={}, e={}, E={}, residual={}",
            mean_anomaly, eccentricity, out.value, residual
        );
        prop_assert!(out.converged);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    /// Barker's equation holds after solving.
    #[test]
    fn prop_barker_solver_residual(
        days_from_perihelion in -20_000.0f64..20_000.0,
        q in 0.01f64..5.0,
    ) {
        let b = days_from_perihelion * (MU_SUN / (q * q * q)).sqrt();
        let out = solve_barker(b);
        let d = out.value;
        let residual = (d + d * d * d / 3.0 - b).abs();
        prop_assert!(
            residual < 1e-9,
            "Barker solver failed: B={}, D={}, residual={}",
            b, d, residual
        );
    }

    /// The hyperbolic Kepler equation holds after solving.
    #[test]
    fn prop_hyperbolic_solver_residual(
        mean_anomaly in -1.0e4f64..1.0e4,
        eccentricity in 1.001f64..10.0,
    ) {
        let out = solve_hyperbolic(mean_anomaly, eccentricity);
        let h = out.value;
        let residual = (eccentricity * h.sinh() - h - mean_anomaly).abs();
        prop_assert!(
            residual < 1e-9,
            "Hyperbolic solver failed: M={}, e={}, H={}, residual={}",
            mean_anomaly, eccentricity, h, residual
        );
    }

    /// Elliptic propagation is finite for any finite epoch.
    #[test]
    fn prop_elliptic_state_is_finite(
        a in 0.1f64..100.0,
        e in 1e-6f64..0.999,
        m0 in 0.0f64..TAU,
        i in 0.0f64..3.14,
        node in 0.0f64..TAU,
        peri in 0.0f64..TAU,
        days in -1.0e6f64..1.0e6,
    ) {
        let el = OrbitalElements::elliptic(a, e, J2000_JD, m0).with_orientation(i, node, peri);
        let state = propagate(&el, J2000_JD + days);
        prop_assert!(state.is_ok(), "propagation failed: {:?}", state);
        let state = state.unwrap();
        prop_assert!(state.position.is_finite());
        prop_assert!(state.velocity.is_finite());
    }

    /// |r| stays within [a(1−e), a(1+e)] at every epoch.
    #[test]
    fn prop_radius_within_apsides(
        a in 0.3f64..50.0,
        e in 1e-6f64..0.95,
        m0 in 0.0f64..TAU,
        days in -36_500.0f64..36_500.0,
    ) {
        let el = OrbitalElements::elliptic(a, e, J2000_JD, m0).with_orientation(0.3, 1.0, 2.0);
        let state = propagate(&el, J2000_JD + days).unwrap();
        let r = state.radius();
        let slack = 1e-9 * a;
        prop_assert!(r >= a * (1.0 - e) - slack, "r={} below perihelion", r);
        prop_assert!(r <= a * (1.0 + e) + slack, "r={} above aphelion", r);
    }

    /// Speed obeys vis-viva in every regime.
    #[test]
    fn prop_vis_viva_all_regimes(
        q in 0.1f64..5.0,
        e in prop_oneof![0.01f64..0.9, Just(1.0), 1.01f64..5.0],
        days in -2_000.0f64..2_000.0,
    ) {
        let el = if e < 1.0 {
            OrbitalElements::elliptic(q / (1.0 - e), e, J2000_JD, 0.0)
        } else if e == 1.0 {
            OrbitalElements::parabolic(q, J2000_JD)
        } else {
            OrbitalElements::hyperbolic_from_perihelion(q, e, J2000_JD)
        };
        let p = propagate_detailed(&el, J2000_JD + days).unwrap();

        // 1/a is positive for ellipses, zero for parabolas, negative for hyperbolas
        let inv_a = (1.0 - e) / q;
        let r = p.state.radius();
        let expected = MU_SUN * (2.0 / r - inv_a);
        let actual = p.state.velocity.length_squared();
        prop_assert!(
            (actual - expected).abs() <= 1e-9 * expected,
            "vis-viva mismatch: e={}, v²={}, expected {}",
            e, actual, expected
        );
    }

    /// Position returns to start after one period.
    #[test]
    fn prop_position_periodic(
        a in 0.3f64..30.0,
        e in 0.01f64..0.8,
        start_days in 0.0f64..3650.0,
    ) {
        let el = OrbitalElements::elliptic(a, e, J2000_JD, 0.7).with_orientation(0.1, 0.2, 0.3);
        let period = el.period_days().unwrap();
        let p1 = propagate(&el, J2000_JD + start_days).unwrap().position;
        let p2 = propagate(&el, J2000_JD + start_days + period).unwrap().position;
        prop_assert!(
            (p2 - p1).length() < 1e-8 * a,
            "Position not periodic: {:?} vs {:?}",
            p1, p2
        );
    }
}
