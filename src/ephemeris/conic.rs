//! Two-body conic propagation: elements + target epoch → heliocentric state.
//!
//! Coordinate frame: heliocentric ecliptic, AU and AU/day.

use bevy::math::{DMat3, DVec3};

use super::elements::{ElementsError, OrbitalElements, Regime};
use super::kepler::{SolveOutcome, solve_barker, solve_elliptic, solve_hyperbolic};
use crate::types::MU_SUN;

/// Position (AU) and velocity (AU/day) in the ecliptic frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateVector {
    pub position: DVec3,
    pub velocity: DVec3,
}

impl StateVector {
    /// Heliocentric distance in AU.
    pub fn radius(&self) -> f64 {
        self.position.length()
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// A propagated state together with the intermediate quantities that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Propagation {
    pub state: StateVector,
    pub regime: Regime,
    /// Root-find for the regime's anomaly (eccentric, hyperbolic or parabolic).
    pub anomaly: SolveOutcome,
    /// True anomaly ν in radians.
    pub true_anomaly: f64,
    /// Heliocentric distance r in AU.
    pub radius: f64,
}

/// Position and velocity of the body at `target_jd`.
///
/// Pure function: reads only `elements`. Either returns a complete finite
/// state or an [`ElementsError`].
pub fn propagate(elements: &OrbitalElements, target_jd: f64) -> Result<StateVector, ElementsError> {
    propagate_detailed(elements, target_jd).map(|p| p.state)
}

/// Like [`propagate`], but also reports regime, anomaly solve and true anomaly.
pub fn propagate_detailed(
    elements: &OrbitalElements,
    target_jd: f64,
) -> Result<Propagation, ElementsError> {
    if !target_jd.is_finite() {
        return Err(ElementsError::NonFiniteEpoch(target_jd));
    }

    let regime = elements.regime()?;
    let e = elements.e;

    let (anomaly, true_anomaly, radius, p) = match regime {
        Regime::Elliptic => {
            let a = elements.elliptic_semi_major_axis()?;
            let (epoch, m0) = elements.epoch_phase(regime)?;

            let n = (MU_SUN / (a * a * a)).sqrt();
            let mean_anomaly = m0 + n * (target_jd - epoch);

            let anomaly = solve_elliptic(mean_anomaly, e);
            let half = 0.5 * anomaly.value;
            // atan2 keeps the full quadrant range
            let nu = 2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos());
            let r = a * (1.0 - e * anomaly.value.cos());

            (anomaly, nu, r, a * (1.0 - e * e))
        }
        Regime::Hyperbolic => {
            let a = elements.hyperbolic_semi_major_axis()?;
            let n = (MU_SUN / (a * a * a)).sqrt();
            let mean_anomaly = match elements.tp_jd {
                Some(tp) => n * (target_jd - tp),
                None => {
                    let (epoch, m0) = elements.epoch_phase(regime)?;
                    m0 + n * (target_jd - epoch)
                }
            };

            let anomaly = solve_hyperbolic(mean_anomaly, e);
            let half = 0.5 * anomaly.value;
            let nu = 2.0 * ((e + 1.0).sqrt() * half.sinh()).atan2((e - 1.0).sqrt() * half.cosh());
            let r = a * (e * anomaly.value.cosh() - 1.0);

            (anomaly, nu, r, a * (e * e - 1.0))
        }
        Regime::Parabolic => {
            let q = elements.parabolic_perihelion_distance()?;
            let tp = elements.tp_jd.ok_or(ElementsError::MissingPerihelionTime)?;

            let b = (target_jd - tp) * (MU_SUN / (q * q * q)).sqrt();
            let anomaly = solve_barker(b);
            let d = anomaly.value;
            let nu = 2.0 * d.atan();
            let r = q * (1.0 + d * d);

            (anomaly, nu, r, 2.0 * q)
        }
    };

    if !p.is_finite() || p == 0.0 {
        return Err(ElementsError::DegenerateSemiLatusRectum(p));
    }

    let (sin_nu, cos_nu) = true_anomaly.sin_cos();
    let position_pf = DVec3::new(radius * cos_nu, radius * sin_nu, 0.0);

    // h = sqrt(μ·|p|), so h/p = sqrt(μ/|p|) with the sign of p
    let h_over_p = (MU_SUN * p.abs()).sqrt() / p;
    let velocity_pf = DVec3::new(-h_over_p * sin_nu, h_over_p * (e + cos_nu), 0.0);

    let rotation = perifocal_to_ecliptic(elements.i, elements.node, elements.peri);
    let state = StateVector {
        position: rotation * position_pf,
        velocity: rotation * velocity_pf,
    };

    if !state.is_finite() {
        return Err(ElementsError::NonFiniteState);
    }

    Ok(Propagation {
        state,
        regime,
        anomaly,
        true_anomaly,
        radius,
    })
}

/// Rotation R3(Ω)·R1(i)·R3(ω) from the perifocal frame to the ecliptic frame.
pub fn perifocal_to_ecliptic(i: f64, node: f64, peri: f64) -> DMat3 {
    DMat3::from_rotation_z(node) * DMat3::from_rotation_x(i) * DMat3::from_rotation_z(peri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DEG_TO_RAD, J2000_JD};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn vis_viva_speed_sq(r: f64, inv_a: f64) -> f64 {
        MU_SUN * (2.0 / r - inv_a)
    }

    #[test]
    fn test_perihelion_on_x_axis() {
        let el = OrbitalElements::elliptic(1.0, 0.3, J2000_JD, 0.0);
        let state = propagate(&el, J2000_JD).unwrap();

        assert_abs_diff_eq!(state.position.x, 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(state.position.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.position.z, 0.0, epsilon = 1e-12);

        // Velocity at perihelion is purely tangential (+y for prograde)
        assert_abs_diff_eq!(state.velocity.x, 0.0, epsilon = 1e-15);
        assert!(state.velocity.y > 0.0);
    }

    #[test]
    fn test_aphelion_radius() {
        let el = OrbitalElements::elliptic(2.5, 0.4, J2000_JD, PI);
        let p = propagate_detailed(&el, J2000_JD).unwrap();
        assert_abs_diff_eq!(p.radius, 2.5 * 1.4, epsilon = 1e-9);
        assert_abs_diff_eq!(p.state.radius(), 2.5 * 1.4, epsilon = 1e-9);
    }

    #[test]
    fn test_identity_rotation_keeps_perifocal_coordinates() {
        let rot = perifocal_to_ecliptic(0.0, 0.0, 0.0);
        let v = DVec3::new(0.3, -1.7, 0.0);
        assert_eq!(rot * v, v);

        let el = OrbitalElements::elliptic(1.3, 0.2, J2000_JD, 1.1);
        let p = propagate_detailed(&el, J2000_JD + 40.0).unwrap();
        let (sin_nu, cos_nu) = p.true_anomaly.sin_cos();
        assert_eq!(p.state.position.x, p.radius * cos_nu);
        assert_eq!(p.state.position.y, p.radius * sin_nu);
        assert_eq!(p.state.position.z, 0.0);
    }

    #[test]
    fn test_rotation_matches_closed_form() {
        let (i, node, peri) = (0.4, 1.2, -0.7);
        let rot = perifocal_to_ecliptic(i, node, peri);
        let p_hat = rot * DVec3::X;

        let expected = DVec3::new(
            node.cos() * peri.cos() - node.sin() * peri.sin() * i.cos(),
            node.sin() * peri.cos() + node.cos() * peri.sin() * i.cos(),
            peri.sin() * i.sin(),
        );
        assert_abs_diff_eq!(p_hat.x, expected.x, epsilon = 1e-15);
        assert_abs_diff_eq!(p_hat.y, expected.y, epsilon = 1e-15);
        assert_abs_diff_eq!(p_hat.z, expected.z, epsilon = 1e-15);
    }

    #[test]
    fn test_inclined_orbit_leaves_ecliptic() {
        let el = OrbitalElements::elliptic(1.0, 0.1, J2000_JD, 0.0)
            .with_orientation_deg(30.0, 0.0, 90.0);
        let state = propagate(&el, J2000_JD).unwrap();
        // Perihelion at ω = 90° on a 30° inclined plane
        assert_abs_diff_eq!(state.position.z, 0.9 * (30.0 * DEG_TO_RAD).sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_elliptic_vis_viva() {
        let el = OrbitalElements::elliptic(1.7, 0.45, J2000_JD, 0.8)
            .with_orientation(0.3, 2.0, 4.0);
        for dt in [0.0, 13.0, 250.0, -900.0] {
            let state = propagate(&el, J2000_JD + dt).unwrap();
            let expected = vis_viva_speed_sq(state.radius(), 1.0 / 1.7);
            assert_abs_diff_eq!(state.velocity.length_squared(), expected, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let el = OrbitalElements::elliptic(1.2, 0.3, J2000_JD, 0.5)
            .with_orientation(0.2, 0.9, 1.4);
        let t = J2000_JD + 77.0;
        let h = 1e-3;
        let forward = propagate(&el, t + h).unwrap().position;
        let backward = propagate(&el, t - h).unwrap().position;
        let numeric = (forward - backward) / (2.0 * h);
        let analytic = propagate(&el, t).unwrap().velocity;
        assert!((numeric - analytic).length() < 1e-9, "{:?} vs {:?}", numeric, analytic);
    }

    #[test]
    fn test_hyperbolic_at_perihelion() {
        let el = OrbitalElements::hyperbolic_from_perihelion(0.26, 1.2, J2000_JD);
        let p = propagate_detailed(&el, J2000_JD).unwrap();
        assert_eq!(p.regime, Regime::Hyperbolic);
        assert_abs_diff_eq!(p.radius, 0.26, epsilon = 1e-12);

        let a = 0.26 / 0.2;
        let expected = MU_SUN * (2.0 / 0.26 + 1.0 / a);
        assert_abs_diff_eq!(p.state.velocity.length_squared(), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_hyperbolic_outbound_and_inbound() {
        let el = OrbitalElements::hyperbolic_from_perihelion(0.5, 1.5, J2000_JD);
        let before = propagate_detailed(&el, J2000_JD - 100.0).unwrap();
        let after = propagate_detailed(&el, J2000_JD + 100.0).unwrap();
        assert!(before.true_anomaly < 0.0);
        assert!(after.true_anomaly > 0.0);
        assert_abs_diff_eq!(before.radius, after.radius, epsilon = 1e-10);
        // Moving away after perihelion
        assert!(after.state.position.dot(after.state.velocity) > 0.0);
    }

    #[test]
    fn test_hyperbolic_mean_anomaly_form_matches_tp_form() {
        let tp = J2000_JD + 20.0;
        let q = 0.8;
        let e = 1.3;
        let with_tp = OrbitalElements::hyperbolic_from_perihelion(q, e, tp);

        let a = q / (e - 1.0);
        let n = (MU_SUN / (a * a * a)).sqrt();
        let mut with_m0 = with_tp.clone();
        with_m0.tp_jd = None;
        let with_m0 = with_m0.with_mean_anomaly(J2000_JD, n * (J2000_JD - tp));

        let t = J2000_JD + 55.0;
        let s1 = propagate(&with_tp, t).unwrap();
        let s2 = propagate(&with_m0, t).unwrap();
        assert!((s1.position - s2.position).length() < 1e-10);
        assert!((s1.velocity - s2.velocity).length() < 1e-12);
    }

    #[test]
    fn test_parabolic_speed_is_escape_speed() {
        let el = OrbitalElements::parabolic(1.0, J2000_JD);
        for dt in [0.0, 30.0, -60.0, 400.0] {
            let p = propagate_detailed(&el, J2000_JD + dt).unwrap();
            assert_eq!(p.regime, Regime::Parabolic);
            let expected = 2.0 * MU_SUN / p.state.radius();
            assert_abs_diff_eq!(p.state.velocity.length_squared(), expected, epsilon = 1e-14);
        }
        let at_perihelion = propagate(&el, J2000_JD).unwrap();
        assert_abs_diff_eq!(at_perihelion.radius(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parabolic_from_semi_major_axis_fallback() {
        // q may be given as a·(1 − e) when e is a hair below 1
        let e = 1.0 - 1e-13;
        let el = OrbitalElements {
            a: Some(0.5 / (1.0 - e)),
            e,
            tp_jd: Some(J2000_JD),
            ..Default::default()
        };
        let p = propagate_detailed(&el, J2000_JD).unwrap();
        assert_eq!(p.regime, Regime::Parabolic);
        assert_abs_diff_eq!(p.radius, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_eccentricity_is_rejected() {
        let el = OrbitalElements::elliptic(1.0, 0.0, J2000_JD, 0.0);
        assert_eq!(
            propagate(&el, J2000_JD),
            Err(ElementsError::UnsupportedEccentricity(0.0))
        );
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut hyp = OrbitalElements::hyperbolic_from_perihelion(0.5, 1.5, J2000_JD);
        hyp.q = None;
        assert_eq!(
            propagate(&hyp, J2000_JD),
            Err(ElementsError::MissingSemiMajorAxisOrPerihelion)
        );

        let mut par = OrbitalElements::parabolic(0.5, J2000_JD);
        par.tp_jd = None;
        assert_eq!(propagate(&par, J2000_JD), Err(ElementsError::MissingPerihelionTime));

        let mut ell = OrbitalElements::elliptic(1.0, 0.5, J2000_JD, 0.0);
        ell.epoch_jd = None;
        assert_eq!(
            propagate(&ell, J2000_JD),
            Err(ElementsError::MissingPhase { regime: Regime::Elliptic })
        );
    }

    #[test]
    fn test_degenerate_hyperbola_rejected() {
        let el = OrbitalElements {
            a: Some(0.0),
            e: 1.5,
            tp_jd: Some(J2000_JD),
            ..Default::default()
        };
        assert_eq!(
            propagate(&el, J2000_JD),
            Err(ElementsError::DegenerateSemiLatusRectum(0.0))
        );
    }

    #[test]
    fn test_non_finite_epoch_rejected() {
        let el = OrbitalElements::elliptic(1.0, 0.5, J2000_JD, 0.0);
        assert!(matches!(
            propagate(&el, f64::NAN),
            Err(ElementsError::NonFiniteEpoch(_))
        ));
    }

    #[test]
    fn test_non_finite_phase_rejected() {
        let el = OrbitalElements::elliptic(1.0, 0.5, J2000_JD, f64::INFINITY);
        assert_eq!(propagate(&el, J2000_JD), Err(ElementsError::NonFiniteState));
    }
}
