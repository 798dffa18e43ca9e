//! Classical (conic) orbital elements and their validation.

use std::fmt;

use crate::types::{DEG_TO_RAD, MU_SUN};

/// Eccentricities within this distance of 1 are treated as parabolic.
pub const PARABOLIC_TOLERANCE: f64 = 1e-12;

/// The three qualitatively different solutions of Kepler's problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Regime {
    Elliptic,
    Parabolic,
    Hyperbolic,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regime::Elliptic => "elliptic",
            Regime::Parabolic => "parabolic",
            Regime::Hyperbolic => "hyperbolic",
        };
        f.write_str(name)
    }
}

/// Malformed or regime-inconsistent orbital elements.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ElementsError {
    #[error("unsupported eccentricity {0} (must be finite and > 0)")]
    UnsupportedEccentricity(f64),

    #[error("hyperbolic elements need a semi-major axis or a perihelion distance")]
    MissingSemiMajorAxisOrPerihelion,

    #[error("{regime} elements need a perihelion time or a mean anomaly with its epoch")]
    MissingPhase { regime: Regime },

    #[error("parabolic elements need a perihelion distance")]
    MissingPerihelionDistance,

    #[error("parabolic elements need a perihelion time")]
    MissingPerihelionTime,

    #[error("elliptic elements need a semi-major axis")]
    MissingSemiMajorAxis,

    #[error("semi-major axis {0} AU must be positive for an elliptic orbit")]
    NonPositiveSemiMajorAxis(f64),

    #[error("perihelion distance {0} AU must be positive")]
    NonPositivePerihelionDistance(f64),

    #[error("degenerate semi-latus rectum {0}")]
    DegenerateSemiLatusRectum(f64),

    #[error("target epoch {0} is not finite")]
    NonFiniteEpoch(f64),

    #[error("propagation produced a non-finite state")]
    NonFiniteState,
}

/// Immutable description of one heliocentric conic orbit.
///
/// Distances in AU, angles in radians, epochs as Julian Dates. Which optional
/// fields are required depends on the [`Regime`] derived from `e`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis (AU). Sign is ignored for hyperbolic orbits.
    pub a: Option<f64>,
    /// Eccentricity
    pub e: f64,
    /// Perihelion distance (AU)
    pub q: Option<f64>,
    /// Inclination
    pub i: f64,
    /// Longitude of the ascending node (Ω)
    pub node: f64,
    /// Argument of perihelion (ω)
    pub peri: f64,
    /// Epoch of `m0` (JD)
    pub epoch_jd: Option<f64>,
    /// Mean anomaly at `epoch_jd`
    pub m0: Option<f64>,
    /// Time of perihelion passage (JD)
    pub tp_jd: Option<f64>,
}

impl OrbitalElements {
    /// Elliptic orbit from semi-major axis and mean anomaly at an epoch.
    /// Orientation angles start at zero; see [`Self::with_orientation`].
    pub fn elliptic(a: f64, e: f64, epoch_jd: f64, m0: f64) -> Self {
        Self {
            a: Some(a),
            e,
            epoch_jd: Some(epoch_jd),
            m0: Some(m0),
            ..Default::default()
        }
    }

    /// Hyperbolic orbit from perihelion distance and perihelion time.
    pub fn hyperbolic_from_perihelion(q: f64, e: f64, tp_jd: f64) -> Self {
        Self {
            e,
            q: Some(q),
            tp_jd: Some(tp_jd),
            ..Default::default()
        }
    }

    /// Parabolic orbit (e = 1) from perihelion distance and perihelion time.
    pub fn parabolic(q: f64, tp_jd: f64) -> Self {
        Self {
            e: 1.0,
            q: Some(q),
            tp_jd: Some(tp_jd),
            ..Default::default()
        }
    }

    /// Elements from the longitude form published for the major planets.
    ///
    /// # Arguments
    /// * `a` - Semi-major axis in AU
    /// * `e` - Eccentricity
    /// * `i_deg` - Inclination in degrees
    /// * `mean_longitude_deg` - Mean longitude L in degrees
    /// * `perihelion_longitude_deg` - Longitude of perihelion ϖ in degrees
    /// * `node_deg` - Longitude of the ascending node Ω in degrees
    /// * `epoch_jd` - Epoch of the elements
    pub fn from_planetary_longitudes_deg(
        a: f64,
        e: f64,
        i_deg: f64,
        mean_longitude_deg: f64,
        perihelion_longitude_deg: f64,
        node_deg: f64,
        epoch_jd: f64,
    ) -> Self {
        // M = L - ϖ, ω = ϖ - Ω
        let m0 = (mean_longitude_deg - perihelion_longitude_deg) * DEG_TO_RAD;
        Self::elliptic(a, e, epoch_jd, m0).with_orientation_deg(
            i_deg,
            node_deg,
            perihelion_longitude_deg - node_deg,
        )
    }

    /// Set inclination, ascending node and argument of perihelion (radians).
    pub fn with_orientation(mut self, i: f64, node: f64, peri: f64) -> Self {
        self.i = i;
        self.node = node;
        self.peri = peri;
        self
    }

    /// Set inclination, ascending node and argument of perihelion (degrees).
    pub fn with_orientation_deg(self, i_deg: f64, node_deg: f64, peri_deg: f64) -> Self {
        self.with_orientation(i_deg * DEG_TO_RAD, node_deg * DEG_TO_RAD, peri_deg * DEG_TO_RAD)
    }

    /// Attach a mean anomaly and its epoch.
    pub fn with_mean_anomaly(mut self, epoch_jd: f64, m0: f64) -> Self {
        self.epoch_jd = Some(epoch_jd);
        self.m0 = Some(m0);
        self
    }

    /// Regime derived from the eccentricity.
    ///
    /// `e <= 0` is always rejected, including exact circular orbits.
    pub fn regime(&self) -> Result<Regime, ElementsError> {
        let e = self.e;
        if !e.is_finite() || e <= 0.0 {
            return Err(ElementsError::UnsupportedEccentricity(e));
        }
        if e > 1.0 + PARABOLIC_TOLERANCE {
            Ok(Regime::Hyperbolic)
        } else if (e - 1.0).abs() <= PARABOLIC_TOLERANCE {
            Ok(Regime::Parabolic)
        } else {
            Ok(Regime::Elliptic)
        }
    }

    /// Check that the fields required by the regime are present and sane.
    pub fn validate(&self) -> Result<Regime, ElementsError> {
        let regime = self.regime()?;
        match regime {
            Regime::Elliptic => {
                self.elliptic_semi_major_axis()?;
                self.epoch_phase(regime)?;
            }
            Regime::Hyperbolic => {
                self.hyperbolic_semi_major_axis()?;
                if self.tp_jd.is_none() {
                    self.epoch_phase(regime)?;
                }
            }
            Regime::Parabolic => {
                self.parabolic_perihelion_distance()?;
                self.tp_jd.ok_or(ElementsError::MissingPerihelionTime)?;
            }
        }
        Ok(regime)
    }

    /// Perihelion distance in AU, whichever way the orbit was specified.
    pub fn perihelion_distance(&self) -> Result<f64, ElementsError> {
        match self.regime()? {
            Regime::Elliptic => Ok(self.elliptic_semi_major_axis()? * (1.0 - self.e)),
            Regime::Hyperbolic => Ok(self.hyperbolic_semi_major_axis()? * (self.e - 1.0)),
            Regime::Parabolic => self.parabolic_perihelion_distance(),
        }
    }

    /// Aphelion distance in AU; `None` for open orbits.
    pub fn aphelion_distance(&self) -> Option<f64> {
        match self.regime() {
            Ok(Regime::Elliptic) => self
                .elliptic_semi_major_axis()
                .ok()
                .map(|a| a * (1.0 + self.e)),
            _ => None,
        }
    }

    /// Semi-latus rectum p in AU.
    pub fn semi_latus_rectum(&self) -> Result<f64, ElementsError> {
        let e = self.e;
        let p = match self.regime()? {
            Regime::Elliptic => self.elliptic_semi_major_axis()? * (1.0 - e * e),
            Regime::Hyperbolic => self.hyperbolic_semi_major_axis()? * (e * e - 1.0),
            Regime::Parabolic => 2.0 * self.parabolic_perihelion_distance()?,
        };
        if !p.is_finite() || p == 0.0 {
            return Err(ElementsError::DegenerateSemiLatusRectum(p));
        }
        Ok(p)
    }

    /// Mean motion in radians per day.
    ///
    /// For parabolic orbits this is the Barker rate `sqrt(μ/q³)`.
    pub fn mean_motion(&self) -> Result<f64, ElementsError> {
        let scale = match self.regime()? {
            Regime::Elliptic => self.elliptic_semi_major_axis()?,
            Regime::Hyperbolic => self.hyperbolic_semi_major_axis()?,
            Regime::Parabolic => self.parabolic_perihelion_distance()?,
        };
        Ok((MU_SUN / (scale * scale * scale)).sqrt())
    }

    /// Orbital period in days; `None` for open orbits.
    pub fn period_days(&self) -> Option<f64> {
        match self.regime() {
            Ok(Regime::Elliptic) => self
                .mean_motion()
                .ok()
                .map(|n| std::f64::consts::TAU / n),
            _ => None,
        }
    }

    pub(crate) fn elliptic_semi_major_axis(&self) -> Result<f64, ElementsError> {
        let a = self.a.ok_or(ElementsError::MissingSemiMajorAxis)?;
        if a <= 0.0 || !a.is_finite() {
            return Err(ElementsError::NonPositiveSemiMajorAxis(a));
        }
        Ok(a)
    }

    /// |a| for a hyperbola, from `a` directly or from `q / (e - 1)`.
    pub(crate) fn hyperbolic_semi_major_axis(&self) -> Result<f64, ElementsError> {
        match (self.a, self.q) {
            (Some(a), _) => Ok(a.abs()),
            (None, Some(q)) => {
                if q <= 0.0 || !q.is_finite() {
                    return Err(ElementsError::NonPositivePerihelionDistance(q));
                }
                Ok(q / (self.e - 1.0))
            }
            (None, None) => Err(ElementsError::MissingSemiMajorAxisOrPerihelion),
        }
    }

    pub(crate) fn parabolic_perihelion_distance(&self) -> Result<f64, ElementsError> {
        let q = match (self.q, self.a) {
            (Some(q), _) => q,
            (None, Some(a)) => a * (1.0 - self.e),
            (None, None) => return Err(ElementsError::MissingPerihelionDistance),
        };
        if q <= 0.0 || !q.is_finite() {
            return Err(ElementsError::NonPositivePerihelionDistance(q));
        }
        Ok(q)
    }

    /// `(epoch_jd, m0)` pair, both required together.
    pub(crate) fn epoch_phase(&self, regime: Regime) -> Result<(f64, f64), ElementsError> {
        match (self.epoch_jd, self.m0) {
            (Some(epoch), Some(m0)) => Ok((epoch, m0)),
            _ => Err(ElementsError::MissingPhase { regime }),
        }
    }
}
