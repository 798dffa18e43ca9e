//! Root-finders for the three forms of Kepler's equation.
//!
//! Each solver is Newton's method started from the classical initial guess,
//! safeguarded by a sign bracket around the root: a Newton step that would
//! leave the bracket is replaced by a bisection step. All three equations are
//! strictly increasing in their unknown, which is what keeps the bracket valid.
//!
//! Solvers never fail. When the iteration cap is hit they return the best
//! estimate with `converged == false` so callers can decide what to do.

use std::f64::consts::{PI, TAU};

/// Iteration cap for the elliptic and hyperbolic Kepler solvers.
pub const KEPLER_MAX_ITERATIONS: u32 = 60;

/// Step tolerance for the elliptic and hyperbolic Kepler solvers.
pub const KEPLER_TOLERANCE: f64 = 1e-13;

/// Iteration cap for Barker's equation.
pub const BARKER_MAX_ITERATIONS: u32 = 50;

/// Step tolerance for Barker's equation.
pub const BARKER_TOLERANCE: f64 = 1e-12;

/// Result of a root-find.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveOutcome {
    /// Best estimate of the anomaly.
    pub value: f64,
    /// Whether the last step fell below the tolerance.
    pub converged: bool,
    /// Iterations actually performed.
    pub iterations: u32,
    /// Equation residual at `value`.
    pub residual: f64,
}

/// Solve Kepler's equation `E - e·sin(E) = M` for the eccentric anomaly.
///
/// Valid for `0 <= e < 1`. `M` may be any finite value; the returned `E`
/// satisfies the equation for the caller's `M` (not a reduced copy of it).
pub fn solve_elliptic(mean_anomaly: f64, e: f64) -> SolveOutcome {
    // Reduce M to [-π, π]; the root then lies between M and M ± e.
    let mut m = mean_anomaly.rem_euclid(TAU);
    if m > PI {
        m -= TAU;
    }
    let shift = mean_anomaly - m;

    let bracket = if m >= 0.0 {
        (m, (m + e).min(PI))
    } else {
        ((m - e).max(-PI), m)
    };

    let outcome = safeguarded_newton(
        |x| {
            let (sin_x, cos_x) = x.sin_cos();
            (x - e * sin_x - m, 1.0 - e * cos_x)
        },
        m,
        bracket,
        KEPLER_MAX_ITERATIONS,
        KEPLER_TOLERANCE,
    );

    SolveOutcome {
        value: outcome.value + shift,
        ..outcome
    }
}

/// Solve the hyperbolic Kepler equation `e·sinh(H) - H = M`.
///
/// Valid for `e > 1`. Started from `H₀ = asinh(M/e)`, which is also the
/// inner edge of the bracket.
pub fn solve_hyperbolic(mean_anomaly: f64, e: f64) -> SolveOutcome {
    let m = mean_anomaly;
    let inner = (m.abs() / e).asinh();
    let outer = (m.abs() / (e - 1.0)).asinh();
    let bracket = if m >= 0.0 {
        (inner, outer)
    } else {
        (-outer, -inner)
    };

    safeguarded_newton(
        |x| (e * x.sinh() - x - m, e * x.cosh() - 1.0),
        (m / e).asinh(),
        bracket,
        KEPLER_MAX_ITERATIONS,
        KEPLER_TOLERANCE,
    )
}

/// Solve Barker's equation `D + D³/3 = B` for the parabolic anomaly.
///
/// Started from `D₀ = cbrt(B)`; the root lies in `[0, cbrt(3B)]` (mirrored for
/// negative `B`).
pub fn solve_barker(b: f64) -> SolveOutcome {
    let outer = (3.0 * b.abs()).cbrt();
    let bracket = if b >= 0.0 { (0.0, outer) } else { (-outer, 0.0) };

    safeguarded_newton(
        |d| (d + d * d * d / 3.0 - b, 1.0 + d * d),
        b.cbrt(),
        bracket,
        BARKER_MAX_ITERATIONS,
        BARKER_TOLERANCE,
    )
}

/// Newton iteration for an increasing function, kept inside `[lo, hi]`.
///
/// `f` returns `(f(x), f'(x))`.
fn safeguarded_newton(
    f: impl Fn(f64) -> (f64, f64),
    initial: f64,
    (mut lo, mut hi): (f64, f64),
    max_iterations: u32,
    tolerance: f64,
) -> SolveOutcome {
    // Non-finite inputs or an equation outside its domain.
    if lo.is_nan() || hi.is_nan() || lo > hi {
        return SolveOutcome {
            value: initial,
            converged: false,
            iterations: 0,
            residual: f(initial).0,
        };
    }

    let mut x = initial.clamp(lo, hi);
    let mut converged = false;
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;

        let (fx, dfx) = f(x);
        if fx == 0.0 {
            converged = true;
            break;
        }
        if fx < 0.0 {
            lo = x;
        } else {
            hi = x;
        }

        // The bracket edge just moved to x, so a converged Newton step lands on it
        let newton = x - fx / dfx;
        let next = if newton.is_finite() && newton >= lo && newton <= hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        let step = next - x;
        x = next;

        if step.abs() < tolerance {
            converged = true;
            break;
        }
    }

    SolveOutcome {
        value: x,
        converged,
        iterations,
        residual: f(x).0,
    }
}
