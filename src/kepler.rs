//! # Kepler's equation for elliptic orbits
//!
//! Newton-Raphson solver for `E − e·sin(E) = M` and the anomaly conversions built on it.
//!
//! The reference behaviour is a **fixed** number of iterations seeded with `E₀ = M`, without
//! convergence test or divergence guard. Keeping both the seed and the iteration count makes the
//! sampled trajectories reproducible. [`KeplerSolver::tolerance`] optionally adds an early exit
//! on the Newton step size.
//!
//! Near `e → 1` the derivative `1 − e·cos(E)` can approach zero and the iteration can blow up;
//! callers detect this downstream by checking the propagated state for non-finite values.

use serde::{Deserialize, Serialize};

use crate::constants::{Radian, DEFAULT_KEPLER_ITERATIONS, DPI};

/// Return the principal value of an angle in [0, 2π).
pub fn principal_angle(a: Radian) -> Radian {
    a.rem_euclid(DPI)
}

/// One Newton-Raphson update of Kepler's equation.
#[inline]
fn newton_step(ecc_anomaly: Radian, eccentricity: f64, mean_anomaly: Radian) -> Radian {
    (ecc_anomaly - eccentricity * ecc_anomaly.sin() - mean_anomaly)
        / (1.0 - eccentricity * ecc_anomaly.cos())
}

/// Solve Kepler's equation with a fixed number of Newton-Raphson iterations.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: M in radians (not reduced, any real value is accepted).
/// * `eccentricity`: e, expected in [0, 1).
/// * `iterations`: number of updates applied to the seed `E₀ = M`.
///
/// Return
/// ------
/// * The eccentric anomaly E in radians, on the same revolution as `mean_anomaly`.
pub fn solve_kepler(mean_anomaly: Radian, eccentricity: f64, iterations: usize) -> Radian {
    let mut ecc_anomaly = mean_anomaly;
    for _ in 0..iterations {
        ecc_anomaly -= newton_step(ecc_anomaly, eccentricity, mean_anomaly);
    }
    ecc_anomaly
}

/// Residual `E − e·sin(E) − M` of Kepler's equation.
pub fn kepler_residual(ecc_anomaly: Radian, eccentricity: f64, mean_anomaly: Radian) -> f64 {
    ecc_anomaly - eccentricity * ecc_anomaly.sin() - mean_anomaly
}

/// True anomaly from the eccentric anomaly, using the half-angle `atan2` form
/// `ν = 2·atan2(√(1+e)·sin(E/2), √(1−e)·cos(E/2))` which keeps the quadrant over a full
/// revolution.
pub fn true_anomaly(ecc_anomaly: Radian, eccentricity: f64) -> Radian {
    let half = ecc_anomaly / 2.0;
    2.0 * ((1.0 + eccentricity).sqrt() * half.sin()).atan2((1.0 - eccentricity).sqrt() * half.cos())
}

/// Configurable Kepler solver.
///
/// The default reproduces the reference behaviour: 10 iterations, no early exit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeplerSolver {
    /// Maximum number of Newton updates.
    pub iterations: usize,
    /// Stop as soon as `|ΔE|` falls below this value (radians).
    pub tolerance: Option<f64>,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        KeplerSolver {
            iterations: DEFAULT_KEPLER_ITERATIONS,
            tolerance: None,
        }
    }
}

impl KeplerSolver {
    pub fn with_tolerance(iterations: usize, tolerance: f64) -> Self {
        KeplerSolver {
            iterations,
            tolerance: Some(tolerance),
        }
    }

    /// Eccentric anomaly for `(M, e)`.
    pub fn solve(&self, mean_anomaly: Radian, eccentricity: f64) -> Radian {
        let Some(tolerance) = self.tolerance else {
            return solve_kepler(mean_anomaly, eccentricity, self.iterations);
        };

        let mut ecc_anomaly = mean_anomaly;
        for _ in 0..self.iterations {
            let delta = newton_step(ecc_anomaly, eccentricity, mean_anomaly);
            ecc_anomaly -= delta;
            if delta.abs() < tolerance {
                break;
            }
        }
        ecc_anomaly
    }
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_circular_orbit_is_identity() {
        for m in [-7.0, -1.2, 0.0, 0.3, PI, 5.9, 12.5] {
            assert_eq!(solve_kepler(m, 0.0, 10), m);
        }
    }

    #[test]
    fn test_residual_after_ten_iterations() {
        for step_e in 0..=90 {
            let e = step_e as f64 / 100.0;
            for step_m in -72..=72 {
                let m = step_m as f64 * PI / 36.0;
                let ecc = solve_kepler(m, e, 10);
                assert!(
                    kepler_residual(ecc, e, m).abs() < 1e-6,
                    "residual too large for M = {m}, e = {e}"
                );
            }
        }
    }

    #[test]
    fn test_zero_iterations_returns_seed() {
        assert_eq!(solve_kepler(1.234, 0.5, 0), 1.234);
    }

    #[test]
    fn test_known_value() {
        // E − 0.5·sin(E) = π/2 has E ≈ 2.02097993808977
        let ecc = solve_kepler(PI / 2.0, 0.5, 10);
        assert_relative_eq!(ecc, 2.020_979_938_089_77, epsilon = 1e-12);
    }

    #[test]
    fn test_tolerance_exit_matches_fixed() {
        let fixed = KeplerSolver::default();
        let early = KeplerSolver::with_tolerance(50, 1e-14);
        for m in [0.1, 1.0, 2.5, 4.0] {
            assert_relative_eq!(fixed.solve(m, 0.3), early.solve(m, 0.3), epsilon = 1e-12);
        }
        assert_eq!(fixed.solve(0.7, 0.2), solve_kepler(0.7, 0.2, 10));
    }

    #[test]
    fn test_true_anomaly() {
        assert_eq!(true_anomaly(0.0, 0.3), 0.0);
        assert_relative_eq!(true_anomaly(PI, 0.3), PI, epsilon = 1e-12);
        // circular: ν = E
        assert_relative_eq!(true_anomaly(1.1, 0.0), 1.1, epsilon = 1e-12);
        // second half of the orbit keeps its quadrant
        assert!(true_anomaly(4.0, 0.2) > PI);
    }

    #[test]
    fn test_principal_angle() {
        assert_relative_eq!(principal_angle(-PI / 2.0), 1.5 * PI);
        assert_relative_eq!(principal_angle(5.0 * PI), PI, epsilon = 1e-12);
    }
}
