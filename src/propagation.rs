//! # Two-body trajectory sampling
//!
//! Turns an [`OrbitalElementSet`] into a [`Trajectory`]: `N` heliocentric Cartesian positions
//! (km) sampled uniformly in time over `[0, period]`.
//!
//! For each sample time `t`:
//!
//! 1. `M = M₀ + n·t` with `n = √(μ☉ / a³)`
//! 2. `E` from Kepler's equation ([`KeplerSolver`])
//! 3. `ν = 2·atan2(√(1+e)·sin(E/2), √(1−e)·cos(E/2))`
//! 4. `r = a·(1 − e·cos(E))`
//! 5. closed-form (Ω, i, ω) rotation of the orbital-plane point into the celestial frame
//!
//! Every sample is computed from scratch; nothing is carried from one sample to the next.
//!
//! [`propagate_batch`] handles several element records at once under a [`BatchPolicy`].

use log::{debug, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Kilometer, Radian, DEFAULT_NUM_POINTS, MU_SUN},
    kepler::{true_anomaly, KeplerSolver},
    neo_errors::NeoError,
    orbital_elements::{OrbitalElementSet, OrbitalRecord},
};

/// Sampling and dynamics parameters of the propagator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropagationSettings {
    /// Number of samples over one period, endpoints included.
    pub num_points: usize,
    /// Gravitational parameter of the central body in km³/s².
    pub mu: f64,
    pub solver: KeplerSolver,
}

impl Default for PropagationSettings {
    fn default() -> Self {
        PropagationSettings {
            num_points: DEFAULT_NUM_POINTS,
            mu: MU_SUN,
            solver: KeplerSolver::default(),
        }
    }
}

/// Sampled positions of one orbit, in km.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub orbit_id: String,
    pub points: Vec<Vector3<f64>>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Split the positions into the three coordinate columns `(x, y, z)`.
    pub fn columns(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut xs = Vec::with_capacity(self.points.len());
        let mut ys = Vec::with_capacity(self.points.len());
        let mut zs = Vec::with_capacity(self.points.len());
        for p in &self.points {
            xs.push(p.x);
            ys.push(p.y);
            zs.push(p.z);
        }
        (xs, ys, zs)
    }
}

/// Uniformly spaced times over `[0, period]`, both endpoints included.
pub fn sample_times(period: f64, num_points: usize) -> Vec<f64> {
    match num_points {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let step = period / (n - 1) as f64;
            (0..n).map(|k| k as f64 * step).collect()
        }
    }
}

/// Rotate a point given by its radius and true anomaly into the celestial frame.
///
/// Closed form of the Ω, i, ω rotation sequence applied to `(r·cos ν, r·sin ν, 0)`.
pub fn orbit_plane_to_celestial(
    radius: Kilometer,
    true_anomaly: Radian,
    inclination: Radian,
    ascending_node_longitude: Radian,
    perihelion_argument: Radian,
) -> Vector3<f64> {
    let (sin_node, cos_node) = ascending_node_longitude.sin_cos();
    let (sin_incl, cos_incl) = inclination.sin_cos();
    let (sin_arg, cos_arg) = (perihelion_argument + true_anomaly).sin_cos();

    Vector3::new(
        radius * (cos_node * cos_arg - sin_node * sin_arg * cos_incl),
        radius * (sin_node * cos_arg + cos_node * sin_arg * cos_incl),
        radius * (sin_incl * sin_arg),
    )
}

/// Heliocentric position (km) of the object `t` seconds after the element epoch.
pub fn position_at(
    elements: &OrbitalElementSet,
    t: f64,
    settings: &PropagationSettings,
) -> Vector3<f64> {
    let e = elements.eccentricity;
    let mean_anomaly = elements.mean_anomaly + elements.mean_motion(settings.mu) * t;
    let ecc_anomaly = settings.solver.solve(mean_anomaly, e);
    let nu = true_anomaly(ecc_anomaly, e);
    let radius = elements.semi_major_axis * (1.0 - e * ecc_anomaly.cos());

    orbit_plane_to_celestial(
        radius,
        nu,
        elements.inclination,
        elements.ascending_node_longitude,
        elements.perihelion_argument,
    )
}

/// Sample one orbital period of `elements`.
///
/// Return
/// ------
/// * A [`Trajectory`] of exactly `settings.num_points` positions, or
///   [`NeoError::NonFiniteState`] if the solver produced a non-finite position.
pub fn propagate_trajectory(
    elements: &OrbitalElementSet,
    settings: &PropagationSettings,
) -> Result<Trajectory, NeoError> {
    let points = sample_times(elements.orbital_period, settings.num_points)
        .into_iter()
        .enumerate()
        .map(|(sample, t)| {
            let position = position_at(elements, t, settings);
            if position.iter().all(|c| c.is_finite()) {
                Ok(position)
            } else {
                Err(NeoError::NonFiniteState {
                    orbit_id: elements.orbit_id.clone(),
                    sample,
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Trajectory {
        orbit_id: elements.orbit_id.clone(),
        points,
    })
}

/// Parse a raw record and sample its orbit.
pub fn propagate_record(
    record: &OrbitalRecord,
    settings: &PropagationSettings,
) -> Result<Trajectory, NeoError> {
    let elements = OrbitalElementSet::try_from(record)?;
    propagate_trajectory(&elements, settings)
}

/// What to do when one record of a batch cannot be propagated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchPolicy {
    /// The first failure aborts the whole batch.
    #[default]
    AbortOnError,
    /// Failed records are skipped and reported, the others are still propagated.
    SkipFailed,
}

/// A record of the batch that could not be propagated.
#[derive(Debug)]
pub struct PropagationFailure {
    pub orbit_id: String,
    pub error: NeoError,
}

/// Result of a batch propagation.
#[derive(Debug, Default)]
pub struct BatchPropagation {
    /// Trajectories in input order.
    pub trajectories: Vec<Trajectory>,
    /// Always empty under [`BatchPolicy::AbortOnError`].
    pub failures: Vec<PropagationFailure>,
}

impl BatchPropagation {
    pub fn failed_orbit_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.orbit_id.as_str()).collect()
    }
}

/// Propagate every record of `records` sequentially.
///
/// Arguments
/// ---------
/// * `records`: raw element records, in display order.
/// * `settings`: sampling parameters shared by all records.
/// * `policy`: failure handling, see [`BatchPolicy`].
///
/// Return
/// ------
/// * The trajectories and skipped records, or the first error under
///   [`BatchPolicy::AbortOnError`].
pub fn propagate_batch(
    records: &[OrbitalRecord],
    settings: &PropagationSettings,
    policy: BatchPolicy,
) -> Result<BatchPropagation, NeoError> {
    let mut batch = BatchPropagation::default();

    for record in records {
        match propagate_record(record, settings) {
            Ok(trajectory) => {
                debug!(
                    "orbit {}: {} samples propagated",
                    trajectory.orbit_id,
                    trajectory.len()
                );
                batch.trajectories.push(trajectory);
            }
            Err(error) => match policy {
                BatchPolicy::AbortOnError => return Err(error),
                BatchPolicy::SkipFailed => {
                    warn!("orbit {} skipped: {error}", record.label());
                    batch.failures.push(PropagationFailure {
                        orbit_id: record.label().to_string(),
                        error,
                    });
                }
            },
        }
    }

    Ok(batch)
}
