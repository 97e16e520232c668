//! # Reference body positions
//!
//! The plot shows the Sun and a few planets next to the propagated orbits. Their positions come
//! from an **ephemeris collaborator** behind the [`EphemerisSource`] trait:
//!
//! - [`FixedEphemeris`] – positions supplied by the caller (offline use, tests).
//! - [`horizons::HorizonsEphemeris`] – live query of the JPL Horizons API.
//!
//! Sources report each position with its [`LengthUnit`]; conversion to km happens once, in
//! [`BodyPosition::to_km`]. The Sun is not requested from the source: the scene pins it at the
//! origin.

use hifitime::Epoch;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{constants::AU, neo_errors::NeoError};

pub mod horizons;

/// Planets plotted around the propagated orbits, with their NAIF identifiers.
pub const REFERENCE_PLANETS: [(&str, i32); 3] = [("Earth", 399), ("Venus", 299), ("Mars", 499)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    AstronomicalUnit,
    Kilometer,
}

/// Heliocentric Cartesian position of a named body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub name: String,
    pub position: Vector3<f64>,
    pub unit: LengthUnit,
}

impl BodyPosition {
    pub fn new(name: impl Into<String>, position: Vector3<f64>, unit: LengthUnit) -> Self {
        BodyPosition {
            name: name.into(),
            position,
            unit,
        }
    }

    /// Position converted to kilometers (`1 au = 149 597 870.7 km`).
    pub fn to_km(&self) -> Vector3<f64> {
        match self.unit {
            LengthUnit::AstronomicalUnit => self.position * AU,
            LengthUnit::Kilometer => self.position,
        }
    }
}

/// Provider of reference body positions at a given instant.
pub trait EphemerisSource {
    /// Positions of the reference planets at `epoch`.
    ///
    /// Any failure (unreachable service, malformed payload) must be returned as an error:
    /// a body is never silently dropped.
    fn body_positions(&self, epoch: Epoch) -> Result<Vec<BodyPosition>, NeoError>;
}

/// Ephemeris returning the same positions whatever the epoch.
#[derive(Debug, Clone, Default)]
pub struct FixedEphemeris {
    pub bodies: Vec<BodyPosition>,
}

impl FixedEphemeris {
    pub fn new(bodies: Vec<BodyPosition>) -> Self {
        FixedEphemeris { bodies }
    }
}

impl EphemerisSource for FixedEphemeris {
    fn body_positions(&self, _epoch: Epoch) -> Result<Vec<BodyPosition>, NeoError> {
        Ok(self.bodies.clone())
    }
}
