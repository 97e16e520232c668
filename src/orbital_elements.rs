//! # Orbital element records
//!
//! Two representations of the same classical element set:
//!
//! - [`OrbitalRecord`] – the record as received from NASA NeoWs (`orbital_data`). Numeric
//!   fields arrive as strings, sometimes as JSON numbers, and may be absent. Every other field
//!   (orbit class, observation dates, …) is carried untouched for display.
//! - [`OrbitalElementSet`] – the validated, unit-converted form consumed by the propagator.
//!
//! ## Units
//!
//! | Field                      | Record          | Element set |
//! |----------------------------|-----------------|-------------|
//! | `semi_major_axis`          | AU              | km          |
//! | angles (i, Ω, ω, M₀)       | degrees         | radians     |
//! | `orbital_period`           | days            | seconds     |
//!
//! Conversion is all-or-nothing: a missing or non-numeric element is a hard error for that
//! record, there is no default value.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    constants::{Kilometer, Radian, Second, AU, RADEG, SECONDS_PER_DAY},
    neo_errors::NeoError,
};

/// Label used when a record carries no `orbit_id`.
pub const UNKNOWN_ORBIT_ID: &str = "unknown";

/// Numeric element as found in a payload: a JSON number or its textual form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementValue {
    Number(f64),
    Text(String),
}

impl From<f64> for ElementValue {
    fn from(value: f64) -> Self {
        ElementValue::Number(value)
    }
}

impl From<&str> for ElementValue {
    fn from(value: &str) -> Self {
        ElementValue::Text(value.to_string())
    }
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementValue::Number(n) => write!(f, "{n}"),
            ElementValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Orbital data record of one object, as delivered by NeoWs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi_major_axis: Option<ElementValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eccentricity: Option<ElementValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclination: Option<ElementValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascending_node_longitude: Option<ElementValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perihelion_argument: Option<ElementValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_anomaly: Option<ElementValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbital_period: Option<ElementValue>,
    /// Display-only fields (orbit class, uncertainty, observation dates, …)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrbitalRecord {
    /// Orbit label used in trajectory names and error reports.
    pub fn label(&self) -> &str {
        self.orbit_id.as_deref().unwrap_or(UNKNOWN_ORBIT_ID)
    }

    fn numeric(&self, element: &str, value: &Option<ElementValue>) -> Result<f64, NeoError> {
        let orbit_id = self.label();
        match value {
            None => Err(NeoError::MissingElement {
                orbit_id: orbit_id.to_string(),
                element: element.to_string(),
            }),
            Some(ElementValue::Number(n)) => Ok(*n),
            Some(ElementValue::Text(s)) => {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| NeoError::NonNumericElement {
                        orbit_id: orbit_id.to_string(),
                        element: element.to_string(),
                        value: s.clone(),
                    })
            }
        }
    }
}

/// Validated classical elements of a bound heliocentric orbit.
///
/// Units
/// -----
/// * `semi_major_axis`: km
/// * `eccentricity`: unitless, in [0, 1)
/// * `inclination`, `ascending_node_longitude`, `perihelion_argument`, `mean_anomaly`: radians
/// * `orbital_period`: seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElementSet {
    pub orbit_id: String,
    pub semi_major_axis: Kilometer,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node_longitude: Radian,
    pub perihelion_argument: Radian,
    pub mean_anomaly: Radian,
    pub orbital_period: Second,
}

impl OrbitalElementSet {
    /// Mean motion `n = √(μ / a³)` in rad/s.
    pub fn mean_motion(&self, mu: f64) -> f64 {
        (mu / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Periapsis distance `a·(1 − e)` in km.
    pub fn periapsis_distance(&self) -> Kilometer {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Apoapsis distance `a·(1 + e)` in km.
    pub fn apoapsis_distance(&self) -> Kilometer {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }
}

fn invalid(orbit_id: &str, element: &str, reason: String) -> NeoError {
    NeoError::InvalidElement {
        orbit_id: orbit_id.to_string(),
        element: element.to_string(),
        reason,
    }
}

impl TryFrom<&OrbitalRecord> for OrbitalElementSet {
    type Error = NeoError;

    fn try_from(record: &OrbitalRecord) -> Result<Self, Self::Error> {
        let orbit_id = record.label();

        let a_au = record.numeric("semi_major_axis", &record.semi_major_axis)?;
        let e = record.numeric("eccentricity", &record.eccentricity)?;
        let i = record.numeric("inclination", &record.inclination)?;
        let node = record.numeric("ascending_node_longitude", &record.ascending_node_longitude)?;
        let peri = record.numeric("perihelion_argument", &record.perihelion_argument)?;
        let m0 = record.numeric("mean_anomaly", &record.mean_anomaly)?;
        let period_days = record.numeric("orbital_period", &record.orbital_period)?;

        for (name, value) in [
            ("semi_major_axis", a_au),
            ("eccentricity", e),
            ("inclination", i),
            ("ascending_node_longitude", node),
            ("perihelion_argument", peri),
            ("mean_anomaly", m0),
            ("orbital_period", period_days),
        ] {
            if !value.is_finite() {
                return Err(invalid(orbit_id, name, format!("{value} is not finite")));
            }
        }

        if a_au <= 0.0 {
            return Err(invalid(
                orbit_id,
                "semi_major_axis",
                format!("{a_au} AU must be > 0"),
            ));
        }
        if !(0.0..1.0).contains(&e) {
            return Err(invalid(
                orbit_id,
                "eccentricity",
                format!("{e} outside [0, 1), only bound orbits are supported"),
            ));
        }
        if period_days <= 0.0 {
            return Err(invalid(
                orbit_id,
                "orbital_period",
                format!("{period_days} days must be > 0"),
            ));
        }

        Ok(OrbitalElementSet {
            orbit_id: orbit_id.to_string(),
            semi_major_axis: a_au * AU,
            eccentricity: e,
            inclination: i * RADEG,
            ascending_node_longitude: node * RADEG,
            perihelion_argument: peri * RADEG,
            mean_anomaly: m0 * RADEG,
            orbital_period: period_days * SECONDS_PER_DAY,
        })
    }
}

impl TryFrom<OrbitalRecord> for OrbitalElementSet {
    type Error = NeoError;

    fn try_from(record: OrbitalRecord) -> Result<Self, Self::Error> {
        OrbitalElementSet::try_from(&record)
    }
}

impl fmt::Display for OrbitalElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 1.0 / RADEG;
        writeln!(f, "Orbital elements of orbit {}", self.orbit_id)?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.3} km ({:.6} AU)",
            self.semi_major_axis,
            self.semi_major_axis / AU
        )?;
        writeln!(f, "  e   (eccentricity)          = {:.6}", self.eccentricity)?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.6}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6} rad ({:.6}°)",
            self.ascending_node_longitude,
            self.ascending_node_longitude * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   (argument of perihelion)= {:.6} rad ({:.6}°)",
            self.perihelion_argument,
            self.perihelion_argument * rad_to_deg
        )?;
        writeln!(
            f,
            "  M₀  (mean anomaly)          = {:.6} rad ({:.6}°)",
            self.mean_anomaly,
            self.mean_anomaly * rad_to_deg
        )?;
        writeln!(
            f,
            "  P   (orbital period)        = {:.1} s ({:.4} d)",
            self.orbital_period,
            self.orbital_period / SECONDS_PER_DAY
        )
    }
}
